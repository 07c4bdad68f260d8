pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers so the binary that builds the router can reach
// them without digging through submodules.
pub use middleware::require_auth;
pub use rest::{challenge_progress_handler, health_handler, stats_handler};
