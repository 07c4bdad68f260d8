//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use reading_tracker_core::ports::ReadingStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Handlers that need the user's timezone build a request-scoped
/// `TimezoneResolver` over `db` instead of caching zones here, so nothing
/// leaks between requests.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn ReadingStore>,
    pub config: Arc<Config>,
}
