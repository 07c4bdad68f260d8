//! crates/reading_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{BookRow, Challenge, ReadingLogEntry};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Port (Trait)
//=========================================================================================

/// Read access to the rows the aggregation engine consumes, plus the two
/// write paths its callers own (challenge progress, streak achievements).
///
/// Implementations must hand back rows already filtered to the requested
/// user and window; the core never filters by user itself.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    // --- Auth ---
    async fn validate_session(&self, session_id: &str) -> PortResult<Uuid>;

    // --- Preferences ---
    /// The user's stored IANA timezone name, if they have set one.
    async fn get_user_timezone(&self, user_id: Uuid) -> PortResult<Option<String>>;

    // --- Reading logs ---
    async fn get_reading_logs_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> PortResult<Vec<ReadingLogEntry>>;

    async fn get_reading_logs_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<ReadingLogEntry>>;

    // --- Books and challenges ---
    async fn get_books_for_user(&self, user_id: Uuid) -> PortResult<Vec<BookRow>>;

    async fn get_challenge_by_id(&self, challenge_id: Uuid) -> PortResult<Challenge>;

    async fn update_challenge_progress(
        &self,
        challenge_id: Uuid,
        user_id: Uuid,
        progress: i64,
    ) -> PortResult<()>;

    // --- Achievements ---
    /// Records a streak milestone for a user. Returns `true` if a new row was
    /// created, `false` if the (user, milestone) pair already existed.
    async fn record_streak_achievement(&self, user_id: Uuid, milestone: u32) -> PortResult<bool>;
}
