//! crates/reading_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single per-day reading log row for one (user, book) pair.
///
/// `date` is stored as an instant at local midnight of the user's calendar
/// day; the storage layer guarantees at most one row per (user, book, day).
#[derive(Debug, Clone)]
pub struct ReadingLogEntry {
    pub date: DateTime<Utc>,
    pub pages_read: u32,
}

/// Shelf status of a book, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    WantToRead,
    Reading,
    Completed,
    Abandoned,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WantToRead => "want_to_read",
            Self::Reading => "reading",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Maps a stored status string; unknown values fall back to `WantToRead`.
    pub fn from_str(s: &str) -> Self {
        match s {
            "reading" => Self::Reading,
            "completed" => Self::Completed,
            "abandoned" => Self::Abandoned,
            _ => Self::WantToRead,
        }
    }
}

/// Narrow input shape for book-count challenge aggregation.
#[derive(Debug, Clone)]
pub struct BookRow {
    pub status: BookStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

/// What a challenge measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    /// Sum of pages read inside the window.
    Pages,
    /// Count of books completed inside the window.
    Books,
    /// A calendar-year page goal; aggregates like `Pages`.
    Yearly,
    /// A genre-scoped book goal; aggregates like `Books`.
    Genre,
    /// Unrecognized stored value; always aggregates to zero.
    Unknown,
}

impl ChallengeKind {
    pub fn from_str(s: &str) -> Self {
        match s {
            "pages" => Self::Pages,
            "books" => Self::Books,
            "yearly" => Self::Yearly,
            "genre" => Self::Genre,
            _ => Self::Unknown,
        }
    }
}

/// A reading challenge with an inclusive calendar-day window.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub id: Uuid,
    pub kind: ChallengeKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Derived per-user activity metrics returned to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySummary {
    pub reading_streak: u32,
    pub days_read_this_week: u32,
    pub days_read_this_month: u32,
}
