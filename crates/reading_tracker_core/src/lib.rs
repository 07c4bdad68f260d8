pub mod achievements;
pub mod activity;
pub mod challenge;
pub mod domain;
pub mod ports;
pub mod timezone;

pub use achievements::{milestones_reached, STREAK_MILESTONES};
pub use activity::{
    activity_summary, format_day_in_timezone, local_day, parse_day_in_timezone,
    reading_days_in_period, reading_streak, today_in_timezone, ActivityError,
};
pub use challenge::{challenge_progress, challenge_window};
pub use domain::{
    ActivitySummary, BookRow, BookStatus, Challenge, ChallengeKind, ReadingLogEntry,
};
pub use ports::{PortError, PortResult, ReadingStore};
pub use timezone::{TimezoneResolver, DEFAULT_TIMEZONE};
