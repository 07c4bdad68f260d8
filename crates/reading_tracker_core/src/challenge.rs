//! crates/reading_tracker_core/src/challenge.rs
//!
//! Challenge progress aggregation. Unlike the streak path this does not
//! bucket by the user's local day: the challenge's own start and end
//! instants define the window, widened to whole calendar days.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::domain::{BookRow, BookStatus, Challenge, ChallengeKind, ReadingLogEntry};

/// The challenge window as a half-open instant range.
///
/// `start_date` widens to 00:00:00.000 of its day and `end_date` to the
/// end of its day, expressed as an exclusive next-midnight bound. Callers
/// fetching rows for [`challenge_progress`] should use these bounds so the
/// fetch covers the whole end day.
pub fn challenge_window(challenge: &Challenge) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = challenge.start_date.date_naive().and_time(NaiveTime::MIN).and_utc();
    let end = (challenge.end_date.date_naive() + Duration::days(1))
        .and_time(NaiveTime::MIN)
        .and_utc();
    (start, end)
}

/// Computes a challenge's progress from pre-fetched rows.
///
/// Page-based kinds sum `pages_read` over in-window logs; book-based kinds
/// count completed books whose `completed_at` falls in the window. Rows
/// outside the window and books without a completion timestamp contribute
/// nothing. An unrecognized kind aggregates to zero.
pub fn challenge_progress(
    challenge: &Challenge,
    logs: &[ReadingLogEntry],
    books: &[BookRow],
) -> u64 {
    let (start, end) = challenge_window(challenge);
    match challenge.kind {
        ChallengeKind::Pages | ChallengeKind::Yearly => logs
            .iter()
            .filter(|log| log.date >= start && log.date < end)
            .map(|log| u64::from(log.pages_read))
            .sum(),
        ChallengeKind::Books | ChallengeKind::Genre => books
            .iter()
            .filter(|book| book.status == BookStatus::Completed)
            .filter(|book| {
                book.completed_at
                    .is_some_and(|at| at >= start && at < end)
            })
            .count() as u64,
        ChallengeKind::Unknown => 0,
    }
}
