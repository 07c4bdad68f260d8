//! crates/reading_tracker_core/src/achievements.rs
//!
//! Streak milestone thresholds. The core only decides which milestones a
//! streak value has crossed; persisting the achievement rows (at most one
//! per user and milestone, ever) is the caller's job.

/// Streak lengths that earn an achievement.
pub const STREAK_MILESTONES: [u32; 6] = [10, 25, 50, 100, 250, 500];

/// Milestones a streak of the given length has reached, in ascending order.
pub fn milestones_reached(streak: u32) -> impl Iterator<Item = u32> {
    STREAK_MILESTONES
        .into_iter()
        .filter(move |milestone| streak >= *milestone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_streak_reaches_nothing() {
        assert_eq!(milestones_reached(9).count(), 0);
        assert_eq!(milestones_reached(0).count(), 0);
    }

    #[test]
    fn milestones_accumulate_with_streak_length() {
        assert_eq!(milestones_reached(10).collect::<Vec<_>>(), vec![10]);
        assert_eq!(milestones_reached(60).collect::<Vec<_>>(), vec![10, 25, 50]);
        assert_eq!(
            milestones_reached(500).collect::<Vec<_>>(),
            vec![10, 25, 50, 100, 250, 500]
        );
    }
}
