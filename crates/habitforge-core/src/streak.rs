//! Consecutive-day streaks over a set of completed day numbers.

use std::collections::BTreeSet;

use crate::date_index::DayNumber;

/// Length of the unbroken run that ends at the latest completed day.
///
/// The run is anchored at the maximum day in the set, not at today: a habit
/// last completed on days 10, 9 and 8 reports 3 even when today is day 14.
pub fn current_streak(completed: &BTreeSet<DayNumber>) -> u32 {
    let mut streak = 0;
    let mut expected = match completed.last() {
        Some(&day) => day,
        None => return 0,
    };

    for &day in completed.iter().rev() {
        if day != expected {
            break;
        }
        streak += 1;
        expected -= 1;
    }
    streak
}

/// Best streak after a recompute. Never lower than what was stored.
pub fn best_streak(stored: u32, current: u32) -> u32 {
    stored.max(current)
}
