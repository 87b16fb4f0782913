//! One-time streak milestone notifications.
//!
//! Each habit can fire each threshold once. The ledger of already-shown
//! thresholds is persisted under `shownMilestones`, keyed `habit-<id>`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::habit::Habit;

/// Streak lengths worth celebrating, with their messages.
pub const MILESTONES: [(u32, &str); 5] = [
    (7, "7 days. Most people quit before this."),
    (21, "21 days. The pattern is forming."),
    (30, "30 days. This is discipline."),
    (100, "100 days. Habit is no longer effort."),
    (365, "365 days. One year. Unwavering."),
];

pub fn milestone_message(threshold: u32) -> Option<&'static str> {
    MILESTONES
        .iter()
        .find(|(days, _)| *days == threshold)
        .map(|(_, message)| *message)
}

/// A milestone selected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub habit_id: i64,
    pub habit_name: String,
    pub threshold: u32,
    pub message: String,
}

/// Thresholds already shown, per habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneLedger {
    entries: BTreeMap<String, Vec<u32>>,
}

impl MilestoneLedger {
    pub fn key(habit_id: i64) -> String {
        format!("habit-{habit_id}")
    }

    pub fn shown(&self, habit_id: i64) -> &[u32] {
        self.entries
            .get(&Self::key(habit_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_shown(&self, habit_id: i64, threshold: u32) -> bool {
        self.shown(habit_id).contains(&threshold)
    }

    pub fn contains_habit(&self, habit_id: i64) -> bool {
        self.entries.contains_key(&Self::key(habit_id))
    }

    /// Create an empty entry for the habit. Returns true if one was added.
    pub fn ensure(&mut self, habit_id: i64) -> bool {
        let key = Self::key(habit_id);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, Vec::new());
        true
    }

    /// Record a threshold as shown. Returns false if it already was.
    pub fn mark(&mut self, habit_id: i64, threshold: u32) -> bool {
        let shown = self.entries.entry(Self::key(habit_id)).or_default();
        if shown.contains(&threshold) {
            return false;
        }
        shown.push(threshold);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of one milestone pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneCheck {
    /// The single milestone to surface, if any
    pub milestone: Option<Milestone>,
    /// Whether the ledger changed and needs persisting
    pub ledger_changed: bool,
}

/// Pick at most one newly crossed milestone across all habits.
///
/// The highest unseen threshold wins; between habits that share it, the
/// first one in `habits` order wins. The chosen pair is marked shown.
pub fn check(habits: &[Habit], ledger: &mut MilestoneLedger) -> MilestoneCheck {
    let mut ledger_changed = false;
    let mut best: Option<(&Habit, u32)> = None;

    for habit in habits {
        ledger_changed |= ledger.ensure(habit.id);
        let streak = habit.current_streak();

        for &(threshold, _) in MILESTONES.iter() {
            if threshold > streak || ledger.is_shown(habit.id, threshold) {
                continue;
            }
            if best.map_or(true, |(_, top)| threshold > top) {
                best = Some((habit, threshold));
            }
        }
    }

    let milestone = best.map(|(habit, threshold)| {
        ledger_changed |= ledger.mark(habit.id, threshold);
        tracing::info!(habit_id = habit.id, threshold, "milestone reached");
        Milestone {
            habit_id: habit.id,
            habit_name: habit.name.clone(),
            threshold,
            message: milestone_message(threshold).unwrap_or_default().to_string(),
        }
    });

    MilestoneCheck {
        milestone,
        ledger_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn habit(id: i64, run: u32) -> Habit {
        Habit {
            id,
            name: format!("habit {id}"),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            goal: 66,
            why: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            completed_days: (1..=i64::from(run)).collect(),
            best_streak: run,
        }
    }

    #[test]
    fn nothing_below_first_threshold() {
        let mut ledger = MilestoneLedger::default();
        let result = check(&[habit(1, 6)], &mut ledger);
        assert!(result.milestone.is_none());
        // the empty entry is still created lazily
        assert!(result.ledger_changed);
        assert!(ledger.contains_habit(1));
        assert!(ledger.shown(1).is_empty());
    }

    #[test]
    fn fires_once_per_habit_and_threshold() {
        let mut ledger = MilestoneLedger::default();
        let habits = [habit(1, 7)];

        let first = check(&habits, &mut ledger);
        let milestone = first.milestone.unwrap();
        assert_eq!(milestone.threshold, 7);
        assert_eq!(milestone.message, "7 days. Most people quit before this.");

        let second = check(&habits, &mut ledger);
        assert!(second.milestone.is_none());
        assert!(!second.ledger_changed);
    }

    #[test]
    fn highest_threshold_wins_and_lower_ones_wait() {
        let mut ledger = MilestoneLedger::default();
        let habits = [habit(1, 8), habit(2, 31)];

        assert_eq!(check(&habits, &mut ledger).milestone.unwrap().threshold, 30);
        let next = check(&habits, &mut ledger).milestone.unwrap();
        assert_eq!((next.habit_id, next.threshold), (2, 21));
        let next = check(&habits, &mut ledger).milestone.unwrap();
        assert_eq!((next.habit_id, next.threshold), (1, 7));
        let next = check(&habits, &mut ledger).milestone.unwrap();
        assert_eq!((next.habit_id, next.threshold), (2, 7));
        assert!(check(&habits, &mut ledger).milestone.is_none());
    }

    #[test]
    fn ties_go_to_first_habit() {
        let mut ledger = MilestoneLedger::default();
        let habits = [habit(5, 21), habit(3, 25)];
        let first = check(&habits, &mut ledger).milestone.unwrap();
        assert_eq!((first.habit_id, first.threshold), (5, 21));
        let second = check(&habits, &mut ledger).milestone.unwrap();
        assert_eq!((second.habit_id, second.threshold), (3, 21));
    }

    #[test]
    fn broken_and_rebuilt_streak_does_not_refire() {
        let mut ledger = MilestoneLedger::default();
        let mut h = habit(1, 7);
        check(std::slice::from_ref(&h), &mut ledger);

        h.toggle(7);
        h.toggle(7);
        assert_eq!(h.current_streak(), 7);
        assert!(check(std::slice::from_ref(&h), &mut ledger).milestone.is_none());
    }

    #[test]
    fn ledger_serializes_as_plain_map() {
        let mut ledger = MilestoneLedger::default();
        ledger.mark(17, 7);
        ledger.mark(17, 21);
        ledger.ensure(18);
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "habit-17": [7, 21], "habit-18": [] })
        );
        let back: MilestoneLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
