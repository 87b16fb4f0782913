//! Habit records as persisted under the `habits` key.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date_index::{self, DayNumber, DayZone};
use crate::streak;

/// Goal used when none (or a non-positive one) is given.
pub const DEFAULT_GOAL: u32 = 66;

/// A user-defined habit and its completion record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    /// Date the user says they started. Day numbering ignores it.
    pub start_date: NaiveDate,
    pub goal: u32,
    #[serde(default)]
    pub why: String,
    /// Anchor for day numbering: its calendar day is day 1.
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "day_set::deserialize")]
    pub completed_days: BTreeSet<DayNumber>,
    #[serde(default)]
    pub best_streak: u32,
}

/// Raw user input for a new habit, validated by the store.
#[derive(Debug, Clone, Default)]
pub struct HabitInput {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub goal: Option<i64>,
    pub why: Option<String>,
}

impl HabitInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn goal(mut self, goal: i64) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn why(mut self, why: impl Into<String>) -> Self {
        self.why = Some(why.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }
}

impl Habit {
    pub fn is_completed(&self, day: DayNumber) -> bool {
        self.completed_days.contains(&day)
    }

    pub fn completed_count(&self) -> usize {
        self.completed_days.len()
    }

    pub fn current_streak(&self) -> u32 {
        streak::current_streak(&self.completed_days)
    }

    pub fn days_since_creation(&self, now: DateTime<Utc>, zone: DayZone) -> DayNumber {
        date_index::days_since_creation(now, self.created_at, zone)
    }

    /// Flip completion of `day` and refresh the best-streak cache.
    ///
    /// Returns whether the day is completed afterwards.
    pub fn toggle(&mut self, day: DayNumber) -> bool {
        let completed = if self.completed_days.remove(&day) {
            false
        } else {
            self.completed_days.insert(day);
            true
        };
        self.best_streak = streak::best_streak(self.best_streak, self.current_streak());
        completed
    }
}

/// Completed days are integers, but older snapshots wrote them as strings.
mod day_set {
    use std::collections::BTreeSet;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Entry>::deserialize(deserializer)?
            .into_iter()
            .map(|entry| match entry {
                Entry::Number(day) => Ok(day),
                Entry::Text(text) => text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| D::Error::custom(format!("invalid day number '{text}'"))),
            })
            .collect()
    }
}
