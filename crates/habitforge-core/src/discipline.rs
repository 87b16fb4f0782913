//! Composite 0-100 discipline score across all habits.
//!
//! Three components, each averaged only over habits that have at least one
//! day of history in the relevant window:
//! - **Consistency** (40 pts): trailing 30-day completion ratio
//! - **Weekly rate** (30 pts): trailing 7-day completion ratio
//! - **Streak stability** (30 pts): current streak against the days it could
//!   have covered, capped at 30
//!
//! Components are rounded on their own before being summed and clamped, so
//! the displayed percentages need not add up to the total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_index::{DayNumber, DayZone};
use crate::habit::Habit;
use crate::window::trailing_completion_ratio;

pub const CONSISTENCY_WINDOW: DayNumber = 30;
pub const CONSISTENCY_WEIGHT: u32 = 40;
pub const WEEKLY_WINDOW: DayNumber = 7;
pub const WEEKLY_WEIGHT: u32 = 30;
pub const STABILITY_WINDOW: DayNumber = 30;
pub const STABILITY_WEIGHT: u32 = 30;
pub const MAX_SCORE: u32 = 100;

/// Score breakdown handed to the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineScore {
    pub total: u32,
    pub consistency: u32,
    pub weekly: u32,
    pub stability: u32,
}

impl DisciplineScore {
    pub fn consistency_percent(&self) -> u32 {
        percent_of(self.consistency, CONSISTENCY_WEIGHT)
    }

    pub fn weekly_percent(&self) -> u32 {
        percent_of(self.weekly, WEEKLY_WEIGHT)
    }

    pub fn stability_percent(&self) -> u32 {
        percent_of(self.stability, STABILITY_WEIGHT)
    }
}

fn percent_of(points: u32, weight: u32) -> u32 {
    (f64::from(points * 100) / f64::from(weight)).round() as u32
}

/// Running mean that ignores habits without eligible days.
#[derive(Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn weighted(&self, weight: u32) -> u32 {
        if self.count == 0 {
            return 0;
        }
        (self.sum / f64::from(self.count) * f64::from(weight)).round() as u32
    }
}

/// Streak stability ratio for one habit, `None` before its first day.
pub fn stability_ratio(habit: &Habit, days_since_creation: DayNumber) -> Option<f64> {
    if days_since_creation <= 0 {
        return None;
    }
    let potential = days_since_creation.min(STABILITY_WINDOW) as f64;
    Some((f64::from(habit.current_streak()) / potential).min(1.0))
}

/// Score habits given each one's current day number.
pub fn score_with<'a, I>(habits: I) -> DisciplineScore
where
    I: IntoIterator<Item = (&'a Habit, DayNumber)>,
{
    let mut consistency = Mean::default();
    let mut weekly = Mean::default();
    let mut stability = Mean::default();

    for (habit, today) in habits {
        consistency.push(trailing_completion_ratio(habit, CONSISTENCY_WINDOW, today));
        weekly.push(trailing_completion_ratio(habit, WEEKLY_WINDOW, today));
        stability.push(stability_ratio(habit, today));
    }

    let consistency = consistency.weighted(CONSISTENCY_WEIGHT);
    let weekly = weekly.weighted(WEEKLY_WEIGHT);
    let stability = stability.weighted(STABILITY_WEIGHT);

    DisciplineScore {
        total: (consistency + weekly + stability).min(MAX_SCORE),
        consistency,
        weekly,
        stability,
    }
}

/// Score every habit as of `now`.
pub fn score(habits: &[Habit], now: DateTime<Utc>, zone: DayZone) -> DisciplineScore {
    score_with(
        habits
            .iter()
            .map(|habit| (habit, habit.days_since_creation(now, zone))),
    )
}
