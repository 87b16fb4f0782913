//! Completion ratios over trailing windows, goal progress and calendar views.
//!
//! Everything here is a pure function of a [`Habit`] plus a reference day;
//! the tracker decides which day is "today".

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_index::{self, DayNumber, DayZone};
use crate::habit::Habit;

/// Days before `today` shown in the compact recent grid.
const RECENT_LOOKBACK: DayNumber = 14;
/// Days after `today` shown in the compact recent grid.
const RECENT_LOOKAHEAD: DayNumber = 3;

/// Share of days completed in the `window` days ending at `as_of`.
///
/// The window is shortened for young habits. Returns `None` when no day of
/// history exists yet (`as_of <= 0`); callers skip such habits instead of
/// scoring them as zero.
pub fn trailing_completion_ratio(habit: &Habit, window: DayNumber, as_of: DayNumber) -> Option<f64> {
    let days_to_check = as_of.min(window);
    if days_to_check <= 0 {
        return None;
    }
    let first = as_of - days_to_check + 1;
    let completed = habit.completed_days.range(first..=as_of).count();
    Some(completed as f64 / days_to_check as f64)
}

/// Progress towards a habit's day-count goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub completed: usize,
    pub goal: u32,
    pub ratio: f64,
    /// `round(ratio * 100)`, 0 when the goal is 0
    pub percent: u32,
    /// Negative once the goal has been exceeded
    pub remaining: i64,
}

impl GoalProgress {
    /// Display form, e.g. `3/66`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.completed, self.goal)
    }

    pub fn stage(&self) -> ProgressStage {
        ProgressStage::from_percent(self.percent)
    }
}

pub fn goal_progress(habit: &Habit) -> GoalProgress {
    let completed = habit.completed_count();
    let ratio = if habit.goal > 0 {
        completed as f64 / f64::from(habit.goal)
    } else {
        0.0
    };
    GoalProgress {
        completed,
        goal: habit.goal,
        ratio,
        percent: (ratio * 100.0).round() as u32,
        remaining: i64::from(habit.goal) - completed as i64,
    }
}

/// Coarse bucket of goal progress, each with its own encouragement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    Start,
    Building,
    Halfway,
    FinishLine,
    AlmostThere,
    Formed,
}

impl ProgressStage {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            100..=u32::MAX => ProgressStage::Formed,
            90..=99 => ProgressStage::AlmostThere,
            75..=89 => ProgressStage::FinishLine,
            50..=74 => ProgressStage::Halfway,
            25..=49 => ProgressStage::Building,
            _ => ProgressStage::Start,
        }
    }

    pub fn message(&self, remaining: i64) -> String {
        match self {
            ProgressStage::Formed => "Habit formed! You did it!".to_string(),
            ProgressStage::AlmostThere => format!(
                "Almost there! Just {remaining} days to go. Finish strong!"
            ),
            ProgressStage::FinishLine => "The finish line is in sight. Keep going!".to_string(),
            ProgressStage::Halfway => "Halfway there! Momentum is building.".to_string(),
            ProgressStage::Building => "Building the foundation. Every day counts.".to_string(),
            ProgressStage::Start => {
                "The journey of a thousand miles begins with a single step.".to_string()
            }
        }
    }
}

/// One day of the Monday-start week view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub day: DayNumber,
    pub completed: bool,
    pub is_today: bool,
    pub is_future: bool,
}

/// The calendar week (Monday first) containing `today`.
///
/// Days before the habit's creation day are left out, so a habit created
/// mid-week yields fewer than seven entries.
pub fn week_view(habit: &Habit, today: NaiveDate, zone: DayZone) -> Vec<WeekDay> {
    let monday = date_index::week_start(today);
    let creation_day = date_index::calendar_day(habit.created_at, zone);

    (0..7)
        .map(|i| monday + Duration::days(i))
        .filter(|date| *date >= creation_day)
        .map(|date| {
            let day = date_index::day_number(date, habit.created_at, zone);
            WeekDay {
                date,
                day,
                completed: habit.is_completed(day),
                is_today: date == today,
                is_future: date > today,
            }
        })
        .collect()
}

/// One cell of a day-number history grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryCell {
    pub day: DayNumber,
    /// `ceil(day / 7)`
    pub week_number: i64,
    pub completed: bool,
    pub is_today: bool,
    pub is_future: bool,
    pub is_past: bool,
}

impl HistoryCell {
    fn new(habit: &Habit, day: DayNumber, today: DayNumber) -> Self {
        Self {
            day,
            week_number: (day + 6).div_euclid(7),
            completed: habit.is_completed(day),
            is_today: day == today,
            is_future: day > today,
            is_past: day < today,
        }
    }

    /// Only today can be marked from a history grid.
    pub fn editable(&self) -> bool {
        self.is_today
    }
}

/// A week's row of the full history grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWeek {
    pub week_number: i64,
    pub cells: Vec<HistoryCell>,
}

/// Compact grid: two weeks back to three days ahead of `today`.
pub fn recent_days(habit: &Habit, today: DayNumber) -> Vec<HistoryCell> {
    let first = (today - RECENT_LOOKBACK).max(1);
    (first..=today + RECENT_LOOKAHEAD)
        .map(|day| HistoryCell::new(habit, day, today))
        .collect()
}

/// Every day from 1 to the later of the goal and today, in rows of seven.
pub fn full_history(habit: &Habit, today: DayNumber) -> Vec<HistoryWeek> {
    let last = today.max(i64::from(habit.goal));
    let mut weeks: Vec<HistoryWeek> = Vec::new();
    for day in 1..=last {
        let cell = HistoryCell::new(habit, day, today);
        match weeks.last_mut() {
            Some(week) if week.week_number == cell.week_number => week.cells.push(cell),
            _ => weeks.push(HistoryWeek {
                week_number: cell.week_number,
                cells: vec![cell],
            }),
        }
    }
    weeks
}
