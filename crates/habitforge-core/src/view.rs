//! Plain data handed to whatever renders the tracker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date_index::{self, DayNumber, DayZone};
use crate::discipline::DisciplineScore;
use crate::habit::Habit;
use crate::milestone::Milestone;
use crate::window::{self, GoalProgress, HistoryCell, ProgressStage, WeekDay};

pub const QUOTES: [&str; 12] = [
    "Success is the sum of small efforts repeated day in and day out.",
    "The secret of getting ahead is getting started.",
    "You don't have to be great to start, but you have to start to be great.",
    "Small daily improvements over time lead to stunning results.",
    "Discipline is choosing between what you want now and what you want most.",
    "The only bad workout is the one that didn't happen.",
    "Your future self will thank you for the habits you build today.",
    "Every master was once a disaster who kept going.",
    "Motivation gets you started, habit keeps you going.",
    "Don't break the chain. Keep showing up.",
    "Excellence is not a destination; it is a continuous journey.",
    "You are what you repeatedly do. Excellence is not an act, but a habit.",
];

/// Quote shown on a habit's card, fixed per habit id.
pub fn quote_for(habit_id: i64) -> &'static str {
    QUOTES[habit_id.rem_euclid(QUOTES.len() as i64) as usize]
}

/// Which day the task list is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayView {
    #[default]
    Today,
    Tomorrow,
}

impl DayView {
    pub fn offset(&self) -> DayNumber {
        match self {
            DayView::Today => 0,
            DayView::Tomorrow => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayView::Today => "Today",
            DayView::Tomorrow => "Tomorrow",
        }
    }
}

/// Score with the per-component percentages shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    pub total: u32,
    pub consistency_percent: u32,
    pub weekly_percent: u32,
    pub stability_percent: u32,
}

impl From<DisciplineScore> for ScoreView {
    fn from(score: DisciplineScore) -> Self {
        Self {
            total: score.total,
            consistency_percent: score.consistency_percent(),
            weekly_percent: score.weekly_percent(),
            stability_percent: score.stability_percent(),
        }
    }
}

/// One row of the today/tomorrow task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub habit_id: i64,
    pub name: String,
    pub why: String,
    pub target_day: DayNumber,
    pub current_streak: u32,
    pub best_streak: u32,
    pub completed: bool,
    /// Tomorrow is a preview only
    pub toggleable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTasks {
    pub day: DayView,
    pub tasks: Vec<DailyTask>,
    pub completed: usize,
    pub total: usize,
}

pub fn daily_tasks(
    habits: &[Habit],
    day: DayView,
    now: DateTime<Utc>,
    zone: DayZone,
) -> DailyTasks {
    let tasks: Vec<DailyTask> = habits
        .iter()
        .map(|habit| {
            let target_day = habit.days_since_creation(now, zone) + day.offset();
            DailyTask {
                habit_id: habit.id,
                name: habit.name.clone(),
                why: habit.why.clone(),
                target_day,
                current_streak: habit.current_streak(),
                best_streak: habit.best_streak,
                completed: habit.is_completed(target_day),
                toggleable: day == DayView::Today,
            }
        })
        .collect();

    DailyTasks {
        day,
        completed: tasks.iter().filter(|t| t.completed).count(),
        total: tasks.len(),
        tasks,
    }
}

/// Everything a habit card shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCard {
    pub id: i64,
    pub name: String,
    pub why: String,
    pub start_date: NaiveDate,
    pub days_since_creation: DayNumber,
    pub current_streak: u32,
    pub best_streak: u32,
    pub progress: GoalProgress,
    pub stage: ProgressStage,
    pub stage_message: String,
    pub quote: String,
    pub week: Vec<WeekDay>,
    pub recent: Vec<HistoryCell>,
}

impl HabitCard {
    pub fn build(habit: &Habit, now: DateTime<Utc>, zone: DayZone) -> Self {
        let today = habit.days_since_creation(now, zone);
        let progress = window::goal_progress(habit);
        let stage = progress.stage();
        Self {
            id: habit.id,
            name: habit.name.clone(),
            why: habit.why.clone(),
            start_date: habit.start_date,
            days_since_creation: today,
            current_streak: habit.current_streak(),
            best_streak: habit.best_streak,
            stage_message: stage.message(progress.remaining),
            stage,
            progress,
            quote: quote_for(habit.id).to_string(),
            week: window::week_view(habit, date_index::calendar_day(now, zone), zone),
            recent: window::recent_days(habit, today),
        }
    }
}

/// Full output model after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerView {
    pub habits: Vec<HabitCard>,
    pub score: ScoreView,
    pub tasks: DailyTasks,
    pub milestone: Option<Milestone>,
    pub reflection_prompt_open: bool,
}
