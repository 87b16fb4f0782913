//! # habitforge Core Library
//!
//! This library provides the core logic for the habitforge habit tracker:
//! day numbering, streaks, completion windows, the composite discipline
//! score, milestone notifications and weekly reflections. Front ends (the
//! bundled CLI, or anything else) only render the plain view models it
//! returns.
//!
//! ## Architecture
//!
//! - **Scoring engine**: pure functions over [`Habit`] records
//!   ([`streak`], [`window`], [`discipline`], [`milestone`])
//! - **Store**: [`HabitStore`] owns all records and writes them through a
//!   [`KeyValueStore`] after every mutation
//! - **Tracker**: [`Tracker`] drives a session, owns the [`Scheduler`] for
//!   delayed actions and produces a [`TrackerView`] after each action
//!
//! ## Key Components
//!
//! - [`Tracker`]: Session controller
//! - [`HabitStore`]: Habit, reflection and milestone persistence
//! - [`Config`]: Application configuration management
//! - [`SqliteStore`]: On-disk key-value storage

pub mod date_index;
pub mod discipline;
pub mod error;
pub mod events;
pub mod habit;
pub mod milestone;
pub mod reflection;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod streak;
pub mod tracker;
pub mod view;
pub mod window;

pub use date_index::{DayNumber, DayZone};
pub use discipline::DisciplineScore;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use habit::{Habit, HabitInput, DEFAULT_GOAL};
pub use milestone::{Milestone, MilestoneLedger, MILESTONES};
pub use reflection::{PromptCheck, Reflection, ReflectionInput};
pub use scheduler::{ScheduledTask, Scheduler, TaskKind};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use store::HabitStore;
pub use tracker::Tracker;
pub use view::{DailyTask, DailyTasks, DayView, HabitCard, ScoreView, TrackerView};
pub use window::{GoalProgress, HistoryCell, HistoryWeek, ProgressStage, WeekDay};
