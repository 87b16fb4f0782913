//! The owned collection of habits, reflections and milestone state.
//!
//! Every mutation validates first, mutates, then writes the affected key
//! straight away. Write failures never undo the in-memory change: they are
//! logged, queued as [`Event`]s and the session carries on.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::date_index::{self, DayNumber, DayZone};
use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::events::Event;
use crate::habit::{Habit, HabitInput, DEFAULT_GOAL};
use crate::milestone::{self, MilestoneCheck, MilestoneLedger};
use crate::reflection::{Reflection, ReflectionInput};
use crate::storage::{
    Config, KeyValueStore, HABITS_KEY, LAST_PROMPT_KEY, MILESTONES_KEY, REFLECTIONS_KEY,
};

pub struct HabitStore<S: KeyValueStore> {
    storage: S,
    habits: Vec<Habit>,
    reflections: Vec<Reflection>,
    milestones: MilestoneLedger,
    last_prompt: Option<DateTime<Utc>>,
    default_goal: u32,
    zone: DayZone,
    memory_only: bool,
    events: Vec<Event>,
}

impl<S: KeyValueStore> HabitStore<S> {
    /// Load every key from `storage`.
    ///
    /// Unreadable values fall back to empty defaults. If the store does not
    /// accept writes at all, the session runs in memory only and a single
    /// [`Event::StorageUnavailable`] is queued.
    pub fn open(mut storage: S, config: &Config) -> Self {
        let mut events = Vec::new();
        let memory_only = match storage.probe() {
            Ok(()) => false,
            Err(e) => {
                tracing::warn!(error = %e, "storage unavailable, running in memory only");
                events.push(Event::StorageUnavailable {
                    message: e.to_string(),
                });
                true
            }
        };

        let mut store = Self {
            storage,
            habits: Vec::new(),
            reflections: Vec::new(),
            milestones: MilestoneLedger::default(),
            last_prompt: None,
            // A hand-edited config can still carry 0
            default_goal: match config.habits.default_goal {
                0 => DEFAULT_GOAL,
                goal => goal,
            },
            zone: config.zone(),
            memory_only,
            events,
        };

        if !memory_only {
            store.habits = store.load_json(HABITS_KEY);
            store.reflections = store.load_json(REFLECTIONS_KEY);
            store.milestones = store.load_json(MILESTONES_KEY);
            store.last_prompt = store.load_last_prompt();
        }
        tracing::info!(
            habits = store.habits.len(),
            reflections = store.reflections.len(),
            memory_only,
            "habit store opened"
        );
        store
    }

    fn load_raw(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    fn load_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.load_raw(key) else {
            return T::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "discarding malformed stored value");
            T::default()
        })
    }

    fn load_last_prompt(&self) -> Option<DateTime<Utc>> {
        let raw = self.load_raw(LAST_PROMPT_KEY)?;
        match DateTime::parse_from_rfc3339(raw.trim().trim_matches('"')) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed reflection prompt time");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: String) {
        if self.memory_only {
            return;
        }
        if let Err(e) = self.storage.set(key, &value) {
            tracing::warn!(key, error = %e, "failed to persist value");
            self.events.push(match e {
                StorageError::QuotaExceeded { key } => Event::StorageFull { key },
                other => Event::WriteFailed {
                    key: key.to_string(),
                    message: other.to_string(),
                },
            });
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.write(key, json),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize value");
                self.events.push(Event::WriteFailed {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn save_habits(&mut self) {
        let habits = std::mem::take(&mut self.habits);
        self.write_json(HABITS_KEY, &habits);
        self.habits = habits;
    }

    fn save_reflections(&mut self) {
        let reflections = std::mem::take(&mut self.reflections);
        self.write_json(REFLECTIONS_KEY, &reflections);
        self.reflections = reflections;
    }

    fn save_milestones(&mut self) {
        let ledger = std::mem::take(&mut self.milestones);
        self.write_json(MILESTONES_KEY, &ledger);
        self.milestones = ledger;
    }

    fn save_last_prompt(&mut self) {
        if let Some(at) = self.last_prompt {
            self.write(LAST_PROMPT_KEY, at.to_rfc3339());
        }
    }

    /// Creation-time ids, bumped past any existing id so they stay unique
    /// and increasing even when two are made in the same millisecond.
    fn next_id(now: DateTime<Utc>, existing: impl Iterator<Item = i64>) -> i64 {
        let candidate = now.timestamp_millis();
        match existing.max() {
            Some(max) if max >= candidate => max + 1,
            _ => candidate,
        }
    }

    /// Create a habit.
    ///
    /// # Errors
    /// [`ValidationError::EmptyName`] if the name is blank; nothing is
    /// stored in that case.
    pub fn add_habit(&mut self, input: HabitInput, now: DateTime<Utc>) -> Result<&Habit> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let goal = input
            .goal
            .filter(|g| *g > 0)
            .and_then(|g| u32::try_from(g).ok())
            .unwrap_or(self.default_goal);
        let habit = Habit {
            id: Self::next_id(now, self.habits.iter().map(|h| h.id)),
            name: name.to_string(),
            start_date: input
                .start_date
                .unwrap_or_else(|| date_index::calendar_day(now, self.zone)),
            goal,
            why: input.why.as_deref().unwrap_or_default().trim().to_string(),
            created_at: now,
            completed_days: Default::default(),
            best_streak: 0,
        };
        tracing::debug!(habit_id = habit.id, name = %habit.name, goal, "habit added");
        self.events.push(Event::HabitAdded {
            habit_id: habit.id,
            name: habit.name.clone(),
            at: now,
        });

        self.habits.push(habit);
        self.save_habits();
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Remove a habit. Its milestone ledger entry is left behind.
    pub fn delete_habit(&mut self, id: i64, now: DateTime<Utc>) -> Result<Habit> {
        let pos = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(CoreError::NotFound(id))?;
        let removed = self.habits.remove(pos);
        tracing::debug!(habit_id = id, "habit deleted");
        self.events.push(Event::HabitDeleted { habit_id: id, at: now });
        self.save_habits();
        Ok(removed)
    }

    /// Flip completion of `day` for a habit. Returns the new completion flag.
    pub fn toggle_day(&mut self, id: i64, day: DayNumber) -> Result<bool> {
        if day < 1 {
            return Err(ValidationError::InvalidDay(day).into());
        }
        let habit = self
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(CoreError::NotFound(id))?;

        let completed = habit.toggle(day);
        let event = Event::DayToggled {
            habit_id: id,
            day,
            completed,
            current_streak: habit.current_streak(),
            best_streak: habit.best_streak,
        };
        tracing::debug!(habit_id = id, day, completed, "day toggled");
        self.events.push(event);
        self.save_habits();
        Ok(completed)
    }

    /// Store a reflection at the front of the list and restart the prompt clock.
    ///
    /// # Errors
    /// [`ValidationError::EmptyReflection`] if all three fields are blank.
    pub fn save_reflection(
        &mut self,
        input: ReflectionInput,
        now: DateTime<Utc>,
    ) -> Result<&Reflection> {
        let input = input.validate()?;
        let id = Self::next_id(now, self.reflections.iter().map(|r| r.id));
        self.reflections.insert(0, Reflection::from_input(id, now, input));
        self.events.push(Event::ReflectionSaved {
            reflection_id: id,
            at: now,
        });
        self.save_reflections();

        self.last_prompt = Some(now);
        self.save_last_prompt();
        Ok(&self.reflections[0])
    }

    /// Start the reflection clock without prompting.
    pub fn initialize_prompt(&mut self, now: DateTime<Utc>) {
        self.last_prompt = Some(now);
        self.save_last_prompt();
    }

    /// Run a milestone pass and persist the ledger if it changed.
    pub fn check_milestones(&mut self) -> Option<milestone::Milestone> {
        if self.habits.is_empty() {
            return None;
        }
        let MilestoneCheck {
            milestone,
            ledger_changed,
        } = milestone::check(&self.habits, &mut self.milestones);
        if ledger_changed {
            self.save_milestones();
        }
        milestone
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: i64) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn reflections(&self) -> &[Reflection] {
        &self.reflections
    }

    pub fn milestones(&self) -> &MilestoneLedger {
        &self.milestones
    }

    pub fn last_prompt(&self) -> Option<DateTime<Utc>> {
        self.last_prompt
    }

    pub fn zone(&self) -> DayZone {
        self.zone
    }

    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Events queued since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
