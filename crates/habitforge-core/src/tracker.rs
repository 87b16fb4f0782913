//! Session controller: one per running front end.
//!
//! Owns the [`HabitStore`], the pending timers and the transient display
//! state (milestone banner, reflection prompt). Every action mutates through
//! the store, recomputes derived state and returns a fresh [`TrackerView`].
//! Time is always passed in; nothing here reads the clock.

use chrono::{DateTime, Utc};

use crate::date_index::DayNumber;
use crate::discipline;
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::habit::{Habit, HabitInput};
use crate::milestone::Milestone;
use crate::reflection::{self, PromptCheck, Reflection, ReflectionInput};
use crate::scheduler::{ScheduledTask, Scheduler, TaskKind};
use crate::storage::{Config, KeyValueStore};
use crate::store::HabitStore;
use crate::view::{self, DayView, HabitCard, TrackerView};

pub struct Tracker<S: KeyValueStore> {
    store: HabitStore<S>,
    config: Config,
    scheduler: Scheduler,
    events: Vec<Event>,
    milestone: Option<Milestone>,
    reflection_prompt_open: bool,
    day_view: DayView,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load state and run the startup checks: milestones first, then the
    /// weekly reflection prompt.
    pub fn start(storage: S, config: Config, now: DateTime<Utc>) -> Self {
        let store = HabitStore::open(storage, &config);
        let mut tracker = Self {
            store,
            config,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            milestone: None,
            reflection_prompt_open: false,
            day_view: DayView::Today,
        };
        tracker.check_milestones(now);
        tracker.check_reflection(now);
        tracker.collect_store_events();
        tracker
    }

    fn collect_store_events(&mut self) {
        let events = self.store.take_events();
        self.events.extend(events);
    }

    fn check_milestones(&mut self, now: DateTime<Utc>) {
        if let Some(milestone) = self.store.check_milestones() {
            self.show_milestone(milestone, now);
        }
    }

    /// Put a milestone on screen and schedule its auto-dismiss.
    ///
    /// An earlier dismiss that is still pending is not cancelled, so it can
    /// hide this milestone before its own timer runs out.
    fn show_milestone(&mut self, milestone: Milestone, now: DateTime<Utc>) {
        self.events.push(Event::MilestoneShown {
            habit_id: milestone.habit_id,
            threshold: milestone.threshold,
            at: now,
        });
        self.milestone = Some(milestone);
        self.scheduler.schedule_in(
            TaskKind::DismissMilestone,
            now,
            self.config.milestone_dismiss_delay(),
        );
    }

    fn check_reflection(&mut self, now: DateTime<Utc>) {
        let interval = i64::from(self.config.reflection.interval_days);
        match reflection::check_weekly(self.store.last_prompt(), now, interval) {
            PromptCheck::Initialize => self.store.initialize_prompt(now),
            PromptCheck::Due => {
                tracing::info!("weekly reflection due");
                self.scheduler.schedule_in(
                    TaskKind::ShowReflectionPrompt,
                    now,
                    self.config.reflection_prompt_delay(),
                );
            }
            PromptCheck::NotDue { days_remaining } => {
                tracing::debug!(days_remaining, "weekly reflection not due");
            }
        }
    }

    pub fn add_habit(&mut self, input: HabitInput, now: DateTime<Utc>) -> Result<TrackerView> {
        let result = self.store.add_habit(input, now).map(|_| ());
        self.collect_store_events();
        result?;
        Ok(self.view(now))
    }

    /// Delete a habit. Asking the user to confirm is the caller's job.
    pub fn delete_habit(&mut self, id: i64, now: DateTime<Utc>) -> Result<TrackerView> {
        let result = self.store.delete_habit(id, now).map(|_| ());
        self.collect_store_events();
        result?;
        Ok(self.view(now))
    }

    /// Flip a day for a habit, then look for a newly crossed milestone.
    pub fn toggle_day(&mut self, id: i64, day: DayNumber, now: DateTime<Utc>) -> Result<TrackerView> {
        let result = self.store.toggle_day(id, day);
        self.collect_store_events();
        result?;
        self.check_milestones(now);
        self.collect_store_events();
        Ok(self.view(now))
    }

    /// Toggle the day shown by the task list. Tomorrow is read-only.
    pub fn toggle_from_tasks(
        &mut self,
        id: i64,
        day: DayView,
        now: DateTime<Utc>,
    ) -> Result<TrackerView> {
        if day != DayView::Today {
            return Err(ValidationError::InvalidValue {
                field: "day".to_string(),
                message: "tomorrow is a preview and cannot be marked".to_string(),
            }
            .into());
        }
        let habit = self.store.habit(id).ok_or(CoreError::NotFound(id))?;
        let target = habit.days_since_creation(now, self.store.zone()) + day.offset();
        self.toggle_day(id, target, now)
    }

    pub fn save_reflection(
        &mut self,
        input: ReflectionInput,
        now: DateTime<Utc>,
    ) -> Result<TrackerView> {
        let result = self.store.save_reflection(input, now).map(|_| ());
        self.collect_store_events();
        result?;
        self.close_reflection_prompt(now);
        Ok(self.view(now))
    }

    pub fn open_reflection_prompt(&mut self, now: DateTime<Utc>) {
        if !self.reflection_prompt_open {
            self.reflection_prompt_open = true;
            self.events.push(Event::ReflectionPromptOpened { at: now });
        }
    }

    pub fn close_reflection_prompt(&mut self, now: DateTime<Utc>) {
        if self.reflection_prompt_open {
            self.reflection_prompt_open = false;
            self.events.push(Event::ReflectionPromptClosed { at: now });
        }
    }

    pub fn dismiss_milestone(&mut self, now: DateTime<Utc>) {
        if self.milestone.take().is_some() {
            self.events.push(Event::MilestoneDismissed {
                automatic: false,
                at: now,
            });
        }
    }

    /// Fire every scheduled task due by `now` and return them.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<ScheduledTask> {
        let fired = self.scheduler.advance_to(now);
        for task in &fired {
            match task.kind {
                TaskKind::ShowReflectionPrompt => self.open_reflection_prompt(task.due_at),
                TaskKind::DismissMilestone => {
                    if self.milestone.take().is_some() {
                        self.events.push(Event::MilestoneDismissed {
                            automatic: true,
                            at: task.due_at,
                        });
                    }
                }
            }
        }
        fired
    }

    pub fn set_day_view(&mut self, day: DayView) {
        self.day_view = day;
    }

    /// Recompute the output model from current state.
    pub fn view(&self, now: DateTime<Utc>) -> TrackerView {
        let zone = self.store.zone();
        let habits = self.store.habits();
        TrackerView {
            habits: habits
                .iter()
                .map(|h| HabitCard::build(h, now, zone))
                .collect(),
            score: discipline::score(habits, now, zone).into(),
            tasks: view::daily_tasks(habits, self.day_view, now, zone),
            milestone: self.milestone.clone(),
            reflection_prompt_open: self.reflection_prompt_open,
        }
    }

    /// Events since the last call, storage problems included.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn habits(&self) -> &[Habit] {
        self.store.habits()
    }

    pub fn reflections(&self) -> &[Reflection] {
        self.store.reflections()
    }

    pub fn milestone(&self) -> Option<&Milestone> {
        self.milestone.as_ref()
    }

    pub fn reflection_prompt_open(&self) -> bool {
        self.reflection_prompt_open
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &HabitStore<S> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn config() -> Config {
        let mut cfg = Config::default();
        cfg.display.timezone_offset_minutes = Some(0);
        cfg
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    fn day(n: i64) -> DateTime<Utc> {
        t0() + Duration::days(n - 1)
    }

    #[test]
    fn empty_tracker_scores_zero() {
        let tracker = Tracker::start(MemoryStore::new(), config(), t0());
        let view = tracker.view(t0());
        assert_eq!(view.score.total, 0);
        assert!(view.habits.is_empty());
        assert!(view.milestone.is_none());
    }

    #[test]
    fn three_days_in_a_row() {
        let mut tracker = Tracker::start(MemoryStore::new(), config(), t0());
        tracker.add_habit(HabitInput::new("Push-ups"), t0()).unwrap();
        let id = tracker.habits()[0].id;
        for n in 1..=3 {
            tracker.toggle_from_tasks(id, DayView::Today, day(n)).unwrap();
        }
        let view = tracker.view(day(3));
        let card = &view.habits[0];
        assert_eq!(card.current_streak, 3);
        assert_eq!(card.best_streak, 3);
        assert_eq!(card.progress.label(), "3/66");
        assert_eq!(card.progress.percent, 5);
        assert_eq!(view.score.total, 100);
        assert!(view.tasks.tasks[0].completed);
    }

    #[test]
    fn tomorrow_cannot_be_marked() {
        let mut tracker = Tracker::start(MemoryStore::new(), config(), t0());
        tracker.add_habit(HabitInput::new("Push-ups"), t0()).unwrap();
        let id = tracker.habits()[0].id;
        let err = tracker
            .toggle_from_tasks(id, DayView::Tomorrow, t0())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(tracker.habits()[0].completed_days.is_empty());
    }

    #[test]
    fn milestone_banner_auto_dismisses() {
        let mut tracker = Tracker::start(MemoryStore::new(), config(), t0());
        tracker.add_habit(HabitInput::new("Walk"), t0()).unwrap();
        let id = tracker.habits()[0].id;
        for n in 1..=6 {
            let view = tracker.toggle_day(id, n, day(7)).unwrap();
            assert!(view.milestone.is_none());
        }
        let view = tracker.toggle_day(id, 7, day(7)).unwrap();
        assert_eq!(view.milestone.unwrap().threshold, 7);

        assert!(tracker.advance(day(7) + Duration::seconds(9)).is_empty());
        assert!(tracker.milestone().is_some());
        assert_eq!(tracker.advance(day(7) + Duration::seconds(10)).len(), 1);
        assert!(tracker.milestone().is_none());

        let events = tracker.drain_events();
        assert!(events.contains(&Event::MilestoneDismissed {
            automatic: true,
            at: day(7) + Duration::seconds(10),
        }));
    }

    #[test]
    fn stale_dismiss_hides_newer_milestone() {
        let mut tracker = Tracker::start(MemoryStore::new(), config(), t0());
        tracker.add_habit(HabitInput::new("A"), t0()).unwrap();
        tracker.add_habit(HabitInput::new("B"), t0()).unwrap();
        let (a, b) = (tracker.habits()[0].id, tracker.habits()[1].id);
        let now = day(8);
        for n in 1..=7 {
            tracker.toggle_day(a, n, now).unwrap();
        }
        for n in 1..=6 {
            tracker.toggle_day(b, n, now).unwrap();
        }
        let later = now + Duration::seconds(6);
        let view = tracker.toggle_day(b, 7, later).unwrap();
        assert_eq!(view.milestone.as_ref().unwrap().habit_id, b);

        // the first banner's timer fires 4s into the second banner
        tracker.advance(now + Duration::seconds(10));
        assert!(tracker.milestone().is_none());
        assert_eq!(tracker.scheduler().pending().len(), 1);
    }

    #[test]
    fn manual_dismiss() {
        let mut tracker = Tracker::start(MemoryStore::new(), config(), t0());
        tracker.add_habit(HabitInput::new("Walk"), t0()).unwrap();
        let id = tracker.habits()[0].id;
        for n in 1..=7 {
            tracker.toggle_day(id, n, day(7)).unwrap();
        }
        tracker.dismiss_milestone(day(7));
        assert!(tracker.view(day(7)).milestone.is_none());
    }

    #[test]
    fn first_start_initializes_prompt_clock() {
        let tracker = Tracker::start(MemoryStore::new(), config(), t0());
        assert_eq!(tracker.store().last_prompt(), Some(t0()));
        assert!(tracker.scheduler().is_empty());
    }

    #[test]
    fn reflection_prompt_opens_after_delay_when_due() {
        let first = Tracker::start(MemoryStore::new(), config(), t0());
        let storage = first.store().storage().clone();

        let later = t0() + Duration::days(7);
        let mut tracker = Tracker::start(storage, config(), later);
        assert!(!tracker.reflection_prompt_open());
        tracker.advance(later + Duration::seconds(1));
        assert!(!tracker.reflection_prompt_open());
        tracker.advance(later + Duration::seconds(2));
        assert!(tracker.reflection_prompt_open());

        let input = ReflectionInput {
            worked: "kept the streak".into(),
            ..Default::default()
        };
        let view = tracker.save_reflection(input, later).unwrap();
        assert!(!view.reflection_prompt_open);
        assert_eq!(tracker.reflections()[0].didnt, "");
        assert_eq!(tracker.store().last_prompt(), Some(later));
    }

    #[test]
    fn prompt_not_due_within_a_week() {
        let first = Tracker::start(MemoryStore::new(), config(), t0());
        let storage = first.store().storage().clone();
        let tracker = Tracker::start(storage, config(), t0() + Duration::days(6));
        assert!(tracker.scheduler().is_empty());
    }

    #[test]
    fn milestone_checked_at_startup() {
        let mut first = Tracker::start(MemoryStore::new(), config(), t0());
        first.add_habit(HabitInput::new("Walk"), t0()).unwrap();
        let id = first.habits()[0].id;
        let mut storage = first.store().storage().clone();

        // completions written by an older session that never checked
        let mut habits: Vec<Habit> = first.habits().to_vec();
        habits[0].completed_days = (1..=21).collect();
        storage.insert_raw(
            crate::storage::HABITS_KEY,
            &serde_json::to_string(&habits).unwrap(),
        );

        let tracker = Tracker::start(storage, config(), day(21));
        let milestone = tracker.milestone().unwrap();
        assert_eq!((milestone.habit_id, milestone.threshold), (id, 21));
    }

    #[test]
    fn write_failures_surface_as_events() {
        let mut tracker = Tracker::start(MemoryStore::with_quota(64), config(), t0());
        tracker.drain_events();
        tracker
            .add_habit(HabitInput::new("A habit with a long enough name"), t0())
            .unwrap();
        let problems: Vec<Event> = tracker
            .drain_events()
            .into_iter()
            .filter(Event::is_problem)
            .collect();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].user_message().unwrap().contains("Storage limit"));
        assert_eq!(tracker.habits().len(), 1);
    }
}
