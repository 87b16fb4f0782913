//! Caller-owned delayed actions.
//!
//! The tracker never sleeps or spawns timers. It schedules tasks here and
//! the caller advances time, which keeps tests deterministic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// What a scheduled task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Open the weekly reflection prompt
    ShowReflectionPrompt,
    /// Hide whatever milestone notification is on screen
    DismissMilestone,
}

pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub kind: TaskKind,
    pub due_at: DateTime<Utc>,
}

/// Pending tasks ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: TaskId,
    pending: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, kind: TaskKind, due_at: DateTime<Utc>) -> TaskId {
        self.next_id += 1;
        let task = ScheduledTask {
            id: self.next_id,
            kind,
            due_at,
        };
        let pos = self.pending.partition_point(|t| t.due_at <= due_at);
        self.pending.insert(pos, task);
        self.next_id
    }

    pub fn schedule_in(&mut self, kind: TaskKind, now: DateTime<Utc>, delay: Duration) -> TaskId {
        self.schedule_at(kind, now + delay)
    }

    /// Drop a pending task. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Remove and return every task due at or before `now`, in firing order.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> Vec<ScheduledTask> {
        let due = self.pending.partition_point(|t| t.due_at <= now);
        self.pending.drain(..due).collect()
    }

    pub fn pending(&self) -> &[ScheduledTask] {
        &self.pending
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.first().map(|t| t.due_at)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
