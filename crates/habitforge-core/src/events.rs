use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_index::DayNumber;

/// Every state change in the tracker produces an Event.
/// The front end drains them after each action; storage problems among
/// them are the ones that must be shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitAdded {
        habit_id: i64,
        name: String,
        at: DateTime<Utc>,
    },
    HabitDeleted {
        habit_id: i64,
        at: DateTime<Utc>,
    },
    DayToggled {
        habit_id: i64,
        day: DayNumber,
        completed: bool,
        current_streak: u32,
        best_streak: u32,
    },
    MilestoneShown {
        habit_id: i64,
        threshold: u32,
        at: DateTime<Utc>,
    },
    MilestoneDismissed {
        /// True when the auto-dismiss timer fired, false for a manual dismiss
        automatic: bool,
        at: DateTime<Utc>,
    },
    ReflectionSaved {
        reflection_id: i64,
        at: DateTime<Utc>,
    },
    ReflectionPromptOpened {
        at: DateTime<Utc>,
    },
    ReflectionPromptClosed {
        at: DateTime<Utc>,
    },
    /// Storage could not be used at startup; the session runs in memory.
    StorageUnavailable {
        message: String,
    },
    /// The store ran out of space. In-memory state is kept.
    StorageFull {
        key: String,
    },
    /// A write failed for another reason. In-memory state is kept.
    WriteFailed {
        key: String,
        message: String,
    },
}

impl Event {
    /// Storage problems the user has to be told about.
    pub fn is_problem(&self) -> bool {
        matches!(
            self,
            Event::StorageUnavailable { .. } | Event::StorageFull { .. } | Event::WriteFailed { .. }
        )
    }

    /// Text for problems, `None` for ordinary events.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Event::StorageUnavailable { .. } => Some(
                "Storage is not available. Changes will be lost when this session ends."
                    .to_string(),
            ),
            Event::StorageFull { .. } => Some(
                "Storage limit reached. Please delete old habits or reflections.".to_string(),
            ),
            Event::WriteFailed { key, message } => {
                Some(format!("Could not save {key}: {message}"))
            }
            _ => None,
        }
    }
}
