//! Weekly reflections and the prompt that asks for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Days between reflection prompts.
pub const DEFAULT_INTERVAL_DAYS: i64 = 7;

/// A saved weekly reflection. Never edited once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: i64,
    /// When the reflection was saved
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub worked: String,
    #[serde(default)]
    pub didnt: String,
    #[serde(default)]
    pub improve: String,
}

/// The three free-text answers as typed.
#[derive(Debug, Clone, Default)]
pub struct ReflectionInput {
    pub worked: String,
    pub didnt: String,
    pub improve: String,
}

impl ReflectionInput {
    /// Trim all fields, rejecting the input if nothing is left.
    pub fn validate(self) -> Result<ReflectionInput, ValidationError> {
        let trimmed = ReflectionInput {
            worked: self.worked.trim().to_string(),
            didnt: self.didnt.trim().to_string(),
            improve: self.improve.trim().to_string(),
        };
        if trimmed.worked.is_empty() && trimmed.didnt.is_empty() && trimmed.improve.is_empty() {
            return Err(ValidationError::EmptyReflection);
        }
        Ok(trimmed)
    }
}

impl Reflection {
    pub fn from_input(id: i64, date: DateTime<Utc>, input: ReflectionInput) -> Self {
        Self {
            id,
            date,
            worked: input.worked,
            didnt: input.didnt,
            improve: input.improve,
        }
    }

    /// Non-empty sections with their display labels, in display order.
    pub fn sections(&self) -> Vec<(&'static str, &str)> {
        [
            ("What worked", self.worked.as_str()),
            ("What didn't", self.didnt.as_str()),
            ("What will improve", self.improve.as_str()),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .collect()
    }
}

/// Result of checking whether a reflection prompt is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptCheck {
    /// No prompt was ever issued: start the clock at now, do not prompt.
    Initialize,
    /// Enough whole days have passed since the last prompt.
    Due,
    NotDue { days_remaining: i64 },
}

/// Decide whether to prompt for a reflection.
pub fn check_weekly(
    last_prompt: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval_days: i64,
) -> PromptCheck {
    let Some(last) = last_prompt else {
        return PromptCheck::Initialize;
    };
    let days_since = (now - last).num_days();
    if days_since >= interval_days {
        PromptCheck::Due
    } else {
        PromptCheck::NotDue {
            days_remaining: interval_days - days_since,
        }
    }
}
