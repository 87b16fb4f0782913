//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default goal for new habits
//! - Milestone notification timing
//! - Reflection prompt interval and delay
//! - Timezone used to turn instants into calendar days
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::date_index::DayZone;
use crate::error::ConfigError;
use crate::habit::DEFAULT_GOAL;
use crate::reflection::DEFAULT_INTERVAL_DAYS;

/// Habit creation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitsConfig {
    #[serde(default = "default_goal")]
    pub default_goal: u32,
}

/// Milestone notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestonesConfig {
    /// Seconds before a shown milestone hides itself.
    #[serde(default = "default_dismiss_after_secs")]
    pub dismiss_after_secs: u32,
}

/// Weekly reflection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionConfig {
    #[serde(default = "default_interval_days")]
    pub interval_days: u32,
    /// Seconds between startup and opening a due prompt.
    #[serde(default = "default_prompt_delay_secs")]
    pub prompt_delay_secs: u32,
}

/// Display configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Minutes east of UTC. Unset means the system's local time zone.
    #[serde(default)]
    pub timezone_offset_minutes: Option<i32>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub habits: HabitsConfig,
    #[serde(default)]
    pub milestones: MilestonesConfig,
    #[serde(default)]
    pub reflection: ReflectionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_goal() -> u32 {
    DEFAULT_GOAL
}
fn default_dismiss_after_secs() -> u32 {
    10
}
fn default_interval_days() -> u32 {
    DEFAULT_INTERVAL_DAYS as u32
}
fn default_prompt_delay_secs() -> u32 {
    2
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            default_goal: default_goal(),
        }
    }
}

impl Default for MilestonesConfig {
    fn default() -> Self {
        Self {
            dismiss_after_secs: default_dismiss_after_secs(),
        }
    }
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            interval_days: default_interval_days(),
            prompt_delay_secs: default_prompt_delay_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                // Optional numbers: "none" clears them
                serde_json::Value::Number(_) | serde_json::Value::Null
                    if value.eq_ignore_ascii_case("none") =>
                {
                    serde_json::Value::Null
                }
                serde_json::Value::Number(_) | serde_json::Value::Null => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        if updated.habits.default_goal == 0 {
            return Err(invalid("goal must be at least 1 day".into()));
        }
        if updated.display.timezone_offset_minutes.is_some() && updated.zone() == DayZone::Local {
            return Err(invalid("offset must be within 24 hours of UTC".into()));
        }
        *self = updated;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Zone used to map instants to calendar days.
    ///
    /// Without a configured offset each instant uses the local zone's rules
    /// for that instant, so daylight-saving changes move the offset with it.
    pub fn zone(&self) -> DayZone {
        self.display
            .timezone_offset_minutes
            .and_then(DayZone::east_minutes)
            .unwrap_or(DayZone::Local)
    }

    pub fn milestone_dismiss_delay(&self) -> Duration {
        Duration::seconds(i64::from(self.milestones.dismiss_after_secs))
    }

    pub fn reflection_prompt_delay(&self) -> Duration {
        Duration::seconds(i64::from(self.reflection.prompt_delay_secs))
    }
}
