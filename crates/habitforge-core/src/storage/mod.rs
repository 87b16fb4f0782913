//! Key-value persistence for tracker snapshots.
//!
//! The tracker only ever reads and writes whole JSON values under a handful
//! of string keys, so any backend that can do `get`/`set` will do.

mod config;
pub mod memory;
pub mod sqlite;

pub use config::Config;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Ordered sequence of habit records.
pub const HABITS_KEY: &str = "habits";
/// Reflections, most recent first.
pub const REFLECTIONS_KEY: &str = "reflections";
/// `habit-<id>` to shown thresholds.
pub const MILESTONES_KEY: &str = "shownMilestones";
/// RFC 3339 instant of the last reflection prompt.
pub const LAST_PROMPT_KEY: &str = "lastReflectionPrompt";

const PROBE_KEY: &str = "__storage_probe__";

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Check that the store accepts writes by writing and removing a probe key.
    fn probe(&mut self) -> Result<(), StorageError> {
        self.set(PROBE_KEY, PROBE_KEY)
            .and_then(|_| self.remove(PROBE_KEY))
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn probe(&mut self) -> Result<(), StorageError> {
        (**self).probe()
    }
}

/// Returns the data directory, creating it if needed.
///
/// `HABITFORGE_DATA_DIR` wins when set. Otherwise `~/.config/habitforge`,
/// or `~/.config/habitforge-dev` with `HABITFORGE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("HABITFORGE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITFORGE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitforge-dev")
            } else {
                base_dir.join("habitforge")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
