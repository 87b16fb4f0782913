//! Core error types for habitforge-core.
//!
//! Every failure the tracker can hit is expressed here with thiserror.
//! None of them are fatal to a running session: validation errors abort
//! the single operation, storage errors are recovered and surfaced as
//! notices by the tracker.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitforge-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before any state was touched
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No habit with the given id
    #[error("Habit {0} not found")]
    NotFound(i64),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit name empty after trimming
    #[error("Please enter a habit name")]
    EmptyName,

    /// All three reflection fields empty after trimming
    #[error("Please fill in at least one field")]
    EmptyReflection,

    /// Day numbers start at 1 (the creation day)
    #[error("Invalid day number {0}: days are numbered from 1")]
    InvalidDay(i64),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage could not be reached at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused a write because it is full
    #[error("Storage limit reached while writing '{key}'")]
    QuotaExceeded { key: String },

    /// A write failed for any other reason
    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Stored data could not be read or parsed
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Failed to open the SQLite database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Underlying SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
