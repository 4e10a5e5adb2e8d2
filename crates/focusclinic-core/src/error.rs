//! Core error types for focusclinic-core.
//!
//! Session, preset, configuration, and storage errors are separate enums
//! so callers can match on the area that failed; `CoreError` is the
//! umbrella type returned at the crate boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the session scheduler state machine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `start` was called while a session is Running or Paused.
    #[error("a session is already in progress")]
    AlreadyRunning,

    /// A query or command that needs a session was issued while Idle.
    #[error("no active session")]
    NoActiveSession,

    /// A slot index escaped the fixed sequence bounds. Unreachable through
    /// the public API; surfaced instead of panicking.
    #[error("slot index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Preset validation and lookup errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("preset name must not be empty")]
    EmptyName,

    #[error("{field} time must be at least one minute")]
    ZeroDuration { field: &'static str },

    #[error("no preset named '{0}'")]
    UnknownPreset(String),
}

/// Configuration load/save errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("cannot parse '{value}' for config key '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Preset store and event journal errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open journal at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("journal query failed: {0}")]
    QueryFailed(String),

    #[error("failed to read preset store at {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("failed to write preset store at {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Umbrella error type for focusclinic-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("preset error: {0}")]
    Preset(#[from] PresetError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
