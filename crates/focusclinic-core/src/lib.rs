//! # Focus Clinic Core Library
//!
//! Core business logic for Focus Clinic, a personal focus/break timer
//! that cycles through a fixed five-phase sequence (focus, meditation,
//! focus, meditation, rest) with durations drawn from a user-selected
//! preset. The CLI binary is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Session scheduler**: a state machine that owns the slot index,
//!   per-kind counters, and the injected playback port
//! - **Session runner**: a single-owner async task that detects phase
//!   completion with a cancellable deadline instead of polling
//! - **Storage**: JSON preset store, TOML configuration, and an
//!   append-only SQLite event journal
//!
//! ## Key components
//!
//! - [`SessionScheduler`]: the phase-cycling state machine
//! - [`SessionHandle`]: command channel into a spawned session task
//! - [`PlaybackPort`]: transport controls the scheduler paces with
//! - [`PresetStore`] / [`Config`] / [`EventJournal`]: persistence

pub mod error;
pub mod events;
pub mod playback;
pub mod preset;
pub mod report;
pub mod sequence;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, PresetError, Result, SessionError, StoreError};
pub use events::Event;
pub use playback::{PlaybackPort, WallClockPlayback};
pub use preset::{Preset, PresetList};
pub use sequence::{PhaseKind, PhaseSequence};
pub use session::{
    spawn_runner, PhaseCounts, PhaseTotals, SessionHandle, SessionScheduler, SessionStatus,
    SessionSummary,
};
pub use storage::{Config, EventJournal, PresetStore};
