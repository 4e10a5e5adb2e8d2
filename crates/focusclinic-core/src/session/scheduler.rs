//! Session scheduler: the phase-cycling state machine.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!          |  ^
//!          v  |
//!        (complete_phase advances the slot, state stays Running)
//! ```
//!
//! The scheduler owns the session state and the injected playback port.
//! It has no clock of its own: the port's `elapsed()` is the
//! elapsed-in-phase time, so pause/resume accounting cannot drift from
//! what the port reports. Phase completion is driven externally (see
//! `session::runner`); `complete_phase` while not Running is ignored.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::events::Event;
use crate::playback::PlaybackPort;
use crate::preset::Preset;
use crate::sequence::{PhaseKind, PhaseSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
}

/// Completed-session counters per phase kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub focus: u32,
    pub meditation: u32,
    pub rest: u32,
}

impl PhaseCounts {
    pub fn get(&self, kind: PhaseKind) -> u32 {
        match kind {
            PhaseKind::Focus => self.focus,
            PhaseKind::Meditation => self.meditation,
            PhaseKind::Rest => self.rest,
        }
    }

    fn bump(&mut self, kind: PhaseKind) {
        match kind {
            PhaseKind::Focus => self.focus += 1,
            PhaseKind::Meditation => self.meditation += 1,
            PhaseKind::Rest => self.rest += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.focus + self.meditation + self.rest
    }
}

/// Per-kind completed count and accumulated minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTotals {
    pub count: u32,
    pub total_minutes: u64,
}

/// Snapshot of time spent per phase kind in the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub focus: PhaseTotals,
    pub meditation: PhaseTotals,
    pub rest: PhaseTotals,
}

impl SessionSummary {
    pub fn totals_for(&self, kind: PhaseKind) -> PhaseTotals {
        match kind {
            PhaseKind::Focus => self.focus,
            PhaseKind::Meditation => self.meditation,
            PhaseKind::Rest => self.rest,
        }
    }
}

/// The session phase scheduler.
///
/// Owns the slot index, per-kind counters, and the playback port. All
/// mutation goes through the command methods below; the async runner
/// serializes access so a GUI thread and a timer callback can never race.
pub struct SessionScheduler<P: PlaybackPort> {
    sequence: PhaseSequence,
    playback: P,
    status: SessionStatus,
    preset: Option<Preset>,
    slot: usize,
    counts: PhaseCounts,
    session_id: Option<Uuid>,
    /// Bumped on every start/stop; a deadline armed under an older epoch
    /// must be discarded instead of completing a phase.
    epoch: u64,
}

impl<P: PlaybackPort> SessionScheduler<P> {
    pub fn new(playback: P) -> Self {
        Self {
            sequence: PhaseSequence::standard(),
            playback,
            status: SessionStatus::Idle,
            preset: None,
            slot: 0,
            counts: PhaseCounts::default(),
            session_id: None,
            epoch: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn counts(&self) -> PhaseCounts {
        self.counts
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn preset(&self) -> Option<&Preset> {
        self.preset.as_ref()
    }

    pub fn sequence(&self) -> &PhaseSequence {
        &self.sequence
    }

    pub fn current_kind(&self) -> Result<PhaseKind, SessionError> {
        self.require_active()?;
        self.sequence.kind_at(self.slot)
    }

    /// Elapsed play time within the current phase.
    pub fn elapsed_in_phase(&self) -> Result<Duration, SessionError> {
        self.require_active()?;
        Ok(self.playback.elapsed())
    }

    /// Time left before the current phase completes.
    pub fn time_remaining(&self) -> Result<Duration, SessionError> {
        let kind = self.current_kind()?;
        let minutes = {
            let preset = self.active_preset()?;
            self.sequence.duration_for(kind, preset)
        };
        let total = Duration::from_secs(minutes.saturating_mul(60));
        Ok(total.saturating_sub(self.playback.elapsed()))
    }

    /// Label of the phase that begins after the current one completes.
    pub fn next_phase_label(&self) -> Result<&'static str, SessionError> {
        self.require_active()?;
        self.sequence.next_label(self.slot)
    }

    /// Per-kind completed counts and total minutes for this session.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let preset = self.active_preset()?;
        let totals = |kind: PhaseKind| {
            let count = self.counts.get(kind);
            PhaseTotals {
                count,
                total_minutes: u64::from(count) * self.sequence.duration_for(kind, preset),
            }
        };
        Ok(SessionSummary {
            focus: totals(PhaseKind::Focus),
            meditation: totals(PhaseKind::Meditation),
            rest: totals(PhaseKind::Rest),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session with a snapshot of `preset`.
    pub fn start(&mut self, preset: Preset) -> Result<[Event; 2], SessionError> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::AlreadyRunning);
        }
        self.epoch += 1;
        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.slot = 0;
        self.counts = PhaseCounts::default();
        let preset_name = preset.name.clone();
        self.preset = Some(preset);
        self.status = SessionStatus::Running;
        self.playback.reset();

        let started = Event::SessionStarted {
            session_id,
            preset_name,
            at: Utc::now(),
        };
        let phase = self.begin_phase()?;
        Ok([started, phase])
    }

    /// Record completion of the current phase and begin the next slot.
    ///
    /// Ignored (returns `Ok(None)`) unless Running, so a stray completion
    /// after pause/stop cannot corrupt the counters.
    pub fn complete_phase(&mut self) -> Result<Option<[Event; 2]>, SessionError> {
        if self.status != SessionStatus::Running {
            return Ok(None);
        }
        let kind = self.sequence.kind_at(self.slot)?;
        self.counts.bump(kind);
        let completed = Event::PhaseCompleted {
            slot: self.slot,
            kind,
            count: self.counts.get(kind),
            at: Utc::now(),
        };
        self.playback.stop();
        self.playback.reset();
        self.slot = self.sequence.next_index(self.slot);
        let started = self.begin_phase()?;
        Ok(Some([completed, started]))
    }

    /// Suspend playback, freezing elapsed time. No-op unless Running.
    pub fn pause(&mut self) -> Option<Event> {
        if self.status != SessionStatus::Running {
            return None;
        }
        self.playback.stop();
        self.status = SessionStatus::Paused;
        let remaining_secs = self
            .time_remaining()
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Some(Event::Paused {
            remaining_secs,
            at: Utc::now(),
        })
    }

    /// Continue playback from the preserved position. No-op unless Paused.
    pub fn resume(&mut self) -> Option<Event> {
        if self.status != SessionStatus::Paused {
            return None;
        }
        let kind = self.sequence.kind_at(self.slot).ok()?;
        self.playback.play(kind);
        self.status = SessionStatus::Running;
        let remaining_secs = self
            .time_remaining()
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Some(Event::Resumed {
            remaining_secs,
            at: Utc::now(),
        })
    }

    /// Cancel the session and return to Idle. No-op when already Idle.
    pub fn stop(&mut self) -> Option<Event> {
        if self.status == SessionStatus::Idle {
            return None;
        }
        self.epoch += 1;
        self.playback.stop();
        self.playback.reset();
        self.status = SessionStatus::Idle;
        self.preset = None;
        self.slot = 0;
        let session_id = self.session_id.take()?;
        Some(Event::SessionStopped {
            session_id,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_phase(&mut self) -> Result<Event, SessionError> {
        let kind = self.sequence.kind_at(self.slot)?;
        let duration_secs = {
            let preset = self.active_preset()?;
            self.sequence.duration_for(kind, preset).saturating_mul(60)
        };
        self.playback.play(kind);
        Ok(Event::PhaseStarted {
            slot: self.slot,
            kind,
            duration_secs,
            at: Utc::now(),
        })
    }

    fn require_active(&self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Idle {
            return Err(SessionError::NoActiveSession);
        }
        Ok(())
    }

    fn active_preset(&self) -> Result<&Preset, SessionError> {
        self.preset.as_ref().ok_or(SessionError::NoActiveSession)
    }

    #[cfg(test)]
    pub(crate) fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }
}
