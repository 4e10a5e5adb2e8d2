//! Session and preset events.
//!
//! Every state change produces an `Event`. The runner forwards them to
//! the composition root, which records them in the append-only journal;
//! the core itself never formats or persists them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sequence::PhaseKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        preset_name: String,
        at: DateTime<Utc>,
    },
    PhaseStarted {
        slot: usize,
        kind: PhaseKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        slot: usize,
        kind: PhaseKind,
        /// Completed sessions of this kind so far, including this one.
        count: u32,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionStopped {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    PresetAdded {
        name: String,
        at: DateTime<Utc>,
    },
    PresetDeleted {
        name: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// When the event occurred.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::PhaseStarted { at, .. }
            | Event::PhaseCompleted { at, .. }
            | Event::Paused { at, .. }
            | Event::Resumed { at, .. }
            | Event::SessionStopped { at, .. }
            | Event::PresetAdded { at, .. }
            | Event::PresetDeleted { at, .. } => *at,
        }
    }

    /// Stable name used as the journal's kind column.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session_started",
            Event::PhaseStarted { .. } => "phase_started",
            Event::PhaseCompleted { .. } => "phase_completed",
            Event::Paused { .. } => "paused",
            Event::Resumed { .. } => "resumed",
            Event::SessionStopped { .. } => "session_stopped",
            Event::PresetAdded { .. } => "preset_added",
            Event::PresetDeleted { .. } => "preset_deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::PhaseStarted {
            slot: 0,
            kind: PhaseKind::Focus,
            duration_secs: 3000,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PhaseStarted");
        assert_eq!(json["kind"], "focus");
        assert_eq!(json["duration_secs"], 3000);
    }

    #[test]
    fn event_roundtrips_through_json() {
        let event = Event::PhaseCompleted {
            slot: 4,
            kind: PhaseKind::Rest,
            count: 1,
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let decoded: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.kind_name(), "phase_completed");
    }
}
