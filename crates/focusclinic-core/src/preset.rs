//! Presets: named bundles of per-phase durations.
//!
//! The serde field names pin the on-disk JSON layout
//! (`{"name","focusTime","meditationTime","restTime"}`), which the preset
//! store writes inside a `{"presetList": [...]}` document.

use serde::{Deserialize, Serialize};

use crate::error::PresetError;

/// Default preset durations in minutes.
pub const DEFAULT_FOCUS_MINUTES: u64 = 50;
pub const DEFAULT_MEDITATION_MINUTES: u64 = 10;
pub const DEFAULT_REST_MINUTES: u64 = 30;

/// A named bundle of per-phase-kind durations, all in whole minutes.
///
/// Validated on construction; the scheduler clones the preset at session
/// start so later edits cannot reach a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(rename = "focusTime")]
    pub focus_minutes: u64,
    #[serde(rename = "meditationTime")]
    pub meditation_minutes: u64,
    #[serde(rename = "restTime")]
    pub rest_minutes: u64,
}

impl Preset {
    /// Create a preset, rejecting an empty name or a zero duration.
    pub fn new(
        name: impl Into<String>,
        focus_minutes: u64,
        meditation_minutes: u64,
        rest_minutes: u64,
    ) -> Result<Self, PresetError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PresetError::EmptyName);
        }
        if focus_minutes == 0 {
            return Err(PresetError::ZeroDuration { field: "focus" });
        }
        if meditation_minutes == 0 {
            return Err(PresetError::ZeroDuration { field: "meditation" });
        }
        if rest_minutes == 0 {
            return Err(PresetError::ZeroDuration { field: "rest" });
        }
        Ok(Self {
            name,
            focus_minutes,
            meditation_minutes,
            rest_minutes,
        })
    }

    /// The built-in default preset (50/10/30).
    pub fn standard() -> Self {
        Self {
            name: "Default".into(),
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            meditation_minutes: DEFAULT_MEDITATION_MINUTES,
            rest_minutes: DEFAULT_REST_MINUTES,
        }
    }

    /// Total minutes in one full five-phase cycle.
    pub fn cycle_minutes(&self) -> u64 {
        2 * self.focus_minutes + 2 * self.meditation_minutes + self.rest_minutes
    }
}

/// An ordered collection of presets.
///
/// Serializes to the `{"presetList": [...]}` document the store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetList {
    #[serde(rename = "presetList")]
    presets: Vec<Preset>,
}

impl PresetList {
    pub fn new() -> Self {
        Self {
            presets: Vec::new(),
        }
    }

    /// A list seeded with the default preset, mirroring a fresh install.
    pub fn with_default() -> Self {
        Self {
            presets: vec![Preset::standard()],
        }
    }

    pub fn add(&mut self, preset: Preset) {
        self.presets.push(preset);
    }

    /// Remove the preset named `name`.
    pub fn delete(&mut self, name: &str) -> Result<Preset, PresetError> {
        match self.presets.iter().position(|p| p.name == name) {
            Some(index) => Ok(self.presets.remove(index)),
            None => Err(PresetError::UnknownPreset(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn first(&self) -> Option<&Preset> {
        self.presets.first()
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetList {
    fn default() -> Self {
        Self::with_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_name() {
        assert_eq!(Preset::new("", 50, 10, 30), Err(PresetError::EmptyName));
        assert_eq!(Preset::new("   ", 50, 10, 30), Err(PresetError::EmptyName));
    }

    #[test]
    fn new_rejects_zero_durations() {
        assert_eq!(
            Preset::new("P", 0, 10, 30),
            Err(PresetError::ZeroDuration { field: "focus" })
        );
        assert_eq!(
            Preset::new("P", 50, 0, 30),
            Err(PresetError::ZeroDuration { field: "meditation" })
        );
        assert_eq!(
            Preset::new("P", 50, 10, 0),
            Err(PresetError::ZeroDuration { field: "rest" })
        );
    }

    #[test]
    fn standard_preset_durations() {
        let p = Preset::standard();
        assert_eq!(p.name, "Default");
        assert_eq!(p.focus_minutes, 50);
        assert_eq!(p.meditation_minutes, 10);
        assert_eq!(p.rest_minutes, 30);
        assert_eq!(p.cycle_minutes(), 2 * 50 + 2 * 10 + 30);
    }

    #[test]
    fn preset_json_layout_is_pinned() {
        let p = Preset::new("Morning", 45, 15, 20).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Morning",
                "focusTime": 45,
                "meditationTime": 15,
                "restTime": 20,
            })
        );
    }

    #[test]
    fn preset_list_json_layout_is_pinned() {
        let list = PresetList::with_default();
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.get("presetList").is_some());
        assert_eq!(json["presetList"][0]["focusTime"], 50);
    }

    #[test]
    fn delete_by_name() {
        let mut list = PresetList::with_default();
        list.add(Preset::new("Evening", 25, 5, 10).unwrap());
        assert_eq!(list.len(), 2);

        let removed = list.delete("Evening").unwrap();
        assert_eq!(removed.focus_minutes, 25);
        assert_eq!(list.len(), 1);

        assert_eq!(
            list.delete("Evening"),
            Err(PresetError::UnknownPreset("Evening".into()))
        );
    }
}
