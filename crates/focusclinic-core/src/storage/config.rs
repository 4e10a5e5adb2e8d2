//! TOML-based application configuration.
//!
//! Stores the per-phase sound file paths, the default preset durations,
//! and the name of the preset `session run` plays. Lives at
//! `~/.config/focusclinic/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::preset::{
    Preset, DEFAULT_FOCUS_MINUTES, DEFAULT_MEDITATION_MINUTES, DEFAULT_REST_MINUTES,
};
use crate::sequence::PhaseKind;

/// Per-phase sound file paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_focus_sound")]
    pub focus: String,
    #[serde(default = "default_meditation_sound")]
    pub meditation: String,
    #[serde(default = "default_rest_sound")]
    pub rest: String,
}

/// Durations used when no preset file exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u64,
    #[serde(default = "default_meditation_minutes")]
    pub meditation_minutes: u64,
    #[serde(default = "default_rest_minutes")]
    pub rest_minutes: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusclinic/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Preset `session run` uses when `--preset` is not given.
    #[serde(default)]
    pub active_preset: Option<String>,
}

fn default_focus_sound() -> String {
    "data/sounds/focusSound_1_Minute.aif".into()
}
fn default_meditation_sound() -> String {
    "data/sounds/meditationSound_1_Minute.aif".into()
}
fn default_rest_sound() -> String {
    "data/sounds/restSound_1_Minute.aif".into()
}
fn default_focus_minutes() -> u64 {
    DEFAULT_FOCUS_MINUTES
}
fn default_meditation_minutes() -> u64 {
    DEFAULT_MEDITATION_MINUTES
}
fn default_rest_minutes() -> u64 {
    DEFAULT_REST_MINUTES
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            focus: default_focus_sound(),
            meditation: default_meditation_sound(),
            rest: default_rest_sound(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            meditation_minutes: DEFAULT_MEDITATION_MINUTES,
            rest_minutes: DEFAULT_REST_MINUTES,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sounds: SoundsConfig::default(),
            defaults: DefaultsConfig::default(),
            active_preset: None,
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk; a missing file writes and returns the default.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Sound file path for `kind`.
    pub fn sound_for(&self, kind: PhaseKind) -> &str {
        match kind {
            PhaseKind::Focus => &self.sounds.focus,
            PhaseKind::Meditation => &self.sounds.meditation,
            PhaseKind::Rest => &self.sounds.rest,
        }
    }

    /// The preset built from `[defaults]`, used when the store is empty.
    pub fn default_preset(&self) -> Preset {
        Preset::new(
            "Default",
            self.defaults.focus_minutes,
            self.defaults.meditation_minutes,
            self.defaults.rest_minutes,
        )
        .unwrap_or_else(|_| Preset::standard())
    }

    /// Get a config value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: e.to_string(),
        })?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        self.save()?;
        Ok(())
    }
}

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
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => {
                    serde_json::Value::Bool(value.parse::<bool>().map_err(|_| invalid())?)
                }
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        return Err(invalid());
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|_| invalid())?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}
