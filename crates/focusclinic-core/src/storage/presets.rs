//! JSON-file preset store.
//!
//! Persists the preset list as `{"presetList": [...]}` in
//! `presets.json` under the data directory. The document layout is
//! load-bearing: existing preset files must keep reading back unchanged.

use std::path::PathBuf;

use super::data_dir;
use crate::error::{CoreError, PresetError, StoreError};
use crate::preset::{Preset, PresetList};
use crate::storage::Config;

/// File-backed preset store.
pub struct PresetStore {
    path: PathBuf,
}

impl PresetStore {
    /// Open the store at the default location.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            path: data_dir()?.join("presets.json"),
        })
    }

    /// Open a store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the preset list; a missing file yields the default list.
    pub fn load(&self) -> Result<PresetList, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StoreError::ReadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PresetList::with_default()),
            Err(e) => Err(StoreError::ReadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist the preset list.
    pub fn save(&self, list: &PresetList) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(list)?;
        std::fs::write(&self.path, content).map_err(|e| StoreError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Append a preset and persist.
    pub fn add(&self, preset: Preset) -> Result<(), StoreError> {
        let mut list = self.load()?;
        list.add(preset);
        self.save(&list)
    }

    /// Remove the preset named `name` and persist.
    pub fn delete(&self, name: &str) -> Result<Preset, CoreError> {
        let mut list = self.load()?;
        let removed = list.delete(name)?;
        self.save(&list)?;
        Ok(removed)
    }

    /// The preset a new session snapshots.
    ///
    /// The configured `active_preset` name wins; otherwise the first
    /// stored preset; an empty store falls back to the config defaults.
    pub fn active_preset(&self, config: &Config) -> Result<Preset, CoreError> {
        let list = self.load()?;
        match &config.active_preset {
            Some(name) => list
                .get(name)
                .cloned()
                .ok_or_else(|| PresetError::UnknownPreset(name.clone()).into()),
            None => Ok(list
                .first()
                .cloned()
                .unwrap_or_else(|| config.default_preset())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, PresetStore) {
        let dir = TempDir::new().unwrap();
        let store = PresetStore::at(dir.path().join("presets.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_default_list() {
        let (_dir, store) = store();
        let list = store.load().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.first().unwrap().name, "Default");
    }

    #[test]
    fn add_and_delete_roundtrip_through_disk() {
        let (_dir, store) = store();
        store
            .add(Preset::new("Morning", 45, 15, 20).unwrap())
            .unwrap();

        let list = store.load().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get("Morning").unwrap().focus_minutes, 45);

        store.delete("Morning").unwrap();
        assert!(store.load().unwrap().get("Morning").is_none());
    }

    #[test]
    fn delete_unknown_preset_fails() {
        let (_dir, store) = store();
        assert!(matches!(
            store.delete("Nope"),
            Err(CoreError::Preset(PresetError::UnknownPreset(_)))
        ));
    }

    #[test]
    fn written_document_uses_preset_list_layout() {
        let (_dir, store) = store();
        store.save(&PresetList::with_default()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["presetList"][0]["name"], "Default");
        assert_eq!(json["presetList"][0]["focusTime"], 50);
        assert_eq!(json["presetList"][0]["meditationTime"], 10);
        assert_eq!(json["presetList"][0]["restTime"], 30);
    }

    #[test]
    fn active_preset_resolution_order() {
        let (_dir, store) = store();
        store
            .add(Preset::new("Morning", 45, 15, 20).unwrap())
            .unwrap();

        // No selection: first stored preset.
        let config = Config::default();
        assert_eq!(store.active_preset(&config).unwrap().name, "Default");

        // Selection wins.
        let mut config = Config::default();
        config.active_preset = Some("Morning".into());
        assert_eq!(store.active_preset(&config).unwrap().name, "Morning");

        // Unknown selection is an error, not a silent fallback.
        config.active_preset = Some("Nope".into());
        assert!(store.active_preset(&config).is_err());
    }
}
