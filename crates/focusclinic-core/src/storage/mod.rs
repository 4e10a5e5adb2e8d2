mod config;
mod journal;
mod presets;

pub use config::{Config, DefaultsConfig, SoundsConfig};
pub use journal::{EventJournal, JournalEntry};
pub use presets::PresetStore;

use std::path::PathBuf;

/// Returns `~/.config/focusclinic[-dev]/` based on FOCUSCLINIC_ENV.
///
/// Set FOCUSCLINIC_ENV=dev to use the development data directory.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSCLINIC_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusclinic-dev")
    } else {
        base_dir.join("focusclinic")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
