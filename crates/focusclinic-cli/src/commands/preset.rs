use chrono::Utc;
use clap::Subcommand;

use focusclinic_core::{Config, Event, EventJournal, Preset, PresetError, PresetStore};

#[derive(Subcommand)]
pub enum PresetAction {
    /// Add a new preset
    Add {
        name: String,
        /// Focus time in minutes
        focus: u64,
        /// Meditation time in minutes
        meditation: u64,
        /// Rest time in minutes
        rest: u64,
    },
    /// List presets
    List {
        /// Print the raw preset document
        #[arg(long)]
        json: bool,
    },
    /// Delete a preset by name
    Delete { name: String },
    /// Select the preset used by `session run`
    Select { name: String },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = PresetStore::open()?;
    match action {
        PresetAction::Add {
            name,
            focus,
            meditation,
            rest,
        } => {
            let preset = Preset::new(name.clone(), focus, meditation, rest)?;
            store.add(preset)?;
            journal_event(Event::PresetAdded {
                name: name.clone(),
                at: Utc::now(),
            });
            println!("preset '{name}' added");
        }
        PresetAction::List { json } => {
            let list = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                let config = Config::load_or_default();
                let selected = config.active_preset.as_deref();
                for preset in list.presets() {
                    let marker = if selected == Some(preset.name.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} {:<20} focus {:>3}m  meditation {:>3}m  rest {:>3}m",
                        marker,
                        preset.name,
                        preset.focus_minutes,
                        preset.meditation_minutes,
                        preset.rest_minutes
                    );
                }
            }
        }
        PresetAction::Delete { name } => {
            store.delete(&name)?;
            journal_event(Event::PresetDeleted {
                name: name.clone(),
                at: Utc::now(),
            });
            println!("preset '{name}' deleted");
        }
        PresetAction::Select { name } => {
            let list = store.load()?;
            if list.get(&name).is_none() {
                return Err(PresetError::UnknownPreset(name).into());
            }
            let mut config = Config::load_or_default();
            config.active_preset = Some(name.clone());
            config.save()?;
            println!("preset '{name}' selected");
        }
    }
    Ok(())
}

/// Best-effort journaling; a broken journal must not fail preset CRUD.
fn journal_event(event: Event) {
    match EventJournal::open() {
        Ok(journal) => {
            if let Err(e) = journal.append(&event) {
                eprintln!("warning: could not journal event: {e}");
            }
        }
        Err(e) => eprintln!("warning: could not open journal: {e}"),
    }
}
