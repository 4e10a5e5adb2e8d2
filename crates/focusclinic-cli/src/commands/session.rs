use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};

use focusclinic_core::{
    report, spawn_runner, Config, Event, EventJournal, Preset, PresetError, PresetStore,
    WallClockPlayback,
};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a session interactively until stopped
    Run {
        /// Preset to play (defaults to the selected preset)
        #[arg(long)]
        preset: Option<String>,
    },
    /// Print the five-phase plan for a preset
    Plan {
        /// Preset to inspect (defaults to the selected preset)
        #[arg(long)]
        preset: Option<String>,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run { preset } => run_session(preset),
        SessionAction::Plan { preset } => print_plan(preset),
    }
}

fn resolve_preset(
    config: &Config,
    name: Option<String>,
) -> Result<Preset, Box<dyn std::error::Error>> {
    let store = PresetStore::open()?;
    match name {
        Some(name) => {
            let list = store.load()?;
            let preset = list
                .get(&name)
                .cloned()
                .ok_or(PresetError::UnknownPreset(name))?;
            Ok(preset)
        }
        None => Ok(store.active_preset(config)?),
    }
}

fn print_plan(name: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let preset = resolve_preset(&config, name)?;
    let sequence = focusclinic_core::PhaseSequence::standard();

    println!("preset '{}':", preset.name);
    for (slot, kind) in sequence.slots().iter().enumerate() {
        println!(
            "  {}. {:<10} {} min",
            slot + 1,
            kind.as_str(),
            sequence.duration_for(*kind, &preset)
        );
    }
    println!("one full cycle: {} min", preset.cycle_minutes());
    Ok(())
}

fn run_session(name: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let preset = resolve_preset(&config, name)?;
    let journal = EventJournal::open()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(config, preset, journal))
}

async fn session_loop(
    config: Config,
    preset: Preset,
    journal: EventJournal,
) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, mut events) = spawn_runner(WallClockPlayback::new());
    handle.start(preset.clone()).await?;

    println!("session started with preset '{}'", preset.name);
    println!("commands: p = pause, r = resume, t = time, q = quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                journal.append(&event)?;
                print_event(&event, &config);
                if matches!(event, Event::SessionStopped { .. }) {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed: cancel the session and drain remaining events.
                    handle.shutdown().await;
                    while let Some(event) = events.recv().await {
                        journal.append(&event)?;
                        print_event(&event, &config);
                    }
                    break;
                };
                match line.trim() {
                    "p" => { handle.pause().await; }
                    "r" => { handle.resume().await; }
                    "t" => print_time(&handle).await,
                    "q" => handle.shutdown().await,
                    "" => {}
                    other => println!("unknown command: {other}"),
                }
            }
        }
    }
    Ok(())
}

async fn print_time(handle: &focusclinic_core::SessionHandle) {
    let remaining = handle.time_remaining().await;
    let label = handle.next_phase_label().await;
    let summary = handle.summary().await;
    match (remaining, label, summary) {
        (Ok(remaining), Ok(label), Ok(summary)) => {
            println!("{}", report::time_details(remaining, label, &summary));
        }
        _ => println!("no active session"),
    }
}

fn print_event(event: &Event, config: &Config) {
    match event {
        Event::SessionStarted { preset_name, .. } => {
            println!("[session] started ({preset_name})");
        }
        Event::PhaseStarted {
            kind,
            duration_secs,
            ..
        } => {
            println!(
                "[phase] {} for {} min ({})",
                kind.as_str(),
                duration_secs / 60,
                config.sound_for(*kind)
            );
        }
        Event::PhaseCompleted { kind, count, .. } => {
            println!("[phase] {} complete ({count} so far)", kind.as_str());
        }
        Event::Paused { remaining_secs, .. } => {
            println!("[session] paused with {remaining_secs}s remaining");
        }
        Event::Resumed { remaining_secs, .. } => {
            println!("[session] resumed with {remaining_secs}s remaining");
        }
        Event::SessionStopped { .. } => {
            println!("[session] stopped");
        }
        Event::PresetAdded { name, .. } | Event::PresetDeleted { name, .. } => {
            println!("[preset] {name}");
        }
    }
}
