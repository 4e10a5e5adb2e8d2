use clap::Subcommand;

use focusclinic_core::EventJournal;

#[derive(Subcommand)]
pub enum LogAction {
    /// Show the most recent journal events
    Tail {
        /// Number of events to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LogAction::Tail { count } => {
            let journal = EventJournal::open()?;
            for entry in journal.recent(count)? {
                println!("{:>6}  {}", entry.seq, serde_json::to_string(&entry.event)?);
            }
        }
    }
    Ok(())
}
