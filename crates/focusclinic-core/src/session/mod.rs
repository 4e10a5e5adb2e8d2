mod runner;
mod scheduler;

pub use runner::{spawn_runner, SessionHandle};
pub use scheduler::{PhaseCounts, PhaseTotals, SessionScheduler, SessionStatus, SessionSummary};
