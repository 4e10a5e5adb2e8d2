//! Playback port: the capability the scheduler paces a session with.
//!
//! The core never touches audio data. The port models an audio clip's
//! transport controls: it starts/stops for a phase kind, keeps its
//! position while stopped, and reports elapsed play time. `elapsed()` is
//! the only elapsed-in-phase clock the scheduler consults.

use std::time::{Duration, Instant};

use crate::sequence::PhaseKind;

/// Transport controls for per-phase playback.
pub trait PlaybackPort {
    /// Begin (or continue, after `stop`) playing the sound for `kind`.
    fn play(&mut self, kind: PhaseKind);

    /// Suspend playback, holding the current position.
    fn stop(&mut self);

    /// Elapsed play time within the current phase.
    fn elapsed(&self) -> Duration;

    /// Rewind the position to zero.
    fn reset(&mut self);
}

/// A clock-only port: tracks position in wall time, plays nothing.
///
/// Accumulates elapsed time across stop/play cycles the way a paused
/// audio clip holds its position.
#[derive(Debug, Default)]
pub struct WallClockPlayback {
    playing_since: Option<Instant>,
    accumulated: Duration,
    current: Option<PhaseKind>,
}

impl WallClockPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// The phase kind currently playing, if any.
    pub fn current_kind(&self) -> Option<PhaseKind> {
        self.current
    }
}

impl PlaybackPort for WallClockPlayback {
    fn play(&mut self, kind: PhaseKind) {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
        self.current = Some(kind);
    }

    fn stop(&mut self) {
        if let Some(since) = self.playing_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    fn elapsed(&self) -> Duration {
        let running = self
            .playing_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        self.accumulated + running
    }

    fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if let Some(since) = &mut self.playing_since {
            *since = Instant::now();
        }
    }
}

/// A port with a settable position, for deterministic tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedPlayback {
    pub position: Duration,
    pub playing: Option<PhaseKind>,
    pub started: Vec<PhaseKind>,
    pub resets: usize,
}

#[cfg(test)]
impl PlaybackPort for ScriptedPlayback {
    fn play(&mut self, kind: PhaseKind) {
        self.playing = Some(kind);
        self.started.push(kind);
    }

    fn stop(&mut self) {
        self.playing = None;
    }

    fn elapsed(&self) -> Duration {
        self.position
    }

    fn reset(&mut self) {
        self.position = Duration::ZERO;
        self.resets += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn wall_clock_holds_position_while_stopped() {
        let mut port = WallClockPlayback::new();
        port.play(PhaseKind::Focus);
        thread::sleep(Duration::from_millis(10));
        port.stop();

        let frozen = port.elapsed();
        assert!(frozen >= Duration::from_millis(10));

        thread::sleep(Duration::from_millis(10));
        assert_eq!(port.elapsed(), frozen);
    }

    #[test]
    fn wall_clock_accumulates_across_resume() {
        let mut port = WallClockPlayback::new();
        port.play(PhaseKind::Rest);
        thread::sleep(Duration::from_millis(5));
        port.stop();
        port.play(PhaseKind::Rest);
        thread::sleep(Duration::from_millis(5));
        assert!(port.elapsed() >= Duration::from_millis(10));
        assert_eq!(port.current_kind(), Some(PhaseKind::Rest));
    }

    #[test]
    fn reset_rewinds_to_zero() {
        let mut port = WallClockPlayback::new();
        port.play(PhaseKind::Focus);
        thread::sleep(Duration::from_millis(5));
        port.stop();
        port.reset();
        assert_eq!(port.elapsed(), Duration::ZERO);
    }
}
