//! Async session runner.
//!
//! A single task owns the scheduler; callers talk to it through a
//! cloneable [`SessionHandle`] backed by an mpsc channel, so every
//! mutation is serialized through one owner. Phase completion is a
//! `sleep_until` deadline selected against the command channel -- no
//! polling loop. The deadline is recomputed from `time_remaining()` on
//! each iteration and only armed while Running, so pausing disarms it and
//! resuming schedules the remaining duration. A fire is applied only if
//! the scheduler epoch still matches the epoch captured when the deadline
//! was armed; a stale fire from a stopped or restarted session is
//! discarded.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::error::SessionError;
use crate::events::Event;
use crate::playback::PlaybackPort;
use crate::preset::Preset;
use crate::session::scheduler::{SessionScheduler, SessionStatus, SessionSummary};

enum Command {
    Start {
        preset: Preset,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Pause {
        reply: oneshot::Sender<bool>,
    },
    Resume {
        reply: oneshot::Sender<bool>,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
    TimeRemaining {
        reply: oneshot::Sender<Result<Duration, SessionError>>,
    },
    NextPhaseLabel {
        reply: oneshot::Sender<Result<&'static str, SessionError>>,
    },
    Summary {
        reply: oneshot::Sender<Result<SessionSummary, SessionError>>,
    },
    Shutdown,
}

/// Client side of a running session task.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| SessionError::NoActiveSession)?;
        rx.await.map_err(|_| SessionError::NoActiveSession)
    }

    pub async fn start(&self, preset: Preset) -> Result<(), SessionError> {
        self.request(|reply| Command::Start { preset, reply }).await?
    }

    /// Returns true if the session moved from Running to Paused.
    pub async fn pause(&self) -> bool {
        self.request(|reply| Command::Pause { reply })
            .await
            .unwrap_or(false)
    }

    /// Returns true if the session moved from Paused to Running.
    pub async fn resume(&self) -> bool {
        self.request(|reply| Command::Resume { reply })
            .await
            .unwrap_or(false)
    }

    /// Returns true if a session was cancelled.
    pub async fn stop(&self) -> bool {
        self.request(|reply| Command::Stop { reply })
            .await
            .unwrap_or(false)
    }

    pub async fn status(&self) -> Result<SessionStatus, SessionError> {
        self.request(|reply| Command::Status { reply }).await
    }

    pub async fn time_remaining(&self) -> Result<Duration, SessionError> {
        self.request(|reply| Command::TimeRemaining { reply })
            .await?
    }

    pub async fn next_phase_label(&self) -> Result<&'static str, SessionError> {
        self.request(|reply| Command::NextPhaseLabel { reply })
            .await?
    }

    pub async fn summary(&self) -> Result<SessionSummary, SessionError> {
        self.request(|reply| Command::Summary { reply }).await?
    }

    /// Stop any session and end the runner task.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown).await;
    }
}

/// Spawn the session task. Returns the command handle and the event
/// stream; the composition root owns the journal and drains the stream.
pub fn spawn_runner<P>(playback: P) -> (SessionHandle, mpsc::UnboundedReceiver<Event>)
where
    P: PlaybackPort + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_loop(SessionScheduler::new(playback), cmd_rx, event_tx));
    (SessionHandle { tx: cmd_tx }, event_rx)
}

async fn run_loop<P: PlaybackPort>(
    mut scheduler: SessionScheduler<P>,
    mut commands: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<Event>,
) {
    loop {
        let due = if scheduler.status() == SessionStatus::Running {
            scheduler
                .time_remaining()
                .ok()
                .map(|remaining| Instant::now() + remaining)
        } else {
            None
        };
        let armed_epoch = scheduler.epoch();

        tokio::select! {
            _ = phase_deadline(due) => {
                if scheduler.epoch() != armed_epoch {
                    continue;
                }
                match scheduler.complete_phase() {
                    Ok(Some(pair)) => {
                        for event in pair {
                            let _ = events.send(event);
                        }
                    }
                    Ok(None) => {}
                    // Sequence invariant violated; nothing sane to reschedule.
                    Err(_) => break,
                }
            }
            cmd = commands.recv() => {
                let Some(cmd) = cmd else {
                    // All handles dropped: cancel and end the task.
                    if let Some(event) = scheduler.stop() {
                        let _ = events.send(event);
                    }
                    break;
                };
                if handle_command(&mut scheduler, cmd, &events) {
                    break;
                }
            }
        }
    }
}

async fn phase_deadline(due: Option<Instant>) {
    match due {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Apply one command. Returns true when the runner should shut down.
fn handle_command<P: PlaybackPort>(
    scheduler: &mut SessionScheduler<P>,
    cmd: Command,
    events: &mpsc::UnboundedSender<Event>,
) -> bool {
    match cmd {
        Command::Start { preset, reply } => {
            let result = scheduler.start(preset).map(|pair| {
                for event in pair {
                    let _ = events.send(event);
                }
            });
            let _ = reply.send(result);
            false
        }
        Command::Pause { reply } => {
            let event = scheduler.pause();
            let changed = event.is_some();
            if let Some(event) = event {
                let _ = events.send(event);
            }
            let _ = reply.send(changed);
            false
        }
        Command::Resume { reply } => {
            let event = scheduler.resume();
            let changed = event.is_some();
            if let Some(event) = event {
                let _ = events.send(event);
            }
            let _ = reply.send(changed);
            false
        }
        Command::Stop { reply } => {
            let event = scheduler.stop();
            let changed = event.is_some();
            if let Some(event) = event {
                let _ = events.send(event);
            }
            let _ = reply.send(changed);
            false
        }
        Command::Status { reply } => {
            let _ = reply.send(scheduler.status());
            false
        }
        Command::TimeRemaining { reply } => {
            let _ = reply.send(scheduler.time_remaining());
            false
        }
        Command::NextPhaseLabel { reply } => {
            let _ = reply.send(scheduler.next_phase_label());
            false
        }
        Command::Summary { reply } => {
            let _ = reply.send(scheduler.summary());
            false
        }
        Command::Shutdown => {
            if let Some(event) = scheduler.stop() {
                let _ = events.send(event);
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ScriptedPlayback;
    use crate::session::scheduler::PhaseCounts;

    fn preset_1m() -> Preset {
        Preset::new("Test", 1, 1, 1).unwrap()
    }

    async fn drain(events: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn command_round_trips() {
        let (handle, mut events) = spawn_runner(ScriptedPlayback::default());

        assert_eq!(handle.status().await, Ok(SessionStatus::Idle));
        assert_eq!(
            handle.time_remaining().await,
            Err(SessionError::NoActiveSession)
        );
        assert!(!handle.pause().await);
        assert!(!handle.resume().await);
        assert!(!handle.stop().await);

        handle.start(preset_1m()).await.unwrap();
        assert_eq!(handle.status().await, Ok(SessionStatus::Running));
        assert_eq!(
            handle.time_remaining().await,
            Ok(Duration::from_secs(60))
        );
        assert_eq!(handle.next_phase_label().await, Ok("meditate"));
        assert_eq!(
            handle.start(preset_1m()).await,
            Err(SessionError::AlreadyRunning)
        );

        assert!(handle.pause().await);
        assert_eq!(handle.status().await, Ok(SessionStatus::Paused));
        assert!(handle.resume().await);
        assert!(handle.stop().await);
        assert_eq!(handle.status().await, Ok(SessionStatus::Idle));

        let seen = drain(&mut events).await;
        assert!(matches!(seen[0], Event::SessionStarted { .. }));
        assert!(matches!(seen[1], Event::PhaseStarted { slot: 0, .. }));
        assert!(matches!(seen[2], Event::Paused { .. }));
        assert!(matches!(seen[3], Event::Resumed { .. }));
        assert!(matches!(seen[4], Event::SessionStopped { .. }));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_completes_a_full_cycle() {
        let (handle, mut events) = spawn_runner(ScriptedPlayback::default());
        handle.start(preset_1m()).await.unwrap();

        // Five 60s phases complete at t=60..300; wake just past the last.
        tokio::time::sleep(Duration::from_secs(301)).await;
        assert!(handle.pause().await);

        let summary = handle.summary().await.unwrap();
        assert_eq!(summary.focus.count, 2);
        assert_eq!(summary.meditation.count, 2);
        assert_eq!(summary.rest.count, 1);
        assert_eq!(summary.focus.total_minutes, 2);

        let completions = drain(&mut events)
            .await
            .into_iter()
            .filter(|e| matches!(e, Event::PhaseCompleted { .. }))
            .count();
        assert_eq!(completions, 5);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn pause_disarms_the_phase_deadline() {
        let (handle, mut events) = spawn_runner(ScriptedPlayback::default());
        handle.start(preset_1m()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(handle.pause().await);

        // Well past the original deadline: nothing may complete.
        tokio::time::sleep(Duration::from_secs(300)).await;
        let summary = handle.summary().await.unwrap();
        assert_eq!(summary.focus.count, 0);

        // Resume re-arms for the remaining duration.
        assert!(handle.resume().await);
        tokio::time::sleep(Duration::from_secs(62)).await;
        assert!(handle.pause().await);
        let summary = handle.summary().await.unwrap();
        assert_eq!(summary.focus.count, 1);

        drain(&mut events).await;
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_completion() {
        let (handle, mut events) = spawn_runner(ScriptedPlayback::default());
        handle.start(preset_1m()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(handle.stop().await);

        // The armed deadline must not fire into the stopped session.
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(handle.status().await, Ok(SessionStatus::Idle));

        // A new session starts from a clean slate.
        handle.start(preset_1m()).await.unwrap();
        let summary = handle.summary().await.unwrap();
        assert_eq!(
            PhaseCounts {
                focus: summary.focus.count,
                meditation: summary.meditation.count,
                rest: summary.rest.count
            },
            PhaseCounts::default()
        );

        drain(&mut events).await;
        handle.shutdown().await;
    }
}
