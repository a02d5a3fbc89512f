//! Real-time driver.
//!
//! A ticker thread and a song feeder thread produce actions alongside key
//! input; everything is serialized through one channel into a single
//! consumer that owns the `GameState`.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::{Observer, PauseGate, ShutdownSignal};
use crate::config::{GameConfig, timing};
use crate::error::{Error, Result};
use crate::game::{Action, GameState, Reducer};
use crate::schedule::ScheduledGroup;

/// Cloneable sender for key-driven actions
#[derive(Debug, Clone)]
pub struct InputHandle {
    sender: Sender<Action>,
}

impl InputHandle {
    pub fn press(&self, column: u8) -> Result<()> {
        self.send(Action::PressColumn(column))
    }

    pub fn release(&self, column: u8) -> Result<()> {
        self.send(Action::ReleaseColumn(column))
    }

    fn send(&self, action: Action) -> Result<()> {
        self.sender.send(action).map_err(|_| Error::ChannelClosed)
    }
}

/// Runs one song against the wall clock
pub struct Driver {
    reducer: Reducer,
    schedule: Vec<ScheduledGroup>,
    sender: Sender<Action>,
    receiver: Receiver<Action>,
    pause: Arc<PauseGate>,
    shutdown: Arc<ShutdownSignal>,
}

impl Driver {
    /// Fails with `Error::InvalidConfig` when the config cannot drive the
    /// ticker, e.g. a zero tick interval
    pub fn new(config: GameConfig, schedule: Vec<ScheduledGroup>) -> Result<Self> {
        config.validate()?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            reducer: Reducer::new(config),
            schedule,
            sender,
            receiver,
            pause: Arc::new(PauseGate::new()),
            shutdown: Arc::new(ShutdownSignal::new()),
        })
    }

    pub fn input(&self) -> InputHandle {
        InputHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn pause_gate(&self) -> Arc<PauseGate> {
        Arc::clone(&self.pause)
    }

    pub fn shutdown_signal(&self) -> Arc<ShutdownSignal> {
        Arc::clone(&self.shutdown)
    }

    /// Play the song until game over or shutdown, returning the last state
    pub fn run<O: Observer>(self, observer: &mut O) -> Result<GameState> {
        let Self {
            reducer,
            schedule,
            sender,
            receiver,
            pause,
            shutdown,
        } = self;

        info!(
            "Starting song: {} group(s), tick every {}ms",
            schedule.len(),
            reducer.config().tick_interval_ms
        );

        let tick_interval = Duration::from_millis(reducer.config().tick_interval_ms);
        let ticker = spawn_ticker(
            tick_interval,
            sender.clone(),
            Arc::clone(&pause),
            Arc::clone(&shutdown),
        );
        let feeder = spawn_feeder(schedule, sender, Arc::clone(&pause), Arc::clone(&shutdown));

        let result = consume(&reducer, &receiver, &pause, &shutdown, observer);

        shutdown.trigger();
        for (name, handle) in [("ticker", ticker), ("feeder", feeder)] {
            if handle.join().is_err() {
                warn!("{} thread panicked", name);
            }
        }

        match &result {
            Ok(state) => info!(
                "Song finished: {} points, {} notes played, game over: {}",
                state.points, state.notes_played, state.is_game_over
            ),
            Err(e) => warn!("Driver stopped: {}", e),
        }
        result
    }
}

fn consume<O: Observer>(
    reducer: &Reducer,
    receiver: &Receiver<Action>,
    pause: &PauseGate,
    shutdown: &ShutdownSignal,
    observer: &mut O,
) -> Result<GameState> {
    let mut state = reducer.initial_state();

    loop {
        // Key presses made while paused stay queued in the channel
        if pause.wait(shutdown).is_none() {
            debug!("Shutdown requested, stopping consumer");
            return Ok(state);
        }

        match receiver.recv_timeout(timing::RECV_TIMEOUT) {
            Ok(action) => {
                trace!("Consuming {}", action);
                state = reducer.reduce(&state, &action);
                observer.on_transition(&action, &state);
                if state.is_game_over {
                    return Ok(state);
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if shutdown.is_shutdown() {
                    return Ok(state);
                }
            }
            Err(RecvTimeoutError::Disconnected) => return Err(Error::ChannelClosed),
        }
    }
}

fn spawn_ticker(
    interval: Duration,
    sender: Sender<Action>,
    pause: Arc<PauseGate>,
    shutdown: Arc<ShutdownSignal>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            if pause.wait(&shutdown).is_none() || shutdown.wait(interval) {
                break;
            }
            // A pause that started during the sleep swallows this frame
            if pause.is_paused() {
                continue;
            }
            if sender.send(Action::Tick).is_err() {
                break;
            }
        }
        debug!("Ticker stopped");
    })
}

fn spawn_feeder(
    schedule: Vec<ScheduledGroup>,
    sender: Sender<Action>,
    pause: Arc<PauseGate>,
    shutdown: Arc<ShutdownSignal>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for group in schedule {
            if !wait_running(Duration::from_millis(group.delay_ms), &pause, &shutdown) {
                debug!("Feeder cancelled");
                return;
            }
            debug!(
                "Releasing {} note(s) at {}ms",
                group.notes.len(),
                group.start_time
            );
            if sender.send(Action::AddNoteGroup(group.notes)).is_err() {
                return;
            }
        }
        if pause.wait(&shutdown).is_some() {
            let _ = sender.send(Action::EndOfSong);
            debug!("Song source exhausted");
        }
    })
}

/// Sleep for `delay` of unpaused time; `false` on shutdown
fn wait_running(delay: Duration, pause: &PauseGate, shutdown: &ShutdownSignal) -> bool {
    let mut remaining = delay;
    loop {
        if pause.wait(shutdown).is_none() {
            return false;
        }
        if remaining.is_zero() {
            return true;
        }
        let slice = remaining.min(timing::MAX_SLEEP_SLICE);
        if shutdown.wait(slice) {
            return false;
        }
        remaining -= slice;
    }
}
