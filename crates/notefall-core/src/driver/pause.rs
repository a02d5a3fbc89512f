use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::info;

use super::ShutdownSignal;
use crate::config::timing;

/// Global pause shared by every action source and the consumer
///
/// Pausing only withholds delivery; nothing is reset or dropped.
#[derive(Debug, Default)]
pub struct PauseGate {
    paused: Mutex<bool>,
    condvar: Condvar,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.set(true);
    }

    pub fn resume(&self) {
        self.set(false);
    }

    /// Flip the pause state, returning whether the gate is now paused
    pub fn toggle(&self) -> bool {
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        *paused = !*paused;
        info!("{}", if *paused { "Paused" } else { "Resumed" });
        self.condvar.notify_all();
        *paused
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, value: bool) {
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        if *paused != value {
            info!("{}", if value { "Paused" } else { "Resumed" });
        }
        *paused = value;
        self.condvar.notify_all();
    }

    /// Block while paused
    ///
    /// Returns how long the caller was held, or `None` if shutdown was
    /// triggered in the meantime.
    pub fn wait(&self, shutdown: &ShutdownSignal) -> Option<Duration> {
        let start = Instant::now();
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        while *paused {
            if shutdown.is_shutdown() {
                return None;
            }
            let (guard, _) = self
                .condvar
                .wait_timeout(paused, timing::PAUSE_POLL_INTERVAL)
                .unwrap_or_else(PoisonError::into_inner);
            paused = guard;
        }
        if shutdown.is_shutdown() {
            return None;
        }
        Some(start.elapsed())
    }
}
