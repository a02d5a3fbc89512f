use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Cancellation flag shared by the driver threads
///
/// `wait` doubles as an interruptible sleep: it returns early as soon as the
/// signal is triggered.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    triggered: Mutex<bool>,
    condvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        let mut triggered = self
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *triggered = true;
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        *self
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for up to `timeout`; returns `true` if shutdown was triggered
    pub fn wait(&self, timeout: Duration) -> bool {
        let guard = self
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .condvar
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}
