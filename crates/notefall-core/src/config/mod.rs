//! Configuration.
//!
//! This module contains the game configuration and driver constants:
//! - `GameConfig` - board geometry, tick rate and tail policy
//! - Real-time driver polling constants

mod game;

pub use game::*;

/// Real-time driver timing configuration.
pub mod timing {
    use std::time::Duration;

    /// How long a paused producer sleeps between shutdown checks.
    pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(50);

    /// Upper bound on a single sleep slice while waiting out a group delay,
    /// so shutdown and pause are noticed promptly.
    pub const MAX_SLEEP_SLICE: Duration = Duration::from_millis(20);

    /// How long the consumer waits for an action before re-checking shutdown.
    pub const RECV_TIMEOUT: Duration = Duration::from_millis(100);
}

/// Virtual-time replay limits.
pub mod replay {
    /// Ticks allowed after the end of the song before a replay gives up
    /// waiting for game over.
    pub const DEFAULT_MAX_TRAILING_TICKS: u64 = 100_000;
}
