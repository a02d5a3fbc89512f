//! Action drivers.
//!
//! The reducer never sees the clock; drivers decide when actions happen:
//! - `Driver` - real time, with ticker and feeder threads, pause and shutdown
//! - `Replay` - simulated time from a key script, fully deterministic

mod pause;
mod realtime;
mod replay;
mod shutdown;

pub use pause::*;
pub use realtime::*;
pub use replay::*;
pub use shutdown::*;

use crate::game::{Action, GameState};

/// Receives every state the reducer produces
///
/// Renderers and audio back ends hook in here; they only read.
pub trait Observer {
    fn on_transition(&mut self, action: &Action, state: &GameState);
}

impl<F> Observer for F
where
    F: FnMut(&Action, &GameState),
{
    fn on_transition(&mut self, action: &Action, state: &GameState) {
        self(action, state)
    }
}
