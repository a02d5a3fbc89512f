//! Game state machine.
//!
//! - `GameState` - whole-game snapshot
//! - `Action` - transition labels
//! - `Reducer` - `(GameState, Action) -> GameState`
//! - `Multiplier` - scoring policy

mod action;
mod reducer;
mod scoring;
mod state;

pub use action::*;
pub use reducer::*;
pub use scoring::*;
pub use state::*;
