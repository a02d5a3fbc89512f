//! Note model.
//!
//! - `MusicalNote` - one playable or background event
//! - `TailInfo` - held-note indicator of long notes
//! - `Instrument` - sampled instruments

mod instrument;
#[allow(clippy::module_inception)]
mod note;

pub use instrument::*;
pub use note::*;
