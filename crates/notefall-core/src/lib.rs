pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod ingest;
pub mod note;
pub mod rng;
pub mod schedule;

pub use config::GameConfig;
pub use driver::{
    Driver, InputHandle, KeyAction, KeyEvent, Observer, PauseGate, Replay, ReplayReport,
    ShutdownSignal,
};
pub use error::{Error, Result};
pub use game::{Action, GameState, Multiplier, Reducer, reduce};
pub use ingest::{NoteRecord, ingest, load_records};
pub use note::{COLUMN_COUNT, Instrument, MusicalNote, NoteId, TailInfo};
pub use rng::{hash, scale};
pub use schedule::{NoteSchedule, ScheduledGroup, schedule_notes, schedule_notes_with_offset};
