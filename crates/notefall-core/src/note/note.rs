use serde::{Deserialize, Serialize};

use super::Instrument;

/// Number of lanes on the board
pub const COLUMN_COUNT: u8 = 4;

/// Note identifier, assigned at ingestion
pub type NoteId = u64;

/// First id handed to synthesized filler notes; ingested ids stay below it
pub const FILLER_ID_BASE: NoteId = 1 << 32;

/// Lane a pitch falls into
pub fn column_for_pitch(pitch: u8) -> u8 {
    pitch % COLUMN_COUNT
}

/// Held-note indicator attached to long notes
///
/// `start` is the head edge (further down the board), `end` the trailing
/// edge, so `end <= start` holds for the whole lifetime of the tail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailInfo {
    pub start: f64,
    pub end: f64,
    pub inactive: bool,
}

impl TailInfo {
    /// Tail of `length` position units trailing a head at `head_y`
    pub fn trailing(head_y: f64, length: f64) -> Self {
        Self {
            start: head_y,
            end: head_y - length,
            inactive: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.inactive
    }

    /// Same tail, no longer able to earn points
    pub fn deactivated(self) -> Self {
        Self {
            inactive: true,
            ..self
        }
    }
}

/// One playable or background event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicalNote {
    pub id: NoteId,
    /// `true` while the player still has to press it
    pub visible: bool,
    pub y_pos: f64,
    pub column: u8,
    pub instrument: Instrument,
    pub volume: u8,
    pub pitch: u8,
    /// Milliseconds
    pub start_time: u64,
    /// Milliseconds
    pub end_time: u64,
    pub tail: Option<TailInfo>,
}

impl MusicalNote {
    pub fn duration_ms(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }

    pub fn has_tail(&self) -> bool {
        self.tail.is_some()
    }

    /// Tail exists and can still earn points
    pub fn has_active_tail(&self) -> bool {
        self.tail.is_some_and(|tail| tail.is_active())
    }

    /// Resolved by the player with the key still held
    pub fn is_held(&self) -> bool {
        !self.visible && self.has_active_tail()
    }

    /// Copy marked as resolved
    pub fn resolved(&self) -> Self {
        Self {
            visible: false,
            ..self.clone()
        }
    }

    /// Copy whose tail (if any) can no longer earn points
    pub fn with_tail_deactivated(&self) -> Self {
        Self {
            tail: self.tail.map(TailInfo::deactivated),
            ..self.clone()
        }
    }
}
