use std::collections::HashSet;

use serde::Serialize;

use crate::game::Multiplier;
use crate::note::{MusicalNote, NoteId};

/// Whole-game snapshot
///
/// Never mutated once handed out: the reducer builds a fresh value for every
/// transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub is_game_over: bool,
    pub all_notes_finished: bool,
    pub tick_count: u64,
    pub random_seed: u32,
    pub notes_played: u32,
    pub points: i64,
    /// Wrong presses that produced a filler note
    pub misses: u32,
    /// Early releases of a held tail
    pub penalties: u32,
    /// Notes on the board, falling or draining
    pub active_notes: Vec<MusicalNote>,
    /// Active notes of the previous state, for teardown
    pub expired_notes: Vec<MusicalNote>,
    /// Notes that must sound in this transition
    pub ready_notes: Vec<MusicalNote>,
}

impl GameState {
    pub fn new(random_seed: u32) -> Self {
        Self {
            is_game_over: false,
            all_notes_finished: false,
            tick_count: 0,
            random_seed,
            notes_played: 0,
            points: 0,
            misses: 0,
            penalties: 0,
            active_notes: Vec::new(),
            expired_notes: Vec::new(),
            ready_notes: Vec::new(),
        }
    }

    pub fn multiplier(&self) -> Multiplier {
        Multiplier::for_notes_played(self.notes_played)
    }

    pub fn active_in_column(&self, column: u8) -> impl Iterator<Item = &MusicalNote> {
        self.active_notes
            .iter()
            .filter(move |note| note.column == column)
    }

    /// Whether the player is holding a resolved tail in this column
    pub fn is_holding(&self, column: u8) -> bool {
        self.active_in_column(column).any(MusicalNote::is_held)
    }

    /// Active notes whose tail became inactive in this transition
    ///
    /// This is what an audio driver uses to cut sustained sounds.
    pub fn tails_cut(&self) -> Vec<&MusicalNote> {
        let previously_active: HashSet<NoteId> = self
            .expired_notes
            .iter()
            .filter(|note| note.has_active_tail())
            .map(|note| note.id)
            .collect();

        self.active_notes
            .iter()
            .filter(|note| note.tail.is_some_and(|tail| tail.inactive))
            .filter(|note| previously_active.contains(&note.id))
            .collect()
    }

    /// Game-over condition evaluated on this state's collections
    pub fn board_cleared(&self) -> bool {
        self.all_notes_finished
            && self.active_notes.is_empty()
            && self.ready_notes.is_empty()
            && self.expired_notes.is_empty()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0)
    }
}
