//! Game reducer.
//!
//! `(GameState, Action) -> GameState`. The reducer is total: every action is
//! valid in every state, and once the game is over every further action
//! leaves the state untouched.

use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::game::{Action, GameState};
use crate::note::{FILLER_ID_BASE, Instrument, MusicalNote, TailInfo, column_for_pitch};
use crate::rng::{self, Draws};
use strum::VariantArray;

/// Upper bound of a filler note's duration
const FILLER_MAX_DURATION_MS: f64 = 500.0;

/// Seed advances consumed by one filler note
pub const FILLER_DRAWS: usize = 4;

/// What one tick does to a single note
#[derive(Debug, Clone, PartialEq)]
enum Step {
    /// Still on the board
    Stay(MusicalNote),
    /// Reached the bottom and must sound; leaves the board
    Sound(MusicalNote),
    /// Head reached the bottom and must sound; tail keeps draining
    SoundAndStay(MusicalNote),
    /// Leaves the board silently
    Drop,
}

/// Notes after one tick of advancement
struct Advanced {
    active: Vec<MusicalNote>,
    ready: Vec<MusicalNote>,
}

/// State machine over `GameState`
#[derive(Debug, Clone)]
pub struct Reducer {
    config: GameConfig,
    row_step: f64,
    tail_rate: f64,
}

impl Reducer {
    pub fn new(config: GameConfig) -> Self {
        let row_step = config.row_step();
        let tail_rate = config.tail_rate();
        Self {
            config,
            row_step,
            tail_rate,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh state seeded from the config
    pub fn initial_state(&self) -> GameState {
        GameState::new(self.config.initial_seed)
    }

    /// Produce the state that follows `state` under `action`
    pub fn reduce(&self, state: &GameState, action: &Action) -> GameState {
        if state.is_game_over {
            return state.clone();
        }

        let next = match action {
            Action::Tick => self.tick(state),
            Action::PressColumn(column) => self.press(state, *column),
            Action::ReleaseColumn(column) => self.release(state, *column),
            Action::AddNoteGroup(notes) => self.add_group(state, notes),
            Action::EndOfSong => self.end_of_song(state),
        };

        self.settle(next)
    }

    fn settle(&self, mut next: GameState) -> GameState {
        next.is_game_over = next.board_cleared();
        if next.is_game_over {
            debug!(
                "Game over after {} ticks: {} points, {} notes played",
                next.tick_count, next.points, next.notes_played
            );
        }
        next
    }

    fn tick(&self, state: &GameState) -> GameState {
        let advanced = self.advance(&state.active_notes);
        trace!(
            "Tick {}: {} active, {} ready",
            state.tick_count + 1,
            advanced.active.len(),
            advanced.ready.len()
        );

        GameState {
            tick_count: state.tick_count + 1,
            active_notes: advanced.active,
            expired_notes: state.active_notes.clone(),
            ready_notes: advanced.ready,
            ..state.clone()
        }
    }

    fn press(&self, state: &GameState, column: u8) -> GameState {
        let is_hit = state
            .active_in_column(column)
            .any(|note| self.is_hittable(note));

        if is_hit {
            let random_seed = rng::hash(state.random_seed);
            let multiplier = state.multiplier();
            let active_notes = state
                .active_notes
                .iter()
                .map(|note| {
                    if note.column == column && self.is_hittable(note) {
                        note.resolved()
                    } else {
                        note.clone()
                    }
                })
                .collect();
            let points = multiplier.award(state.points);
            debug!(
                "Hit in column {} ({}): {} -> {} points",
                column, multiplier, state.points, points
            );

            return GameState {
                random_seed,
                notes_played: state.notes_played + 1,
                points,
                active_notes,
                expired_notes: state.active_notes.clone(),
                ready_notes: Vec::new(),
                ..state.clone()
            };
        }

        let (ready_notes, random_seed) = if state.is_holding(column) {
            (Vec::new(), rng::hash(state.random_seed))
        } else {
            let (filler, random_seed) = self.synthesize_filler(state.random_seed, state.misses);
            debug!(
                "Miss in column {}: filler {} pitch {} volume {}",
                column, filler.instrument, filler.pitch, filler.volume
            );
            (vec![filler], random_seed)
        };
        let misses = state.misses + ready_notes.len() as u32;

        GameState {
            random_seed,
            misses,
            active_notes: state.active_notes.clone(),
            expired_notes: state.active_notes.clone(),
            ready_notes,
            ..state.clone()
        }
    }

    fn release(&self, state: &GameState, column: u8) -> GameState {
        let multiplier = state.multiplier();
        let mut points = state.points;
        let mut released = 0;

        let active_notes = state
            .active_notes
            .iter()
            .map(|note| {
                if note.column == column && note.is_held() {
                    points = multiplier.penalize(points);
                    released += 1;
                    note.with_tail_deactivated()
                } else {
                    note.clone()
                }
            })
            .collect();

        if released > 0 {
            debug!(
                "Early release in column {} of {} tail(s) ({}): {} -> {} points",
                column, released, multiplier, state.points, points
            );
        }

        GameState {
            points,
            penalties: state.penalties + released,
            active_notes,
            expired_notes: state.active_notes.clone(),
            ready_notes: Vec::new(),
            ..state.clone()
        }
    }

    fn add_group(&self, state: &GameState, notes: &[MusicalNote]) -> GameState {
        let arriving = notes.iter().map(|note| self.spawn(note));
        let board: Vec<MusicalNote> = state.active_notes.iter().cloned().chain(arriving).collect();
        let advanced = self.advance(&board);
        debug!(
            "Added {} note(s), {} on board",
            notes.len(),
            advanced.active.len()
        );

        GameState {
            random_seed: rng::hash(state.random_seed),
            active_notes: advanced.active,
            expired_notes: state.active_notes.clone(),
            ready_notes: advanced.ready,
            ..state.clone()
        }
    }

    fn end_of_song(&self, state: &GameState) -> GameState {
        let advanced = self.advance(&state.active_notes);
        debug!("End of song, {} note(s) still on board", advanced.active.len());

        GameState {
            all_notes_finished: true,
            active_notes: advanced.active,
            expired_notes: state.active_notes.clone(),
            ready_notes: advanced.ready,
            ..state.clone()
        }
    }

    fn is_hittable(&self, note: &MusicalNote) -> bool {
        note.visible && self.config.in_hit_window(note.y_pos)
    }

    /// Place an arriving note at the top, attaching a tail to long playable notes
    fn spawn(&self, note: &MusicalNote) -> MusicalNote {
        let tail = if note.visible && note.duration_ms() > self.config.tail_min_ms {
            Some(TailInfo::trailing(
                0.0,
                note.duration_ms() as f64 / self.tail_rate,
            ))
        } else {
            None
        };

        MusicalNote {
            y_pos: 0.0,
            tail,
            ..note.clone()
        }
    }

    /// Filler sounded on a wrong press, with the seed after its last draw
    ///
    /// Every field comes from successive draws starting at `seed`; storing
    /// the returned seed keeps consecutive fillers from sharing draws.
    fn synthesize_filler(&self, seed: u32, misses: u32) -> (MusicalNote, u32) {
        let mut draws = Draws::new(seed);
        let instrument = Instrument::VARIANTS
            [draws.next_below(Instrument::VARIANTS.len() as u32) as usize];
        let volume = draws.next_below(128) as u8;
        let pitch = draws.next_below(128) as u8;
        let duration_ms = (draws.next_unit() * FILLER_MAX_DURATION_MS) as u64;

        let filler = MusicalNote {
            id: FILLER_ID_BASE + u64::from(misses),
            visible: false,
            y_pos: self.config.last_row,
            column: column_for_pitch(pitch),
            instrument,
            volume,
            pitch,
            start_time: 0,
            end_time: duration_ms,
            tail: None,
        };
        (filler, draws.seed())
    }

    fn advance(&self, notes: &[MusicalNote]) -> Advanced {
        let mut active = Vec::with_capacity(notes.len());
        let mut ready = Vec::new();

        for note in notes {
            match self.step(note) {
                Step::Stay(note) => active.push(note),
                Step::Sound(note) => ready.push(note),
                Step::SoundAndStay(note) => {
                    ready.push(note.clone());
                    active.push(note);
                }
                Step::Drop => {}
            }
        }

        Advanced { active, ready }
    }

    fn step(&self, note: &MusicalNote) -> Step {
        let last_row = self.config.last_row;
        let y_pos = (note.y_pos + self.row_step).min(last_row);
        let landed = y_pos >= last_row;

        let Some(tail) = note.tail else {
            let moved = MusicalNote {
                y_pos,
                ..note.clone()
            };
            return match (landed, note.visible) {
                (false, _) => Step::Stay(moved),
                (true, true) => {
                    trace!("Note {} missed in column {}", note.id, note.column);
                    Step::Drop
                }
                (true, false) => Step::Sound(moved),
            };
        };

        // Fully drained on an earlier tick: the cut frame has been shown
        if tail.end >= last_row {
            return Step::Drop;
        }

        let moved_tail = TailInfo {
            start: y_pos,
            end: (tail.end + self.row_step).min(last_row),
            inactive: tail.inactive,
        };

        if note.visible {
            let moved = MusicalNote {
                y_pos,
                tail: Some(moved_tail),
                ..note.clone()
            };
            if landed {
                // Never caught: resolved as a miss, the tail drains without scoring
                trace!("Long note {} missed in column {}", note.id, note.column);
                return Step::Stay(moved.resolved().with_tail_deactivated());
            }
            return Step::Stay(moved);
        }

        let head_landed_now = landed && note.y_pos < last_row;
        let drained = moved_tail.end >= last_row;
        let tail = if drained {
            moved_tail.deactivated()
        } else {
            moved_tail
        };
        let moved = MusicalNote {
            y_pos,
            tail: Some(tail),
            ..note.clone()
        };

        if head_landed_now && moved_tail.is_active() {
            Step::SoundAndStay(moved)
        } else if head_landed_now {
            // Hit, then released before landing: sounds like a short note
            Step::Sound(moved)
        } else if drained && moved_tail.inactive {
            // Released or missed tails leave without a cut frame
            Step::Drop
        } else {
            Step::Stay(moved)
        }
    }
}

/// Convenience wrapper for one-off transitions
pub fn reduce(config: &GameConfig, state: &GameState, action: &Action) -> GameState {
    Reducer::new(config.clone()).reduce(state, action)
}
