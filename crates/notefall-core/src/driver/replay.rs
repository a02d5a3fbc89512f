//! Deterministic virtual-time replay.
//!
//! Merges the song schedule, periodic ticks and a scripted list of key
//! events on a simulated clock. At equal timestamps a note group goes first,
//! then the end of the song, then key events in script order, then the tick.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Observer;
use crate::config::{GameConfig, replay};
use crate::error::Result;
use crate::game::{Action, GameState, Reducer};
use crate::schedule::ScheduledGroup;

/// Key edge in a scripted input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Press,
    Release,
}

/// Scripted key edge at a point of virtual time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub time_ms: u64,
    pub column: u8,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn press(time_ms: u64, column: u8) -> Self {
        Self {
            time_ms,
            column,
            action: KeyAction::Press,
        }
    }

    pub fn release(time_ms: u64, column: u8) -> Self {
        Self {
            time_ms,
            column,
            action: KeyAction::Release,
        }
    }

    fn to_action(self) -> Action {
        match self.action {
            KeyAction::Press => Action::PressColumn(self.column),
            KeyAction::Release => Action::ReleaseColumn(self.column),
        }
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub final_state: GameState,
    pub peak_points: i64,
    /// Reducer invocations
    pub transitions: u64,
    /// Notes that passed through `ready_notes`, fillers included
    pub sounded: u64,
    /// Virtual time of the last action
    pub elapsed_ms: u64,
    /// Whether game over was reached before the tick limit
    pub completed: bool,
}

/// Replay a song and a key script on a simulated clock
#[derive(Debug, Clone)]
pub struct Replay {
    reducer: Reducer,
    schedule: Vec<ScheduledGroup>,
    keys: Vec<KeyEvent>,
    max_trailing_ticks: u64,
}

/// Source of the next action on the virtual timeline, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Source {
    Group,
    EndOfSong,
    Key,
    Tick,
}

impl Replay {
    /// Fails with `Error::InvalidConfig` when the config cannot drive a
    /// virtual clock, e.g. a zero tick interval
    pub fn new(config: GameConfig, schedule: Vec<ScheduledGroup>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reducer: Reducer::new(config),
            schedule,
            keys: Vec::new(),
            max_trailing_ticks: replay::DEFAULT_MAX_TRAILING_TICKS,
        })
    }

    /// Key script; events are ordered by time, keeping script order for ties
    pub fn with_keys(mut self, mut keys: Vec<KeyEvent>) -> Self {
        keys.sort_by_key(|key| key.time_ms);
        self.keys = keys;
        self
    }

    /// Ticks allowed after the end of the song
    pub fn with_max_trailing_ticks(mut self, ticks: u64) -> Self {
        self.max_trailing_ticks = ticks;
        self
    }

    pub fn run(&self) -> ReplayReport {
        self.run_with(&mut |_: &Action, _: &GameState| {})
    }

    pub fn run_with<O: Observer>(&self, observer: &mut O) -> ReplayReport {
        let tick_ms = self.reducer.config().tick_interval_ms;
        let release_times: Vec<u64> = self
            .schedule
            .iter()
            .scan(0u64, |clock, group| {
                *clock += group.delay_ms;
                Some(*clock)
            })
            .collect();
        let end_time = release_times.last().copied().unwrap_or(0);

        let mut state = self.reducer.initial_state();
        let mut report = ReplayReport {
            final_state: state.clone(),
            peak_points: 0,
            transitions: 0,
            sounded: 0,
            elapsed_ms: 0,
            completed: false,
        };

        let mut next_group = 0;
        let mut next_key = 0;
        let mut next_tick_ms = tick_ms;
        let mut song_ended = false;
        let mut trailing_ticks = 0;

        loop {
            let candidates = [
                release_times
                    .get(next_group)
                    .map(|&time| (time, Source::Group)),
                (!song_ended && next_group == self.schedule.len())
                    .then_some((end_time, Source::EndOfSong)),
                self.keys
                    .get(next_key)
                    .map(|key| (key.time_ms, Source::Key)),
                Some((next_tick_ms, Source::Tick)),
            ];
            let Some((time_ms, source)) = candidates.into_iter().flatten().min() else {
                break;
            };

            let action = match source {
                Source::Group => {
                    let notes = self.schedule[next_group].notes.clone();
                    next_group += 1;
                    Action::AddNoteGroup(notes)
                }
                Source::EndOfSong => {
                    song_ended = true;
                    Action::EndOfSong
                }
                Source::Key => {
                    let key = self.keys[next_key];
                    next_key += 1;
                    key.to_action()
                }
                Source::Tick => {
                    if song_ended {
                        if trailing_ticks >= self.max_trailing_ticks {
                            warn!(
                                "Replay stopped after {} trailing ticks without game over",
                                trailing_ticks
                            );
                            break;
                        }
                        trailing_ticks += 1;
                    }
                    next_tick_ms += tick_ms;
                    Action::Tick
                }
            };

            state = self.reducer.reduce(&state, &action);
            observer.on_transition(&action, &state);

            report.transitions += 1;
            report.elapsed_ms = time_ms;
            report.sounded += state.ready_notes.len() as u64;
            report.peak_points = report.peak_points.max(state.points);

            if state.is_game_over {
                report.completed = true;
                break;
            }
        }

        debug!(
            "Replay finished after {} transitions at {}ms (completed: {})",
            report.transitions, report.elapsed_ms, report.completed
        );
        report.final_state = state;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::note::{Instrument, MusicalNote};
    use crate::schedule::schedule_notes;

    fn note(id: u64, visible: bool, start_time: u64, duration_ms: u64) -> MusicalNote {
        MusicalNote {
            id,
            visible,
            y_pos: 0.0,
            column: 0,
            instrument: Instrument::Piano,
            volume: 100,
            pitch: 60,
            start_time,
            end_time: start_time + duration_ms,
            tail: None,
        }
    }

    #[test]
    fn test_empty_song_ends_immediately() {
        let report = Replay::new(GameConfig::default(), Vec::new())
            .unwrap()
            .run();
        assert!(report.completed);
        assert_eq!(report.transitions, 1);
        assert!(report.final_state.is_game_over);
    }

    #[test]
    fn test_tie_break_order() {
        let notes = vec![note(0, false, 0, 100)];
        let replay = Replay::new(GameConfig::default(), schedule_notes(&notes))
            .unwrap()
            .with_keys(vec![KeyEvent::press(0, 1), KeyEvent::release(10, 1)]);

        let mut actions = Vec::new();
        replay.run_with(&mut |action: &Action, _: &GameState| {
            if actions.len() < 5 {
                actions.push(action.clone());
            }
        });

        assert!(matches!(actions[0], Action::AddNoteGroup(_)));
        assert_eq!(actions[1], Action::EndOfSong);
        assert_eq!(actions[2], Action::PressColumn(1));
        assert_eq!(actions[3], Action::ReleaseColumn(1));
        assert_eq!(actions[4], Action::Tick);
    }

    #[test]
    fn test_background_note_sounds_once() {
        let notes = vec![note(0, false, 0, 100)];
        let report = Replay::new(GameConfig::default(), schedule_notes(&notes))
            .unwrap()
            .run();
        assert!(report.completed);
        assert_eq!(report.sounded, 1);
        assert_eq!(report.final_state.points, 0);
    }

    #[test]
    fn test_trailing_tick_limit() {
        let notes = vec![note(0, false, 0, 100)];
        let report = Replay::new(GameConfig::default(), schedule_notes(&notes))
            .unwrap()
            .with_max_trailing_ticks(5)
            .run();
        assert!(!report.completed);
        assert!(!report.final_state.is_game_over);
    }

    #[test]
    fn test_zero_tick_interval_is_rejected() {
        // Two start times: with a zero tick the clock would never pass the first
        let notes = vec![note(0, true, 0, 100), note(1, true, 500, 100)];
        let config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        let result = Replay::new(config, schedule_notes(&notes));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_keys_are_sorted_stably() {
        let replay = Replay::new(GameConfig::default(), Vec::new())
            .unwrap()
            .with_keys(vec![
                KeyEvent::press(20, 0),
                KeyEvent::release(5, 1),
                KeyEvent::press(5, 2),
            ]);
        let columns: Vec<u8> = replay.keys.iter().map(|k| k.column).collect();
        assert_eq!(columns, vec![1, 2, 0]);
    }

    #[test]
    fn test_key_event_serde() {
        let json = r#"{"time_ms":120,"column":3,"action":"release"}"#;
        let key: KeyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(key, KeyEvent::release(120, 3));
    }
}
