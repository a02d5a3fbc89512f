//! Invariant checks for the reducer over long pseudo-random action sequences
//!
//! Sequences are drawn from the crate's own LCG so every run sees the same
//! actions.

use std::collections::HashMap;

use notefall_core::game::{Action, FILLER_DRAWS, GameState, Multiplier, Reducer};
use notefall_core::note::{Instrument, MusicalNote, NoteId, column_for_pitch};
use notefall_core::rng::Draws;
use notefall_core::{GameConfig, hash, scale};

fn random_note(draws: &mut Draws, id: NoteId) -> MusicalNote {
    let pitch = draws.next_below(128) as u8;
    let duration_ms = u64::from(draws.next_below(3000));
    MusicalNote {
        id,
        visible: draws.next_below(4) != 0,
        y_pos: 0.0,
        column: column_for_pitch(pitch),
        instrument: Instrument::Violin,
        volume: draws.next_below(128) as u8,
        pitch,
        start_time: 0,
        end_time: duration_ms,
        tail: None,
    }
}

/// Deterministic mix of all five actions, ending the song part-way through
fn random_actions(seed: u32, len: usize) -> Vec<Action> {
    let mut draws = Draws::new(seed);
    let mut next_id = 0;
    let mut actions = Vec::with_capacity(len);

    for i in 0..len {
        if i == len * 3 / 4 {
            actions.push(Action::EndOfSong);
            continue;
        }
        let action = match draws.next_below(20) {
            0..=9 => Action::Tick,
            10..=13 => Action::PressColumn(draws.next_below(4) as u8),
            14..=16 => Action::ReleaseColumn(draws.next_below(4) as u8),
            _ if i < len * 3 / 4 => {
                let size = draws.next_below(3) + 1;
                let group = (0..size)
                    .map(|_| {
                        next_id += 1;
                        random_note(&mut draws, next_id)
                    })
                    .collect();
                Action::AddNoteGroup(group)
            }
            _ => Action::Tick,
        };
        actions.push(action);
    }
    actions
}

fn run(seed: u32, len: usize, mut check: impl FnMut(&GameState, &Action, &GameState)) {
    let reducer = Reducer::new(GameConfig::default());
    let mut state = reducer.initial_state();
    for action in random_actions(seed, len) {
        let next = reducer.reduce(&state, &action);
        check(&state, &action, &next);
        state = next;
    }
}

mod position {
    use super::*;

    #[test]
    fn test_notes_never_pass_last_row() {
        let config = GameConfig::default();
        for seed in 0..20 {
            run(seed, 3000, |_, _, next| {
                for note in &next.active_notes {
                    assert!(note.y_pos <= config.last_row + config.row_step());
                    assert!(note.y_pos >= 0.0);
                }
            });
        }
    }

    #[test]
    fn test_positions_never_decrease() {
        for seed in 0..10 {
            run(seed, 2000, |prev, _, next| {
                let before: HashMap<NoteId, f64> =
                    prev.active_notes.iter().map(|n| (n.id, n.y_pos)).collect();
                for note in &next.active_notes {
                    if let Some(&y) = before.get(&note.id) {
                        assert!(note.y_pos >= y);
                    }
                }
            });
        }
    }
}

mod tails {
    use super::*;

    #[test]
    fn test_short_notes_never_get_tails() {
        for seed in 0..20 {
            run(seed, 2000, |_, _, next| {
                for note in &next.active_notes {
                    if note.duration_ms() <= 1000 {
                        assert!(note.tail.is_none(), "note {} has a tail", note.id);
                    }
                }
            });
        }
    }

    #[test]
    fn test_tail_presence_and_inactivity_are_permanent() {
        for seed in 0..20 {
            run(seed, 3000, |prev, _, next| {
                let before: HashMap<NoteId, &MusicalNote> =
                    prev.active_notes.iter().map(|n| (n.id, n)).collect();
                for note in &next.active_notes {
                    let Some(old) = before.get(&note.id) else {
                        continue;
                    };
                    assert_eq!(old.has_tail(), note.has_tail());
                    if old.tail.is_some_and(|t| t.inactive) {
                        assert!(note.tail.unwrap().inactive);
                    }
                    // Resolved notes stay resolved
                    if !old.visible {
                        assert!(!note.visible);
                    }
                }
            });
        }
    }

    #[test]
    fn test_tail_edges_stay_ordered() {
        for seed in 0..10 {
            run(seed, 3000, |_, _, next| {
                for tail in next.active_notes.iter().filter_map(|n| n.tail) {
                    assert!(tail.end <= tail.start);
                }
            });
        }
    }
}

mod bookkeeping {
    use super::*;

    #[test]
    fn test_expired_is_previous_board() {
        for seed in 0..10 {
            run(seed, 1500, |prev, _, next| {
                if !prev.is_game_over {
                    assert_eq!(next.expired_notes, prev.active_notes);
                }
            });
        }
    }

    #[test]
    fn test_game_over_iff_board_cleared() {
        for seed in 0..20 {
            run(seed, 3000, |_, _, next| {
                let cleared = next.all_notes_finished
                    && next.active_notes.is_empty()
                    && next.ready_notes.is_empty()
                    && next.expired_notes.is_empty();
                assert_eq!(next.is_game_over, cleared);
            });
        }
    }

    #[test]
    fn test_tick_count_counts_ticks_only() {
        for seed in 0..5 {
            run(seed, 1000, |prev, action, next| {
                if prev.is_game_over {
                    return;
                }
                let expected = prev.tick_count + u64::from(matches!(action, Action::Tick));
                assert_eq!(next.tick_count, expected);
            });
        }
    }

    #[test]
    fn test_seed_advances_on_press_and_arrival() {
        for seed in 0..5 {
            run(seed, 1000, |prev, action, next| {
                if prev.is_game_over {
                    return;
                }
                match action {
                    // A miss advances the seed once per filler draw
                    Action::PressColumn(_) if next.misses > prev.misses => {
                        let mut expected = prev.random_seed;
                        for _ in 0..FILLER_DRAWS {
                            expected = hash(expected);
                        }
                        assert_eq!(next.random_seed, expected)
                    }
                    Action::PressColumn(_) | Action::AddNoteGroup(_) => {
                        assert_eq!(next.random_seed, hash(prev.random_seed))
                    }
                    _ => assert_eq!(next.random_seed, prev.random_seed),
                }
            });
        }
    }
}

mod scoring {
    use super::*;

    #[test]
    fn test_points_change_only_by_multiplier() {
        for seed in 0..20 {
            run(seed, 3000, |prev, action, next| {
                let m = Multiplier::for_notes_played(prev.notes_played);
                match action {
                    Action::PressColumn(_) => {
                        let hit = next.notes_played == prev.notes_played + 1;
                        if hit {
                            assert_eq!(next.points, m.award(prev.points));
                        } else {
                            assert_eq!(next.notes_played, prev.notes_played);
                            assert_eq!(next.points, prev.points);
                        }
                    }
                    Action::ReleaseColumn(_) => {
                        assert_eq!(next.notes_played, prev.notes_played);
                        assert!(next.points <= prev.points);
                    }
                    _ => {
                        assert_eq!(next.points, prev.points);
                        assert_eq!(next.notes_played, prev.notes_played);
                    }
                }
            });
        }
    }

    #[test]
    fn test_hit_increment_from_non_negative_points() {
        for played in [0, 9, 10, 19, 20, 49, 50, 123] {
            let m = Multiplier::for_notes_played(played);
            let expected = (1.0 + 0.2 * f64::from(played / 10)).floor() as i64;
            for points in [0, 1, 7, 100] {
                assert_eq!(m.award(points) - points, expected);
            }
        }
    }

    #[test]
    fn test_release_without_hold_is_noop() {
        for seed in 0..10 {
            run(seed, 2000, |prev, action, next| {
                if let Action::ReleaseColumn(column) = action
                    && !prev.is_holding(*column)
                {
                    assert_eq!(next.points, prev.points);
                    assert_eq!(next.active_notes, prev.active_notes);
                }
            });
        }
    }
}

mod prng {
    use super::*;

    #[test]
    fn test_scale_range_over_long_chain() {
        let mut seed = 0;
        for _ in 0..100_000 {
            let value = scale(seed);
            assert!((0.0..1.0).contains(&value));
            seed = hash(seed);
        }
    }
}
