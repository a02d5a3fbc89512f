//! Note scheduling.
//!
//! Turns a start-time-sorted note list into "wait this long, then release
//! this group" steps for a driver. Groups are maximal runs of notes sharing
//! the same `start_time`; delays are relative to the previous group.

use serde::Serialize;
use tracing::warn;

use crate::note::MusicalNote;

/// One release step of a song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledGroup {
    /// Milliseconds to wait after the previous group (or the start)
    pub delay_ms: u64,
    /// Absolute start time shared by every note in the group
    pub start_time: u64,
    pub notes: Vec<MusicalNote>,
}

/// Lazily groups a sorted slice of notes
///
/// The previous group's start time is carried in the iterator itself, so
/// two schedules over the same notes never interfere.
#[derive(Debug, Clone)]
pub struct NoteSchedule<'a> {
    remaining: &'a [MusicalNote],
    previous_start: Option<u64>,
    initial_delay_ms: u64,
}

impl<'a> NoteSchedule<'a> {
    pub fn new(notes: &'a [MusicalNote]) -> Self {
        Self::with_offset(notes, 0)
    }

    /// Schedule whose first group waits `initial_delay_ms`
    pub fn with_offset(notes: &'a [MusicalNote], initial_delay_ms: u64) -> Self {
        Self {
            remaining: notes,
            previous_start: None,
            initial_delay_ms,
        }
    }
}

impl Iterator for NoteSchedule<'_> {
    type Item = ScheduledGroup;

    fn next(&mut self) -> Option<Self::Item> {
        let start_time = self.remaining.first()?.start_time;
        let group_len = self
            .remaining
            .iter()
            .take_while(|note| note.start_time == start_time)
            .count();
        let (group, rest) = self.remaining.split_at(group_len);
        self.remaining = rest;

        let delay_ms = match self.previous_start {
            None => self.initial_delay_ms,
            Some(previous) => {
                if start_time < previous {
                    warn!(
                        "Note group at {}ms follows {}ms, releasing immediately",
                        start_time, previous
                    );
                }
                start_time.saturating_sub(previous)
            }
        };
        self.previous_start = Some(start_time);

        Some(ScheduledGroup {
            delay_ms,
            start_time,
            notes: group.to_vec(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining.is_empty() {
            (0, Some(0))
        } else {
            (1, Some(self.remaining.len()))
        }
    }
}

/// Group sorted notes into `(delay, group)` steps, first delay zero
pub fn schedule_notes(notes: &[MusicalNote]) -> Vec<ScheduledGroup> {
    NoteSchedule::new(notes).collect()
}

/// Group sorted notes, delaying the first group by `initial_delay_ms`
pub fn schedule_notes_with_offset(
    notes: &[MusicalNote],
    initial_delay_ms: u64,
) -> Vec<ScheduledGroup> {
    NoteSchedule::with_offset(notes, initial_delay_ms).collect()
}

/// Sum of all delays, i.e. when the last group is released
pub fn total_delay_ms(schedule: &[ScheduledGroup]) -> u64 {
    schedule.iter().map(|group| group.delay_ms).sum()
}
