//! Conversion of already-parsed song records into `MusicalNote`s.
//!
//! Records arrive in file order with times in seconds. Ingestion assigns
//! ids, derives columns and rejects anything the reducer must not see.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::note::{Instrument, MusicalNote, column_for_pitch};

/// Highest MIDI velocity or pitch
pub const MIDI_MAX: u32 = 127;

/// One row of a song, as produced by the file loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Whether the player has to press this note
    pub user_played: bool,
    pub instrument: Instrument,
    pub velocity: u32,
    pub pitch: u32,
    /// Seconds
    pub start: f64,
    /// Seconds
    pub end: f64,
}

/// Load records from a JSON array
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<NoteRecord>> {
    let content = fs::read_to_string(path)?;
    let records: Vec<NoteRecord> = serde_json::from_str(&content)?;
    Ok(records)
}

fn seconds_to_ms(index: usize, field: &str, seconds: f64) -> Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(Error::InvalidNote {
            index,
            reason: format!("{} time {} is not a non-negative number", field, seconds),
        });
    }
    Ok((seconds * 1000.0).round() as u64)
}

fn midi_value(index: usize, field: &str, value: u32) -> Result<u8> {
    if value > MIDI_MAX {
        return Err(Error::InvalidNote {
            index,
            reason: format!("{} {} exceeds {}", field, value, MIDI_MAX),
        });
    }
    Ok(value as u8)
}

/// Validate records and turn them into notes with ids `0..n`
pub fn ingest(records: &[NoteRecord]) -> Result<Vec<MusicalNote>> {
    let mut notes = Vec::with_capacity(records.len());
    let mut previous_ms = 0;

    for (index, record) in records.iter().enumerate() {
        let start_time = seconds_to_ms(index, "start", record.start)?;
        let end_time = seconds_to_ms(index, "end", record.end)?;
        if end_time < start_time {
            return Err(Error::InvalidNote {
                index,
                reason: format!("ends at {}ms before it starts at {}ms", end_time, start_time),
            });
        }
        if start_time < previous_ms {
            return Err(Error::UnsortedNotes {
                index,
                previous_ms,
                start_ms: start_time,
            });
        }
        previous_ms = start_time;

        let pitch = midi_value(index, "pitch", record.pitch)?;
        let volume = midi_value(index, "velocity", record.velocity)?;

        notes.push(MusicalNote {
            id: index as u64,
            visible: record.user_played,
            y_pos: 0.0,
            column: column_for_pitch(pitch),
            instrument: record.instrument,
            volume,
            pitch,
            start_time,
            end_time,
            tail: None,
        });
    }

    debug!(
        "Ingested {} notes ({} playable)",
        notes.len(),
        notes.iter().filter(|n| n.visible).count()
    );
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(start: f64, end: f64) -> NoteRecord {
        NoteRecord {
            user_played: true,
            instrument: Instrument::Piano,
            velocity: 90,
            pitch: 61,
            start,
            end,
        }
    }

    #[test]
    fn test_ingest_assigns_ids_and_columns() {
        let notes = ingest(&[record(0.0, 0.2), record(0.5, 2.0)]).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, 0);
        assert_eq!(notes[1].id, 1);
        assert_eq!(notes[0].column, 1);
        assert_eq!(notes[1].start_time, 500);
        assert_eq!(notes[1].end_time, 2000);
        assert!(notes.iter().all(|n| n.tail.is_none() && n.y_pos == 0.0));
    }

    #[test]
    fn test_ingest_rounds_milliseconds() {
        let notes = ingest(&[record(0.1234, 0.9996)]).unwrap();
        assert_eq!(notes[0].start_time, 123);
        assert_eq!(notes[0].end_time, 1000);
    }

    #[test]
    fn test_ingest_background_note() {
        let mut background = record(0.0, 1.0);
        background.user_played = false;
        let notes = ingest(&[background]).unwrap();
        assert!(!notes[0].visible);
    }

    #[test]
    fn test_ingest_rejects_unsorted() {
        let result = ingest(&[record(1.0, 1.5), record(0.5, 0.6)]);
        assert!(matches!(
            result,
            Err(Error::UnsortedNotes {
                index: 1,
                previous_ms: 1000,
                start_ms: 500
            })
        ));
    }

    #[test]
    fn test_ingest_rejects_out_of_range_pitch() {
        let mut bad = record(0.0, 1.0);
        bad.pitch = 128;
        assert!(matches!(
            ingest(&[bad]),
            Err(Error::InvalidNote { index: 0, .. })
        ));
    }

    #[test]
    fn test_ingest_rejects_reversed_span() {
        assert!(ingest(&[record(2.0, 1.0)]).is_err());
    }

    #[test]
    fn test_ingest_rejects_negative_time() {
        assert!(ingest(&[record(-1.0, 1.0)]).is_err());
        assert!(ingest(&[record(f64::NAN, 1.0)]).is_err());
    }

    #[test]
    fn test_load_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"user_played":true,"instrument":"flute","velocity":80,"pitch":70,"start":0.0,"end":0.5}}]"#
        )
        .unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].instrument, Instrument::Flute);
    }
}
