//! Schedule command implementation

use std::path::Path;

use anyhow::Result;
use notefall_core::{GameConfig, schedule_notes_with_offset};

use crate::cli_utils::load_notes;
use crate::display::format_schedule;

pub fn run(config: &GameConfig, notes_path: &Path, offset: u64, json: bool) -> Result<()> {
    let notes = load_notes(notes_path)?;
    let schedule = schedule_notes_with_offset(&notes, offset);

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        print!("{}", format_schedule(&schedule));
        println!("{} note(s) in {} group(s)", notes.len(), schedule.len());
        println!(
            "Each note reaches the bottom {} ticks ({}ms) after release",
            config.ticks_to_bottom(),
            config.ticks_to_bottom() * config.tick_interval_ms
        );
    }
    Ok(())
}
