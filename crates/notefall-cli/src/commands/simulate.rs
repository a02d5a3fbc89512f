//! Simulate command implementation

use std::path::Path;

use anyhow::{Context, Result};
use notefall_core::{GameConfig, Replay, schedule_notes};
use tracing::{info, warn};

use crate::cli_utils::{load_key_script, load_notes};
use crate::display::format_summary;

pub fn run(
    config: GameConfig,
    notes_path: &Path,
    inputs: Option<&Path>,
    max_ticks: Option<u64>,
    json: bool,
) -> Result<()> {
    let notes = load_notes(notes_path)?;
    let keys = match inputs {
        Some(path) => load_key_script(path)?,
        None => Vec::new(),
    };
    info!("Simulating {} notes against {} key events", notes.len(), keys.len());

    let mut replay = Replay::new(config, schedule_notes(&notes))
        .context("preparing replay")?
        .with_keys(keys);
    if let Some(ticks) = max_ticks {
        replay = replay.with_max_trailing_ticks(ticks);
    }
    let report = replay.run();

    if !report.completed {
        warn!(
            "Board did not clear within the trailing tick limit ({} ticks run)",
            report.final_state.tick_count
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_summary(&report.final_state, Some(&report)));
    }
    Ok(())
}
