//! Common CLI utility functions shared across commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use notefall_core::{GameConfig, KeyEvent, MusicalNote, ingest, load_records};
use tracing::{info, warn};

/// Load the game config, falling back to defaults when it cannot be read.
pub fn load_config(path: Option<&Path>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };

    match GameConfig::load(path) {
        Ok(config) => {
            info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load config {:?}: {}, using defaults", path, e);
            GameConfig::default()
        }
    }
}

/// Load and validate a song.
pub fn load_notes(path: &Path) -> Result<Vec<MusicalNote>> {
    let records =
        load_records(path).with_context(|| format!("reading song {}", path.display()))?;
    let notes = ingest(&records).with_context(|| format!("validating song {}", path.display()))?;
    info!("Loaded {} notes from {:?}", notes.len(), path);
    Ok(notes)
}

/// Load a key script.
pub fn load_key_script(path: &Path) -> Result<Vec<KeyEvent>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading key script {}", path.display()))?;
    let keys: Vec<KeyEvent> = serde_json::from_str(&content)
        .with_context(|| format!("parsing key script {}", path.display()))?;
    Ok(keys)
}
