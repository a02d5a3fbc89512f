use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Board geometry and timing shared by the reducer and the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Bottom threshold of the fall axis
    pub last_row: f64,
    /// Height of the hit window above `last_row`
    pub hit_threshold: f64,
    /// Real-time period between ticks
    pub tick_interval_ms: u64,
    /// Time for a note to fall from the top to `last_row`
    pub fall_time_ms: u64,
    /// Notes longer than this get a tail
    pub tail_min_ms: u64,
    /// PRNG seed of a fresh game
    pub initial_seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            last_row: 400.0,
            hit_threshold: 40.0,
            tick_interval_ms: 10,
            fall_time_ms: 2000,
            tail_min_ms: 1000,
            initial_seed: 0,
        }
    }
}

impl GameConfig {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML content and validate it
    ///
    /// Missing keys keep their defaults.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.last_row.is_finite() && self.last_row > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "last_row must be positive, got {}",
                self.last_row
            )));
        }
        if !(self.hit_threshold.is_finite() && self.hit_threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "hit_threshold must be positive, got {}",
                self.hit_threshold
            )));
        }
        if self.hit_threshold > self.last_row {
            return Err(Error::InvalidConfig(format!(
                "hit_threshold {} exceeds last_row {}",
                self.hit_threshold, self.last_row
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidConfig("tick_interval_ms must be non-zero".into()));
        }
        if self.fall_time_ms < self.tick_interval_ms {
            return Err(Error::InvalidConfig(format!(
                "fall_time_ms {} is shorter than one tick ({}ms)",
                self.fall_time_ms, self.tick_interval_ms
            )));
        }
        Ok(())
    }

    /// Distance a note travels per tick
    pub fn row_step(&self) -> f64 {
        self.last_row * self.tick_interval_ms as f64 / self.fall_time_ms as f64
    }

    /// Milliseconds of note duration per position unit of tail
    pub fn tail_rate(&self) -> f64 {
        self.fall_time_ms as f64 / self.last_row
    }

    /// Lower edge of the hit window
    pub fn hit_window_start(&self) -> f64 {
        self.last_row - self.hit_threshold
    }

    /// Whether a position lies in `[last_row - hit_threshold, last_row)`
    pub fn in_hit_window(&self, y_pos: f64) -> bool {
        y_pos >= self.hit_window_start() && y_pos < self.last_row
    }

    /// Number of ticks for a note to reach `last_row` from the top
    pub fn ticks_to_bottom(&self) -> u64 {
        (self.last_row / self.row_step()).ceil() as u64
    }
}
