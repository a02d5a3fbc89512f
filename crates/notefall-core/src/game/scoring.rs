use serde::Serialize;

/// Hits needed per multiplier step
pub const HITS_PER_STEP: u32 = 10;

/// Score factor `1 + 0.2 * floor(notes_played / 10)`, kept in tenths so the
/// arithmetic stays exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Multiplier {
    tenths: i64,
}

impl Multiplier {
    pub fn for_notes_played(notes_played: u32) -> Self {
        Self {
            tenths: 10 + 2 * i64::from(notes_played / HITS_PER_STEP),
        }
    }

    pub fn value(&self) -> f64 {
        self.tenths as f64 / 10.0
    }

    /// `points + multiplier`, truncated toward zero
    pub fn award(&self, points: i64) -> i64 {
        (points * 10 + self.tenths) / 10
    }

    /// `points - multiplier`, truncated toward zero
    pub fn penalize(&self, points: i64) -> i64 {
        (points * 10 - self.tenths) / 10
    }
}

impl std::fmt::Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{:.1}", self.value())
    }
}
