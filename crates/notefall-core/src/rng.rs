//! Linear congruential generator.
//!
//! The seed lives in `GameState` and is threaded through every transition,
//! so the same action sequence always draws the same values.

/// Multiplier of the generator
const LCG_MULTIPLIER: u64 = 1_103_515_245;

/// Increment of the generator
const LCG_INCREMENT: u64 = 12_345;

/// Modulus of the generator (2^31)
pub const LCG_MODULUS: u64 = 1 << 31;

/// Advance a seed: `(1103515245 * seed + 12345) mod 2^31`
pub fn hash(seed: u32) -> u32 {
    ((LCG_MULTIPLIER * u64::from(seed) + LCG_INCREMENT) % LCG_MODULUS) as u32
}

/// Map a seed to `[0, 1)` through its hash
pub fn scale(seed: u32) -> f64 {
    f64::from(hash(seed)) / LCG_MODULUS as f64
}

/// Successive draws from a seed without touching the caller's copy
///
/// Each call to [`Draws::next_unit`] yields `scale` of the current seed and
/// then advances it.
#[derive(Debug, Clone, Copy)]
pub struct Draws {
    seed: u32,
}

impl Draws {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Seed the next draw will start from
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Next value in `[0, 1)`
    pub fn next_unit(&mut self) -> f64 {
        let value = scale(self.seed);
        self.seed = hash(self.seed);
        value
    }

    /// Next integer in `[0, bound)`; `bound` must be non-zero
    pub fn next_below(&mut self, bound: u32) -> u32 {
        let value = (self.next_unit() * f64::from(bound)) as u32;
        value.min(bound - 1)
    }
}
