//! Random spawn jitter for newly detached word bodies.
//!
//! Words that drop with exactly zero velocity all tip over the same way and
//! the fall looks mechanical. Each body therefore starts with a small random
//! horizontal push and spin. The ranges are deliberately tiny; the effect
//! should read as "loose letters", not an explosion.
//!
//! The source is injectable so tests can seed it and assert exact behavior,
//! while production use seeds from entropy.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Half-width of the horizontal velocity range, px/s.
const KICK: f32 = 2.5;
/// Half-width of the angular velocity range, rad/s.
const SPIN: f32 = 0.025;

/// Random source for per-body spawn jitter.
pub struct Jitter {
    rng: SmallRng,
}

impl Jitter {
    /// Entropy-seeded source; every run jitters differently.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic source for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Initial horizontal velocity in `[-2.5, 2.5]` px/s.
    pub fn horizontal_velocity(&mut self) -> f32 {
        self.rng.gen_range(-KICK..=KICK)
    }

    /// Initial angular velocity in `[-0.025, 0.025]` rad/s.
    pub fn spin(&mut self) -> f32 {
        self.rng.gen_range(-SPIN..=SPIN)
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new()
    }
}
