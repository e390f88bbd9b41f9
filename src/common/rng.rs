//! Seeded simulation RNG.
//!
//! All gameplay randomness (spawn placement, blueprint choice) draws from this
//! one resource, so a fixed seed replays the same run.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Resource)]
pub struct SimRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Rewind to the initial seed (used on restart).
    pub fn reseed(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}
