//! Tunable gameplay constants.
//!
//! Gameplay defaults elsewhere are written in meters and converted with
//! [`Tunables::meters`], so one knob rescales the whole arena.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Player move speed, pixels per second.
    pub player_speed: f32,
    /// Degrees per second.
    pub player_rotate_speed: f32,
    pub fixed_hz: f64,
    pub rng_seed: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            player_speed: 100.0,
            player_rotate_speed: 180.0,
            fixed_hz: 60.0,
            rng_seed: 42,
        }
    }
}

impl Tunables {
    #[inline]
    pub fn meters(&self, m: f32) -> f32 {
        m * self.pixels_per_meter
    }
}
