//! Rejection sampling of spawn positions around the player.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::SpawnerConfig;

pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10;

/// Inside the map bounds (when enabled) and at least `min_spawn_distance` from the player.
pub fn is_valid_position(pos: Vec2, player: Vec2, cfg: &SpawnerConfig) -> bool {
    if cfg.use_map_bounds && (pos.cmplt(cfg.map_min).any() || pos.cmpgt(cfg.map_max).any()) {
        return false;
    }
    pos.distance(player) >= cfg.min_spawn_distance
}

/// Draw a candidate on the ring [min_spawn_distance, spawn_radius] around `player`.
///
/// Up to [`MAX_PLACEMENT_ATTEMPTS`] candidates are drawn; if none is valid the last
/// one is used anyway.
pub fn sample_spawn_position(rng: &mut impl Rng, player: Vec2, cfg: &SpawnerConfig) -> Vec2 {
    let (lo, hi) = (cfg.min_spawn_distance, cfg.spawn_radius);
    let mut candidate = player;

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let angle = rng.gen_range(0.0..TAU);
        let distance = if lo < hi { rng.gen_range(lo..=hi) } else { lo };
        candidate = player + Vec2::from_angle(angle) * distance;
        if cfg.use_map_bounds {
            candidate = candidate.clamp(cfg.map_min, cfg.map_max);
        }
        // The arena is flat: ground projection leaves the candidate unchanged.
        if is_valid_position(candidate, player, cfg) {
            break;
        }
    }
    candidate
}
