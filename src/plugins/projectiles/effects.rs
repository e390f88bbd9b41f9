//! Time-driven effects: projectile lifetimes and area pulses.

use bevy::prelude::*;

use crate::plugins::combat::{DamageRequest, Damageable, Health, Hostile};
use crate::plugins::pool::{PoolAccess, PoolState, Pooled};

use super::components::{AreaEffect, Projectile, ProjectileState};

pub fn tick_projectile_lifetimes(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut Projectile, &mut ProjectileState)>,
) {
    let dt = time.delta_secs();
    for (mut projectile, mut state) in &mut q {
        if *state != ProjectileState::Active {
            continue;
        }
        projectile.lifetime -= dt;
        if projectile.lifetime <= 0.0 {
            *state = ProjectileState::PendingReturn;
        }
    }
}

/// Pulse due area effects at every live hostile inside their radius.
///
/// A spent effect goes straight back to the pool.
pub fn pulse_area_effects(
    time: Res<Time<Fixed>>,
    mut q_areas: Query<(Entity, &Pooled, &PoolState, &Transform, &mut AreaEffect)>,
    q_targets: Query<(Entity, &Transform, &Health, Option<&PoolState>), With<Hostile>>,
    mut damage: MessageWriter<DamageRequest>,
    mut pool: PoolAccess,
) {
    let dt = time.delta_secs();

    for (e, pooled, state, tf, mut area) in &mut q_areas {
        if *state != PoolState::Active {
            continue;
        }
        if area.tick(dt) {
            let center = tf.translation.truncate();
            let r2 = area.radius * area.radius;
            for (target, target_tf, hp, target_state) in &q_targets {
                if hp.is_dead() || target_state == Some(&PoolState::Queued) {
                    continue;
                }
                if target_tf.translation.truncate().distance_squared(center) <= r2 {
                    damage.write(DamageRequest { target, amount: area.damage as f32 });
                }
            }
        }
        if area.is_spent() {
            pool.release(pooled.blueprint, e);
        }
    }
}
