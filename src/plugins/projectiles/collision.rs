use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::layers::{Layer, is_in_layer};
use crate::plugins::combat::{DamageRequest, Damageable, Health};
use crate::plugins::pool::PoolState;

use super::components::{Projectile, ProjectileState};

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget { collider: ev.collider1, body: ev.body1 },
        CollisionTarget { collider: ev.collider2, body: ev.body2 },
    )
}

/// First contact retires a projectile. Walls just stop it; a live enemy also takes its damage.
///
/// Dead or pooled enemies are passed through.
pub fn process_projectile_collisions(
    mut started: MessageReader<CollisionStart>,
    mut q_projectiles: Query<(&Projectile, &mut ProjectileState)>,
    q_layers: Query<&CollisionLayers>,
    q_health: Query<(&Health, Option<&PoolState>)>,
    mut damage: MessageWriter<DamageRequest>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        let p1 = q_projectiles.contains(t1.collider);
        let p2 = q_projectiles.contains(t2.collider);
        if !(p1 ^ p2) {
            continue;
        }
        let (projectile_side, other_side) = if p1 { (t1, t2) } else { (t2, t1) };

        if seen.contains(&projectile_side.collider) {
            continue;
        }
        let Ok(other_layers) = q_layers.get(other_side.collider) else {
            continue;
        };
        let Ok((projectile, mut state)) = q_projectiles.get_mut(projectile_side.collider) else {
            continue;
        };
        if *state != ProjectileState::Active {
            continue;
        }

        if is_in_layer(other_layers, Layer::World) {
            seen.insert(projectile_side.collider);
            *state = ProjectileState::PendingReturn;
            continue;
        }

        if is_in_layer(other_layers, Layer::Enemy) {
            let enemy = other_side.gameplay_owner();
            let Ok((hp, pool_state)) = q_health.get(enemy) else {
                continue;
            };
            if hp.is_dead() || pool_state == Some(&PoolState::Queued) {
                continue;
            }
            seen.insert(projectile_side.collider);
            damage.write(DamageRequest { target: enemy, amount: projectile.damage as f32 });
            *state = ProjectileState::PendingReturn;
        }
    }
}
