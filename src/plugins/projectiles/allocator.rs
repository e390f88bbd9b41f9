//! Spawn consumer: materialize strategy payloads through the pool.
//!
//! Strategies never touch the pool. They write [`SpawnPayload`]s and this system is
//! the single place that turns them into active entities.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::plugins::pool::PoolAccess;
use crate::plugins::weapons::SpawnPayload;
use crate::plugins::weapons::strategy::SpawnOrder;

use super::components::{AreaEffect, Projectile, ProjectileState, area_sprite};

/// Rotation whose local +Y points along `dir`.
#[inline]
fn facing(dir: Vec2) -> Quat {
    if dir == Vec2::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_z(Vec2::Y.angle_to(dir))
}

pub fn allocate_payloads(mut reader: MessageReader<SpawnPayload>, mut pool: PoolAccess) {
    for SpawnPayload(order) in reader.read() {
        match *order {
            SpawnOrder::Projectile { blueprint, position, velocity, damage, lifetime } => {
                // Missing template: configuration gap, already logged by the pool.
                let Some(e) = pool.acquire(blueprint, position, facing(velocity)) else {
                    continue;
                };
                pool.commands.entity(e).insert((
                    Projectile { damage, lifetime },
                    ProjectileState::Active,
                    LinearVelocity(velocity),
                ));
            }
            SpawnOrder::Area { blueprint, position, radius, damage, duration, ticks } => {
                let Some(e) = pool.acquire(blueprint, position, Quat::IDENTITY) else {
                    continue;
                };
                pool.commands
                    .entity(e)
                    .insert((AreaEffect::new(radius, damage, duration, ticks), area_sprite(radius)));
            }
        }
    }
}
