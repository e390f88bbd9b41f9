//! Return commit: the only place projectiles go back to the pool.

use bevy::prelude::*;

use crate::plugins::pool::{PoolAccess, Pooled};

use super::components::ProjectileState;

pub fn return_projectiles(mut pool: PoolAccess, mut q: Query<(Entity, &Pooled, &mut ProjectileState)>) {
    for (e, pooled, mut state) in &mut q {
        if *state != ProjectileState::PendingReturn {
            continue;
        }
        *state = ProjectileState::Inactive;
        pool.release(pooled.blueprint, e);
    }
}
