//! Projectiles plugin: projectiles and area effects spawned by weapons.
//!
//! Producers (strategies) only write [`SpawnPayload`] messages. Everything with
//! a body or a timer lives here and cycles through the entity pool.
//!
//! ```text
//! FixedUpdate
//!   SimSet::Weapons    fire_weapons ──SpawnPayload──▶ allocate_payloads ──▶ pool.acquire
//!   SimSet::Effects    tick_projectile_lifetimes   (Active → PendingReturn on expiry)
//!                      pulse_area_effects          ──DamageRequest──▶
//!                                                  (spent → pool.release)
//! FixedPostUpdate
//!   SimSet::Collisions process_projectile_collisions  CollisionStart → DamageRequest,
//!                                                     Active → PendingReturn
//!   SimSet::Lifecycle  return_projectiles             PendingReturn → Inactive → pool.release
//! ```
//!
//! A projectile retires on its first contact (wall or live enemy) or when its
//! lifetime runs out, whichever comes first. The return commit is the only
//! writer of the `Inactive` state.
//!
//! [`SpawnPayload`]: crate::plugins::weapons::SpawnPayload

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod effects;

use bevy::prelude::*;

use crate::plugins::core::SimSet;
use crate::plugins::pool::{BlueprintId, Blueprints};
use crate::plugins::weapons::scheduler::fire_weapons;

pub use components::{AreaEffect, Projectile, ProjectileState};

pub fn plugin(app: &mut App) {
    app.init_resource::<Blueprints>();
    {
        let mut blueprints = app.world_mut().resource_mut::<Blueprints>();
        blueprints.register(BlueprintId::PROJECTILE, components::projectile_blueprint());
        blueprints.register(BlueprintId::AREA_EFFECT, components::area_effect_blueprint());
    }

    app.add_systems(
        FixedUpdate,
        allocator::allocate_payloads
            .after(fire_weapons)
            .in_set(SimSet::Weapons),
    )
    .add_systems(
        FixedUpdate,
        (effects::tick_projectile_lifetimes, effects::pulse_area_effects).in_set(SimSet::Effects),
    )
    .add_systems(
        FixedPostUpdate,
        collision::process_projectile_collisions.in_set(SimSet::Collisions),
    )
    .add_systems(
        FixedPostUpdate,
        commit::return_projectiles.in_set(SimSet::Lifecycle),
    );
}
