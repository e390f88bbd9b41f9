//! Enemies plugin: pooled pursuers composed from capabilities.
//!
//! Every enemy carries the base set (stats, health, pursuit, contact damage,
//! life state). Minions add [`SwarmBehavior`] and [`JumpAttack`]; the systems
//! pick those up by query, so there is no enemy subtype.
//!
//! # Data flow
//! ```text
//! FixedUpdate / SimSet::Movement
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │ acquire_pursuit_targets  PursuitTarget.player = the Player (if any),     │
//! │                          distance cached for this tick                   │
//! │ rescan_swarms            every SWARM_RESCAN_TICKS, on request, or when   │
//! │                          the leader is gone: nearby peers + leader       │
//! │ steer_enemies            LinearVelocity + rotation, by priority below    │
//! └──────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v  (avian step emits CollisionStart)
//! FixedPostUpdate
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │ SimSet::Collisions  contact_damage      CollisionStart(enemy, player)    │
//! │                                          → DamageRequest (player)        │
//! │ SimSet::Damage      apply_health_damage (combat plugin)                  │
//! │ SimSet::Lifecycle   tick_jump_timers → recycle_dead_enemies              │
//! │                       → trigger_enemy_deaths                             │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Life cycle
//! ```text
//!   acquire (blueprint build) ──▶ Alive ──health hits 0──▶ Dead { recycle_in }
//!                                                              │ RECYCLE_DELAY
//!                                                              v
//!                       pool queue ◀── release ◀──────── Recycled
//! ```
//! - `trigger_enemy_deaths` is the only place an enemy becomes `Dead`. It stops the
//!   body, clears its collision filters, greys the sprite and publishes
//!   `EnemyKilled` exactly once.
//! - A dead enemy still occupies a spawn slot in [`EnemyCensus`] until it is
//!   recycled; the census drops it in the same step that releases it.
//! - Reacquiring runs the blueprint build again, which puts back `Alive`, full
//!   health, fresh timers and active layers. Nothing from the previous life
//!   carries over.
//! - Recycling runs before the death check, so a fresh corpse waits the full
//!   delay starting next tick.
//!
//! # Steering priority
//! One rule wins per enemy per tick:
//! 1. a lunge in progress keeps its velocity;
//! 2. a ready jump with the player in range starts a lunge;
//! 3. a swarm follower outside follow distance moves toward its leader at
//!    `SWARM_FOLLOW_SPEED` of its move speed;
//! 4. the player within detection range is pursued;
//! 5. otherwise the enemy stops.
//!
//! Queued (pooled) and dead enemies are skipped by every behavior system and are
//! never counted as swarm peers.

pub mod behavior;
pub mod components;
pub mod lifecycle;

use bevy::prelude::*;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::core::SimSet;
use crate::plugins::pool::{BlueprintId, Blueprints};

pub use components::{Enemy, EnemyLife, EnemyStats, JumpAttack, PursuitTarget, SwarmBehavior};

/// Enemies occupying a spawn slot: spawned and not yet recycled.
///
/// Maintained incrementally by the spawner (+1) and the recycle step (-1).
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnemyCensus {
    live: u32,
}

impl EnemyCensus {
    #[inline]
    pub fn live(&self) -> u32 {
        self.live
    }

    pub fn record_spawn(&mut self) {
        self.live += 1;
    }

    pub fn record_recycle(&mut self) {
        self.live = self.live.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.live = 0;
    }
}

pub fn plugin(app: &mut App) {
    let tunables = app.world().resource::<Tunables>().clone();
    app.init_resource::<EnemyCensus>().init_resource::<Blueprints>();
    {
        let mut blueprints = app.world_mut().resource_mut::<Blueprints>();
        blueprints.register(BlueprintId::GRUNT, components::grunt_blueprint(&tunables));
        blueprints.register(BlueprintId::MINION, components::minion_blueprint(&tunables));
    }

    app.add_systems(
        FixedUpdate,
        (
            behavior::acquire_pursuit_targets,
            behavior::rescan_swarms,
            behavior::steer_enemies,
        )
            .chain()
            .in_set(SimSet::Movement),
    )
    .add_systems(
        FixedPostUpdate,
        lifecycle::contact_damage.in_set(SimSet::Collisions),
    )
    .add_systems(
        FixedPostUpdate,
        (
            lifecycle::tick_jump_timers,
            lifecycle::recycle_dead_enemies,
            lifecycle::trigger_enemy_deaths,
        )
            .chain()
            .in_set(SimSet::Lifecycle),
    )
    .add_systems(OnExit(GameState::InGame), reset_census);
}

fn reset_census(mut census: ResMut<EnemyCensus>) {
    census.reset();
}

#[cfg(test)]
mod tests;
