//! Core plugin: shared resources, the simulation clock and the fixed-tick order.
//!
//! Every gameplay system lives in one [`SimSet`]. The sets are chained, so the
//! order below holds for every fixed tick:
//!
//! ```text
//! FixedUpdate      Clock → Movement → Weapons → Effects → Spawning
//! (avian physics step, emits CollisionStart)
//! FixedPostUpdate  Collisions → Damage → Lifecycle
//! ```
//!
//! Movement and AI therefore see last tick's deaths, and damage written by
//! weapons, effects and contacts this tick is applied before any death check.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::{rng::SimRng, state::GameState, tunables::Tunables};

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Clock,
    Movement,
    Weapons,
    Effects,
    Spawning,
    Collisions,
    Damage,
    Lifecycle,
}

/// Fixed ticks elapsed in the current game.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimClock {
    pub tick: u64,
}

pub fn plugin(app: &mut App) {
    let tunables = Tunables::default();
    app.insert_resource(Time::<Fixed>::from_hz(tunables.fixed_hz))
        .insert_resource(SimRng::new(tunables.rng_seed))
        .insert_resource(tunables)
        .init_resource::<SimClock>()
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));

    app.configure_sets(
        FixedUpdate,
        (
            SimSet::Clock,
            SimSet::Movement,
            SimSet::Weapons,
            SimSet::Effects,
            SimSet::Spawning,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
    app.configure_sets(
        FixedPostUpdate,
        (
            SimSet::Collisions.after(CollisionEventSystems),
            SimSet::Damage,
            SimSet::Lifecycle,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(FixedUpdate, advance_clock.in_set(SimSet::Clock))
        .add_systems(OnEnter(GameState::InGame), reset_clock);
}

fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.tick += 1;
}

fn reset_clock(mut clock: ResMut<SimClock>, mut rng: ResMut<SimRng>) {
    clock.tick = 0;
    rng.reseed();
}
