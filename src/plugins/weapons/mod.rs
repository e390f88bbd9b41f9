//! Weapons plugin: strategies, per-weapon scheduling and the player's roster.
//!
//! # Pieces
//! - [`StrategyConfig`] is shared, immutable data (`Arc`): name, base damage and
//!   rate, level curves, and one [`AttackStrategy`] variant. `resolve` is a pure
//!   function from an attack context to hits and spawn orders; it never touches the
//!   world.
//! - [`WeaponScheduler`] is the per-weapon state: level, cooldown, auto-attack,
//!   interval override, a pending forced attack.
//! - [`OrbitAnchor`] holds the per-weapon orbit angle and its pooled visual.
//! - [`WeaponRoster`] lists the player's weapon entities in equip order;
//!   [`Armory`] is the system param that edits it and announces every change on the
//!   bus (`WeaponEquipped`, `WeaponUpgraded`, `WeaponRemoved`, keyed by the weapon
//!   entity).
//!
//! # Data flow
//! ```text
//! FixedUpdate / SimSet::Weapons
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │ resolve_weapon_owners  ChildOf parent, else the Player (once per weapon) │
//! │ advance_orbit_anchors  angle += speed * dt (continuous orbits),          │
//! │                        visuals acquired lazily and kept on the anchor    │
//! │ fire_weapons           cooldown tick → StrategyConfig::resolve           │
//! │     ├─ DamageRequest   instant hits: sector, orbit                       │
//! │     └─ SpawnPayload    projectiles, area effects                         │
//! └──────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   projectiles plugin: allocate_payloads (same set, after fire_weapons)
//! ```
//!
//! # Invariants
//! - Level is always ≥ 1; damage and rate come from the curves at that level, so
//!   `set_level`, `upgrade` and `evolve` never need to recompute anything else.
//! - A weapon without a strategy never fires and never panics.
//! - Targets are sampled once per tick, lazily, and only live hostiles that are
//!   not sitting in a pool queue are considered.
//! - Weapon entities are children of the player and state-scoped through it, so
//!   leaving `InGame` drops them; the roster forgets its handles on the same exit.

pub mod curve;
pub mod orbit;
pub mod roster;
pub mod scheduler;
pub mod strategy;

use std::sync::Arc;

use bevy::prelude::*;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::core::SimSet;
use crate::plugins::player;
use crate::plugins::pool::{BlueprintId, Blueprints};

pub use curve::LevelCurve;
pub use orbit::OrbitAnchor;
pub use roster::{Armory, WeaponRoster};
pub use scheduler::{SpawnPayload, WeaponOwner, WeaponScheduler};
pub use strategy::{AttackStrategy, OrbitAdvance, StrategyConfig};

/// Shared strategy configs available to the game.
#[derive(Resource, Debug, Clone)]
pub struct Arsenal {
    pub sector: Arc<StrategyConfig>,
    pub orbiting: Arc<StrategyConfig>,
    pub projectile: Arc<StrategyConfig>,
    pub persistent_area: Arc<StrategyConfig>,
    /// Equipped when a game starts.
    pub starting: Arc<StrategyConfig>,
}

impl Arsenal {
    pub fn new(t: &Tunables) -> Self {
        let mut homing = StrategyConfig::projectile(t);
        homing.name = "Homing Blaster".into();
        if let AttackStrategy::Projectile(p) = &mut homing.kind {
            p.auto_aim = true;
        }
        Self {
            sector: Arc::new(StrategyConfig::sector(t)),
            orbiting: Arc::new(StrategyConfig::orbiting(t)),
            projectile: Arc::new(StrategyConfig::projectile(t)),
            persistent_area: Arc::new(StrategyConfig::persistent_area(t)),
            starting: Arc::new(homing),
        }
    }
}

pub fn plugin(app: &mut App) {
    let arsenal = Arsenal::new(app.world().resource::<Tunables>());
    app.insert_resource(arsenal)
        .init_resource::<WeaponRoster>()
        .add_message::<SpawnPayload>();

    app.init_resource::<Blueprints>();
    app.world_mut()
        .resource_mut::<Blueprints>()
        .register(BlueprintId::ORBIT_BLADE, orbit::orbit_blade_blueprint());

    app.add_systems(
        FixedUpdate,
        (
            scheduler::resolve_weapon_owners,
            orbit::advance_orbit_anchors,
            scheduler::fire_weapons,
        )
            .chain()
            .in_set(SimSet::Weapons),
    )
    .add_systems(
        OnEnter(GameState::InGame),
        equip_starting_weapon.after(player::spawn),
    )
    .add_systems(OnExit(GameState::InGame), forget_roster);
}

fn equip_starting_weapon(arsenal: Res<Arsenal>, mut armory: Armory) {
    armory.add_weapon(Some(arsenal.starting.clone()), 1);
}

/// Weapons are children of the player and leave with it.
fn forget_roster(mut roster: ResMut<WeaponRoster>) {
    roster.forget_all();
}
