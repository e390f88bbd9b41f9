//! Pool plugin: per-blueprint reuse of short-lived entities.
//!
//! Projectiles, area effects, orbit visuals and enemies are never despawned one
//! by one during play. They are released back into a FIFO queue keyed by their
//! [`BlueprintId`] and handed out again by the next `acquire`.
//!
//! # Invariants
//! - A handle sits in at most one queue, and a queued handle is never active.
//! - Release does not despawn: it hides the entity, moves it to the origin,
//!   zeroes its velocity and clears its collision filters (no archetype moves).
//! - Reactivation re-runs the blueprint's `build`, which re-inserts fresh
//!   gameplay state. Whatever the previous life left behind (timers, health,
//!   lifecycle state) is overwritten, so stale countdowns cannot fire.
//!
//! - A handle belongs to the blueprint that built it. `release` under any other
//!   id is refused with a warning and the handle stays active.
//! - `acquire` returns `None` only for an unregistered blueprint; an empty queue
//!   means "construct", never "fail".
//!
//! # Blueprints
//! A [`Blueprint`] is a name, a z layer and a `build` closure that inserts the
//! per-life gameplay components. Plugins register theirs in [`Blueprints`] at build
//! time (enemies: Grunt, Minion; projectiles: Projectile, AreaEffect; weapons:
//! OrbitBlade). The pool adds the bookkeeping components itself: [`Pooled`] with the
//! blueprint id and [`PoolState`].
//!
//! # Access
//! Systems go through [`PoolAccess`] (commands + pool + blueprints). All structural
//! work is deferred through `Commands`, so a handle acquired this tick is usable
//! after the next sync point, and a release is visible to queries only after it.
//! The pool's own bookkeeping (queues, `is_queued`) updates immediately.
//!
//! Leaving `InGame` despawns the pool root and everything under it; the pool
//! then forgets all handles and counts.
//!
//! ```text
//!  acquire(id) ──▶ queue[id].pop_front() ──▶ reactivate ──▶ active in world
//!        │ (empty)                                               │
//!        └──▶ construct (ChildOf pool root) ─────────────────────┤
//!                                                                ▼
//!  queue[id].push_back() ◀── deactivate ◀──────────────── release(id, e)
//! ```

pub mod blueprint;

use std::collections::VecDeque;

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;

pub use blueprint::{Blueprint, BlueprintId, Blueprints};

/// Which blueprint an instance was built from.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pooled {
    pub blueprint: BlueprintId,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    Active,
    Queued,
}

/// Parent of every constructed instance.
#[derive(Component, Debug, Clone, Copy)]
pub struct PoolRoot;

#[derive(Resource, Default, Debug)]
pub struct EntityPool {
    queues: HashMap<BlueprintId, VecDeque<Entity>>,
    queued: HashSet<Entity>,
    /// Blueprint each known handle belongs to.
    origin: HashMap<Entity, BlueprintId>,
    constructed: HashMap<BlueprintId, u32>,
    root: Option<Entity>,
}

impl EntityPool {
    pub fn set_root(&mut self, root: Option<Entity>) {
        self.root = root;
    }

    pub fn root(&self) -> Option<Entity> {
        self.root
    }

    /// Hand out an instance of `id` placed at `position` with `rotation`.
    ///
    /// Reuses the oldest queued instance if there is one, otherwise builds a new one.
    /// Returns `None` only when `id` has no registered blueprint.
    pub fn acquire(
        &mut self,
        commands: &mut Commands,
        blueprints: &Blueprints,
        id: BlueprintId,
        position: Vec2,
        rotation: Quat,
    ) -> Option<Entity> {
        let Some(blueprint) = blueprints.get(id) else {
            warn!("no blueprint registered for {id:?}");
            return None;
        };
        let transform = Transform::from_translation(position.extend(blueprint.z)).with_rotation(rotation);

        if let Some(e) = self.queues.get_mut(&id).and_then(VecDeque::pop_front) {
            self.queued.remove(&e);
            let mut ec = commands.entity(e);
            ec.insert((PoolState::Active, transform, Visibility::Inherited));
            blueprint.build(&mut ec);
            return Some(e);
        }

        Some(self.construct(commands, blueprint, id, transform, PoolState::Active))
    }

    /// Return `entity` to the queue of `id`. Releasing an already queued handle is ignored.
    ///
    /// A handle built from another blueprint is refused: the next `acquire` of `id`
    /// would run a foreign `build` over its leftover components. Handles the pool has
    /// never seen are adopted under `id`.
    pub fn release(&mut self, commands: &mut Commands, id: BlueprintId, entity: Entity) -> bool {
        match self.origin.get(&entity) {
            Some(&owner) if owner != id => {
                warn!("refusing to release {entity} as {id:?}: it was built as {owner:?}");
                return false;
            }
            _ => {}
        }
        if !self.queued.insert(entity) {
            return false;
        }
        self.origin.insert(entity, id);
        self.queues.entry(id).or_default().push_back(entity);

        commands.entity(entity).try_insert((
            PoolState::Queued,
            Transform::IDENTITY,
            Visibility::Hidden,
        ));
        commands.queue(move |world: &mut World| {
            let Ok(mut e) = world.get_entity_mut(entity) else {
                return;
            };
            if let Some(mut vel) = e.get_mut::<LinearVelocity>() {
                vel.0 = Vec2::ZERO;
            }
            if let Some(mut layers) = e.get_mut::<CollisionLayers>() {
                layers.filters = LayerMask::NONE;
            }
        });
        true
    }

    /// Build `count` queued instances of `id` ahead of time.
    pub fn preload(&mut self, commands: &mut Commands, blueprints: &Blueprints, id: BlueprintId, count: usize) {
        let Some(blueprint) = blueprints.get(id) else {
            warn!("cannot preload {id:?}: no blueprint registered");
            return;
        };
        for _ in 0..count {
            let e = self.construct(commands, blueprint, id, Transform::IDENTITY, PoolState::Queued);
            commands.entity(e).insert(Visibility::Hidden);
            self.queued.insert(e);
            self.queues.entry(id).or_default().push_back(e);
        }
        debug!("preloaded {count} x {id:?}");
    }

    /// Despawn every queued instance of `id`. Active instances are untouched.
    pub fn clear_pool(&mut self, commands: &mut Commands, id: BlueprintId) {
        let Some(queue) = self.queues.remove(&id) else {
            return;
        };
        for e in queue {
            self.queued.remove(&e);
            self.origin.remove(&e);
            commands.entity(e).try_despawn();
        }
    }

    pub fn clear_all(&mut self, commands: &mut Commands) {
        for (_, queue) in self.queues.drain() {
            for e in queue {
                self.origin.remove(&e);
                commands.entity(e).try_despawn();
            }
        }
        self.queued.clear();
    }

    /// Drop all bookkeeping without touching the world (the entities are already gone).
    pub fn forget_all(&mut self) {
        self.queues.clear();
        self.queued.clear();
        self.origin.clear();
        self.constructed.clear();
        self.root = None;
    }

    pub fn queued_count(&self, id: BlueprintId) -> usize {
        self.queues.get(&id).map_or(0, VecDeque::len)
    }

    pub fn constructed_count(&self, id: BlueprintId) -> u32 {
        self.constructed.get(&id).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_queued(&self, entity: Entity) -> bool {
        self.queued.contains(&entity)
    }

    fn construct(
        &mut self,
        commands: &mut Commands,
        blueprint: &Blueprint,
        id: BlueprintId,
        transform: Transform,
        state: PoolState,
    ) -> Entity {
        let mut ec = commands.spawn((
            Name::new(format!("{}(Pooled)", blueprint.name)),
            Pooled { blueprint: id },
            state,
            transform,
            Visibility::Inherited,
        ));
        blueprint.build(&mut ec);
        if let Some(root) = self.root {
            ec.insert(ChildOf(root));
        }
        let e = ec.id();
        self.origin.insert(e, id);
        *self.constructed.entry(id).or_default() += 1;
        debug!("constructed {id:?} instance {e}");
        e
    }
}

/// Everything a system needs to acquire or release pooled entities.
#[derive(SystemParam)]
pub struct PoolAccess<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub pool: ResMut<'w, EntityPool>,
    pub blueprints: Res<'w, Blueprints>,
}

impl PoolAccess<'_, '_> {
    pub fn acquire(&mut self, id: BlueprintId, position: Vec2, rotation: Quat) -> Option<Entity> {
        self.pool.acquire(&mut self.commands, &self.blueprints, id, position, rotation)
    }

    pub fn release(&mut self, id: BlueprintId, entity: Entity) -> bool {
        self.pool.release(&mut self.commands, id, entity)
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<EntityPool>()
        .init_resource::<Blueprints>()
        .add_systems(OnEnter(GameState::InGame), spawn_pool_root)
        .add_systems(OnExit(GameState::InGame), forget_pooled);
}

/// The root is state-scoped, so leaving the game despawns every instance with it.
fn spawn_pool_root(mut commands: Commands, mut pool: ResMut<EntityPool>) {
    pool.forget_all();
    let root = commands
        .spawn((
            Name::new("EntityPool"),
            PoolRoot,
            Transform::IDENTITY,
            Visibility::Inherited,
            DespawnOnExit(GameState::InGame),
        ))
        .id();
    pool.set_root(Some(root));
}

fn forget_pooled(mut pool: ResMut<EntityPool>) {
    pool.forget_all();
}
