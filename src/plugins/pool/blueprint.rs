//! Blueprints: how a pooled instance is built and reset.

use std::fmt;
use std::sync::Arc;

use bevy::ecs::system::EntityCommands;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlueprintId(pub &'static str);

impl BlueprintId {
    pub const GRUNT: Self = Self("Grunt");
    pub const MINION: Self = Self("Minion");
    pub const PROJECTILE: Self = Self("Projectile");
    pub const AREA_EFFECT: Self = Self("AreaEffect");
    pub const ORBIT_BLADE: Self = Self("OrbitBlade");
}

impl fmt::Debug for BlueprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blueprint({})", self.0)
    }
}

type BuildFn = Arc<dyn Fn(&mut EntityCommands) + Send + Sync>;

/// Immutable template for pooled instances.
///
/// `build` inserts the full gameplay component set in its initial state. It runs
/// on construction and again on every reactivation.
#[derive(Clone)]
pub struct Blueprint {
    pub name: &'static str,
    /// Draw depth of instances.
    pub z: f32,
    build: BuildFn,
}

impl Blueprint {
    pub fn new(name: &'static str, z: f32, build: impl Fn(&mut EntityCommands) + Send + Sync + 'static) -> Self {
        Self { name, z, build: Arc::new(build) }
    }

    #[inline]
    pub fn build(&self, ec: &mut EntityCommands) {
        (self.build)(ec);
    }
}

#[derive(Resource, Default, Clone)]
pub struct Blueprints {
    by_id: HashMap<BlueprintId, Blueprint>,
}

impl Blueprints {
    pub fn register(&mut self, id: BlueprintId, blueprint: Blueprint) {
        if self.by_id.insert(id, blueprint).is_some() {
            debug!("replaced blueprint {id:?}");
        }
    }

    pub fn get(&self, id: BlueprintId) -> Option<&Blueprint> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: BlueprintId) -> bool {
        self.by_id.contains_key(&id)
    }
}
