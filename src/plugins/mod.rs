//! Feature plugins.

use bevy::prelude::*;

pub mod combat;
pub mod core;
pub mod enemies;
pub mod events;
pub mod flow;
pub mod hud;
pub mod physics;
pub mod player;
pub mod pool;
pub mod projectiles;
pub mod spawner;
pub mod weapons;
pub mod world;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    events::plugin(app);
    physics::plugin(app);
    pool::plugin(app);
    combat::plugin(app);
    world::plugin(app);
    player::plugin(app);
    weapons::plugin(app);
    projectiles::plugin(app);
    enemies::plugin(app);
    spawner::plugin(app);
    flow::plugin(app);
    hud::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
