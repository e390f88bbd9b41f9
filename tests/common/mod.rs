//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime.
//! - `swarm_arena::game::configure_headless` installs the gameplay plugins.
//! - time advances by exactly one fixed step per `app.update()`.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use swarm_arena::common::tunables::Tunables;

pub fn app_headless() -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists for avian.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        InputPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    swarm_arena::game::configure_headless(&mut app);
    app.finish();
    app.cleanup();

    let hz = app.world().resource::<Tunables>().fixed_hz;
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / hz)));

    // First update enters InGame and runs the OnEnter systems.
    app.update();
    app
}

/// Advance `n` frames, one fixed tick each.
pub fn step(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

pub fn seconds(app: &App, secs: f32) -> usize {
    (secs as f64 * app.world().resource::<Tunables>().fixed_hz).ceil() as usize
}
