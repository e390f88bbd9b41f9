//! Spawner plugin: capacity-bounded enemy spawning around the player.
//!
//! After an initial delay the spawner makes one attempt every `spawn_interval`
//! seconds. An attempt spawns one enemy of a uniformly chosen blueprint when the
//! live count is below `max_enemies`; otherwise the slot is skipped. The live
//! count comes from [`EnemyCensus`], not from a world scan.
//!
//! The spawner starts on `GameStart` and stops on `GameOver`.

pub mod placement;

use anyhow::Context;
use bevy::prelude::*;
use rand::Rng;

use crate::common::{rng::SimRng, tunables::Tunables};
use crate::plugins::core::SimSet;
use crate::plugins::enemies::EnemyCensus;
use crate::plugins::events::{EventName, GameEvent, PublishExt, SubscribeExt};
use crate::plugins::player::Player;
use crate::plugins::pool::{BlueprintId, PoolAccess};

/// Lengths in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerConfig {
    pub blueprints: Vec<BlueprintId>,
    pub initial_delay: f32,
    pub spawn_interval: f32,
    pub max_enemies: u32,
    pub spawn_radius: f32,
    pub min_spawn_distance: f32,
    pub use_map_bounds: bool,
    pub map_min: Vec2,
    pub map_max: Vec2,
}

impl SpawnerConfig {
    pub fn new(t: &Tunables) -> Self {
        Self {
            blueprints: vec![BlueprintId::GRUNT, BlueprintId::MINION],
            initial_delay: 2.0,
            spawn_interval: 1.5,
            max_enemies: 30,
            spawn_radius: t.meters(50.0),
            min_spawn_distance: t.meters(10.0),
            use_map_bounds: false,
            map_min: Vec2::splat(t.meters(-100.0)),
            map_max: Vec2::splat(t.meters(100.0)),
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct EnemySpawner {
    pub config: SpawnerConfig,
    running: bool,
    /// Seconds until the next attempt.
    next_attempt: f32,
    total_spawned: u32,
    pending_single: u32,
}

impl EnemySpawner {
    /// Created stopped; `start` arms the initial delay.
    pub fn new(config: SpawnerConfig) -> Self {
        Self { config, running: false, next_attempt: 0.0, total_spawned: 0, pending_single: 0 }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn total_spawned(&self) -> u32 {
        self.total_spawned
    }

    pub fn can_spawn(&self, live: u32) -> bool {
        live < self.config.max_enemies
    }

    /// No-op while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.next_attempt = self.config.initial_delay;
        debug!("spawner started");
    }

    pub fn stop(&mut self) {
        if self.running {
            debug!("spawner stopped after {} spawns", self.total_spawned);
        }
        self.running = false;
    }

    /// Fresh run: counters cleared, loop armed.
    pub fn restart(&mut self) {
        self.running = false;
        self.total_spawned = 0;
        self.pending_single = 0;
        self.start();
    }

    pub fn set_spawn_interval(&mut self, interval: f32) {
        self.config.spawn_interval = interval.max(0.1);
    }

    pub fn set_max_enemies(&mut self, count: u32) {
        self.config.max_enemies = count.max(1);
    }

    /// Sets the bounds and turns them on.
    pub fn set_map_bounds(&mut self, min: Vec2, max: Vec2) {
        self.config.map_min = min;
        self.config.map_max = max;
        self.config.use_map_bounds = true;
    }

    pub fn enable_map_bounds(&mut self, enabled: bool) {
        self.config.use_map_bounds = enabled;
    }

    /// Ask for one extra attempt on the next spawning pass, outside the interval.
    /// The capacity check still applies.
    pub fn spawn_single(&mut self) {
        self.pending_single += 1;
    }

    /// Advance the loop; returns how many attempts are due this tick.
    pub fn tick(&mut self, dt: f32) -> u32 {
        let mut attempts = std::mem::take(&mut self.pending_single);
        if self.running {
            self.next_attempt -= dt;
            if self.next_attempt <= 0.0 {
                self.next_attempt += self.config.spawn_interval;
                attempts += 1;
            }
        }
        attempts
    }
}

pub fn plugin(app: &mut App) {
    let config = SpawnerConfig::new(app.world().resource::<Tunables>());
    app.insert_resource(EnemySpawner::new(config))
        .add_systems(FixedUpdate, run_spawner.in_set(SimSet::Spawning))
        .subscribe(EventName::GameStart, on_game_start)
        .subscribe(EventName::GameOver, on_game_over);
}

fn on_game_start(world: &mut World, _: &GameEvent) -> anyhow::Result<()> {
    world
        .get_resource_mut::<EnemySpawner>()
        .context("EnemySpawner resource missing")?
        .restart();
    if let Some(mut census) = world.get_resource_mut::<EnemyCensus>() {
        census.reset();
    }
    Ok(())
}

fn on_game_over(world: &mut World, _: &GameEvent) -> anyhow::Result<()> {
    world
        .get_resource_mut::<EnemySpawner>()
        .context("EnemySpawner resource missing")?
        .stop();
    Ok(())
}

pub fn run_spawner(
    time: Res<Time<Fixed>>,
    mut spawner: ResMut<EnemySpawner>,
    mut census: ResMut<EnemyCensus>,
    mut rng: ResMut<SimRng>,
    mut pool: PoolAccess,
    q_player: Query<&Transform, With<Player>>,
) {
    let attempts = spawner.tick(time.delta_secs());

    for _ in 0..attempts {
        if !spawner.can_spawn(census.live()) {
            continue;
        }
        if spawner.config.blueprints.is_empty() {
            continue;
        }
        let Ok(player_tf) = q_player.single() else {
            continue;
        };

        let player = player_tf.translation.truncate();
        let index = rng.rng.gen_range(0..spawner.config.blueprints.len());
        let blueprint = spawner.config.blueprints[index];
        let position = placement::sample_spawn_position(&mut rng.rng, player, &spawner.config);

        if pool.acquire(blueprint, position, Quat::IDENTITY).is_none() {
            continue;
        }
        census.record_spawn();
        spawner.total_spawned += 1;
        pool.commands.publish(GameEvent::EnemySpawned {
            enemy_name: blueprint.0.to_string(),
            total_spawned: spawner.total_spawned,
        });
    }
}
