//! Game flow: start, game over and restart, driven through the event bus.
//!
//! ```text
//! OnEnter(InGame) ──▶ GameStart
//! PlayerDied ──listener──▶ GameOver ──▶ NextState(GameOver)
//! restart_game (R in GameOver) ──▶ GameRestart ──▶ NextState(InGame) ──▶ GameStart
//! ```
//!
//! Everything spawned for a run is state-scoped, so leaving `InGame` clears the
//! player, its weapons, enemies and pooled instances. Re-entering builds them fresh.

use anyhow::Context;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::events::{EventBus, EventName, GameEvent, PublishExt, SubscribeExt};

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), publish_game_start)
        .add_systems(Update, restart_on_key.run_if(in_state(GameState::GameOver)))
        .subscribe(EventName::PlayerDied, on_player_died);
}

pub fn publish_game_start(mut commands: Commands) {
    commands.publish(GameEvent::GameStart);
}

fn on_player_died(world: &mut World, _: &GameEvent) -> anyhow::Result<()> {
    info!("game over");
    EventBus::publish(world, GameEvent::GameOver);
    world
        .get_resource_mut::<NextState<GameState>>()
        .context("GameState is not initialized")?
        .set(GameState::GameOver);
    Ok(())
}

/// Announce the restart and queue a fresh run.
pub fn restart_game(world: &mut World) -> anyhow::Result<()> {
    info!("game restart");
    EventBus::publish(world, GameEvent::GameRestart);
    world
        .get_resource_mut::<NextState<GameState>>()
        .context("GameState is not initialized")?
        .set(GameState::InGame);
    Ok(())
}

fn restart_on_key(keys: Res<ButtonInput<KeyCode>>, mut commands: Commands) {
    if keys.just_pressed(KeyCode::KeyR) {
        commands.queue(|world: &mut World| {
            if let Err(error) = restart_game(world) {
                warn!("restart failed: {error:#}");
            }
        });
    }
}

#[cfg(test)]
mod tests;
