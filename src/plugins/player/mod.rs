//! Player plugin.
//!
//! Pipeline:
//! - Update: sample keyboard input into the `PlayerInput` resource
//! - FixedUpdate (`SimSet::Movement`): turn toward the move direction, set velocity
//! - FixedPostUpdate (`SimSet::Damage`): apply damage requests aimed at the player
//! - FixedPostUpdate (`SimSet::Lifecycle`): count down the invulnerability window
//!
//! Score and experience live in the [`PlayerProgression`] resource and are fed
//! by event listeners, not by direct calls from the enemy code.

pub mod progression;
pub mod vitality;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::combat::Damageable;
use crate::plugins::core::SimSet;
use crate::plugins::events::{EventName, SubscribeExt};

pub use progression::PlayerProgression;
pub use vitality::PlayerVitality;

#[derive(Component)]
pub struct Player;

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>()
        .init_resource::<PlayerProgression>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input)
        .add_systems(FixedUpdate, apply_movement.in_set(SimSet::Movement))
        .add_systems(
            FixedPostUpdate,
            vitality::apply_player_damage.in_set(SimSet::Damage),
        )
        .add_systems(
            FixedPostUpdate,
            vitality::tick_invulnerability.in_set(SimSet::Lifecycle),
        )
        .subscribe(EventName::EnemyKilled, progression::on_enemy_killed)
        .subscribe(EventName::GameStart, progression::on_game_reset)
        .subscribe(EventName::GameRestart, progression::on_game_reset);
}

pub fn spawn(mut commands: Commands) {
    let layers = CollisionLayers::new(Layer::Player, [Layer::World, Layer::Enemy]);

    commands.spawn((
        Name::new("Player"),
        Player,
        PlayerVitality::default(),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(26.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        RigidBody::Kinematic,
        Collider::circle(13.0),
        layers,
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    ));
}

fn gather_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = axis.normalize_or_zero();
}

/// Speed scales with the progression move-speed multiplier. The player turns
/// toward where it walks, so forward-facing weapons follow the movement.
fn apply_movement(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    progression: Res<PlayerProgression>,
    mut q_player: Query<(&mut LinearVelocity, &mut Transform, &PlayerVitality), With<Player>>,
) {
    let Ok((mut vel, mut tf, vitality)) = q_player.single_mut() else {
        return;
    };
    if vitality.is_dead() {
        vel.0 = Vec2::ZERO;
        return;
    }

    vel.0 = input.move_axis * tunables.player_speed * progression.move_speed_multiplier();
    if input.move_axis != Vec2::ZERO {
        let target = Quat::from_rotation_z(Vec2::Y.angle_to(input.move_axis));
        let max_turn = (tunables.player_rotate_speed * time.delta_secs()).to_radians();
        tf.rotation = tf.rotation.rotate_towards(target, max_turn);
    }
}
