//! World plugin: arena walls, floor, and the spawn area inside them.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::spawner::EnemySpawner;

/// Half extent of the square arena, meters.
pub const ARENA_HALF_METERS: f32 = 100.0;
const WALL_THICKNESS: f32 = 30.0;
/// Enemies are never placed closer than this to a wall, pixels.
const SPAWN_MARGIN: f32 = 40.0;
const TILE: f32 = 256.0;

pub fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(GameState::InGame),
        (spawn_arena, spawn_floor, bound_spawner),
    );
}

fn arena_half(t: &Tunables) -> f32 {
    t.meters(ARENA_HALF_METERS)
}

fn spawn_arena(mut commands: Commands, tunables: Res<Tunables>) {
    let half = arena_half(&tunables);
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let wall_layers = CollisionLayers::new(
        Layer::World,
        [Layer::Player, Layer::Enemy, Layer::PlayerProjectile],
    );

    let span = half * 2.0 + WALL_THICKNESS * 2.0;
    let offset = half + WALL_THICKNESS * 0.5;
    let walls = [
        ("WallTop", Vec2::new(0.0, offset), Vec2::new(span, WALL_THICKNESS)),
        ("WallBottom", Vec2::new(0.0, -offset), Vec2::new(span, WALL_THICKNESS)),
        ("WallLeft", Vec2::new(-offset, 0.0), Vec2::new(WALL_THICKNESS, half * 2.0)),
        ("WallRight", Vec2::new(offset, 0.0), Vec2::new(WALL_THICKNESS, half * 2.0)),
    ];

    for (name, pos, size) in walls {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Checkerboard of solid-color sprites; the project ships no assets.
fn spawn_floor(mut commands: Commands, tunables: Res<Tunables>) {
    let n = (arena_half(&tunables) / TILE).ceil() as i32;
    (-n..=n)
        .flat_map(|y| (-n..=n).map(move |x| (x, y)))
        .for_each(|(x, y)| {
            let color = if (x + y) % 2 == 0 {
                Color::srgb(0.14, 0.14, 0.16)
            } else {
                Color::srgb(0.12, 0.12, 0.14)
            };

            commands.spawn((
                Sprite::from_color(color, Vec2::splat(TILE)),
                Transform::from_xyz(x as f32 * TILE, y as f32 * TILE, -10.0),
                DespawnOnExit(GameState::InGame),
            ));
        });
}

/// Keep spawn positions inside the walls.
fn bound_spawner(tunables: Res<Tunables>, spawner: Option<ResMut<EnemySpawner>>) {
    let Some(mut spawner) = spawner else {
        return;
    };
    let inner = arena_half(&tunables) - SPAWN_MARGIN;
    spawner.set_map_bounds(Vec2::splat(-inner), Vec2::splat(inner));
}
