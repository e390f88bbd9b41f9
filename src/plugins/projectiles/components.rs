use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::plugins::pool::Blueprint;

/// Pooled projectile lifecycle.
///
/// `PendingReturn` is set by hits and lifetime expiry; the return commit is the
/// only place that hands the entity back to the pool.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Projectile {
    pub damage: i32,
    /// Seconds left before the projectile retires on its own.
    pub lifetime: f32,
}

/// A lingering zone that pulses damage at everything inside `radius`.
///
/// The pulse timer belongs to the effect entity; the strategy that spawned it
/// keeps no reference.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AreaEffect {
    pub radius: f32,
    pub damage: i32,
    /// Seconds between pulses.
    pub interval: f32,
    pub ticks_remaining: u32,
    pub timer: f32,
}

impl AreaEffect {
    /// `ticks` pulses spread evenly over `duration`, the first one interval after spawn.
    pub fn new(radius: f32, damage: i32, duration: f32, ticks: u32) -> Self {
        let ticks = ticks.max(1);
        let interval = duration.max(0.0) / ticks as f32;
        Self { radius, damage, interval, ticks_remaining: ticks, timer: interval }
    }

    /// Advance by `dt`; true when a pulse is due this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.ticks_remaining == 0 {
            return false;
        }
        self.timer -= dt;
        if self.timer > 0.0 {
            return false;
        }
        self.timer += self.interval;
        self.ticks_remaining -= 1;
        true
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.ticks_remaining == 0
    }
}

pub const PROJECTILE_RADIUS: f32 = 4.0;

pub fn active_projectile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerProjectile, [Layer::World, Layer::Enemy])
}

pub fn projectile_blueprint() -> Blueprint {
    Blueprint::new("Projectile", 2.0, |ec| {
        ec.insert((
            Projectile::default(),
            ProjectileState::Inactive,
            Sprite {
                color: Color::srgb(1.0, 0.9, 0.3),
                custom_size: Some(Vec2::splat(PROJECTILE_RADIUS * 2.0)),
                ..default()
            },
            RigidBody::Dynamic,
            Collider::circle(PROJECTILE_RADIUS),
            Sensor,
            LockedAxes::ROTATION_LOCKED,
            active_projectile_layers(),
            CollisionEventsEnabled,
            LinearVelocity::ZERO,
        ));
    })
}

pub fn area_effect_blueprint() -> Blueprint {
    Blueprint::new("AreaEffect", 0.5, |ec| {
        ec.insert((AreaEffect::new(0.0, 0, 0.0, 1), area_sprite(0.0)));
    })
}

pub fn area_sprite(radius: f32) -> Sprite {
    Sprite {
        color: Color::srgba(0.45, 0.9, 0.35, 0.35),
        custom_size: Some(Vec2::splat(radius * 2.0)),
        ..default()
    }
}
