//! Orbit anchors: per-weapon revolving attack points.
//!
//! The angle belongs to the weapon entity, not to the shared strategy, so two
//! weapons using the same orbiting config revolve independently.
//!
//! By default the anchor moves every fixed tick ([`OrbitAdvance::Continuous`]), so
//! the blade circles at `speed` degrees per second whatever the attack rate is.
//! [`OrbitAdvance::PerAttack`] instead moves it only inside `fire_weapons`, once per
//! firing, which makes a slow weapon's blade creep around the owner.

use bevy::prelude::*;

use crate::plugins::pool::{Blueprint, BlueprintId, PoolAccess};

use super::scheduler::{WeaponOwner, WeaponScheduler};
use super::strategy::OrbitAdvance;

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct OrbitAnchor {
    /// Degrees in [0, 360).
    pub angle: f32,
    /// Pooled visual following the anchor.
    pub visual: Option<(BlueprintId, Entity)>,
}

impl OrbitAnchor {
    pub fn position(&self, center: Vec2, radius: f32) -> Vec2 {
        center + Vec2::from_angle(self.angle.to_radians()) * radius
    }

    pub fn advance(&mut self, degrees_per_second: f32, dt: f32) {
        self.angle = (self.angle + degrees_per_second * dt).rem_euclid(360.0);
    }
}

/// Marker for the orbit visual template.
#[derive(Component, Debug, Clone, Copy)]
pub struct OrbitVisual;

pub fn orbit_blade_blueprint() -> Blueprint {
    Blueprint::new("OrbitBlade", 2.5, |ec| {
        ec.insert((
            OrbitVisual,
            Sprite {
                color: Color::srgb(0.85, 0.9, 1.0),
                custom_size: Some(Vec2::new(10.0, 22.0)),
                ..default()
            },
        ));
    })
}

/// Revolve anchors of orbiting weapons and keep their visuals on the anchor.
///
/// Visuals are acquired lazily. A weapon whose strategy stopped orbiting gives its
/// visual back.
pub fn advance_orbit_anchors(
    time: Res<Time<Fixed>>,
    mut q_weapons: Query<(&WeaponScheduler, &WeaponOwner, &mut OrbitAnchor)>,
    q_owners: Query<&Transform, Without<OrbitVisual>>,
    mut q_visuals: Query<&mut Transform, With<OrbitVisual>>,
    mut pool: PoolAccess,
) {
    let dt = time.delta_secs();

    for (weapon, owner, mut anchor) in &mut q_weapons {
        let Some(params) = weapon.strategy().and_then(|s| s.orbit()) else {
            if let Some((id, visual)) = anchor.visual.take() {
                pool.release(id, visual);
            }
            continue;
        };
        let Ok(owner_tf) = q_owners.get(owner.0) else {
            continue;
        };

        if params.advance == OrbitAdvance::Continuous {
            anchor.advance(params.speed, dt);
        }

        let center = owner_tf.translation.truncate();
        let at = anchor.position(center, params.radius);
        let facing = Quat::from_rotation_z((at - center).to_angle());

        match (anchor.visual, params.visual) {
            (Some((_, visual)), _) => {
                if let Ok(mut tf) = q_visuals.get_mut(visual) {
                    tf.translation = at.extend(tf.translation.z);
                    tf.rotation = facing;
                }
            }
            (None, Some(id)) => {
                if let Some(visual) = pool.acquire(id, at, facing) {
                    anchor.visual = Some((id, visual));
                }
            }
            (None, None) => {}
        }
    }
}
