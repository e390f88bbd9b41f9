//! Combat plugin: the uniform damage interface.
//!
//! Anything that can be hurt implements [`Damageable`]. Producers (strategies,
//! projectiles, area pulses, contact hits) never touch health directly; they write a
//! [`DamageRequest`] and the owning module applies it in `SimSet::Damage`.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::core::SimSet;

/// What happened to a target after one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead, invulnerable, or a non-positive amount.
    Ignored,
    Damaged,
    /// This hit brought health to zero.
    Killed,
}

pub trait Damageable {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome;
    fn is_dead(&self) -> bool;
}

/// Request to hurt `target` by `amount`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Valid target for player weapons.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hostile;

/// Plain hit points. Once at zero, nothing changes them except a reset.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        let max = max.max(1.0);
        Self { current: max, max }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// New maximum (at least 1); current health is clamped down to it.
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(1.0);
        self.current = self.current.min(self.max);
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.max
    }
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }
        self.current = (self.current - amount).max(0.0);
        if self.is_dead() {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged
        }
    }

    #[inline]
    fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<DamageRequest>().add_systems(
        FixedPostUpdate,
        apply_health_damage
            .in_set(SimSet::Damage)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Apply requests aimed at entities with plain [`Health`].
///
/// Death transitions are not made here; lifecycle systems read `Health` afterwards.
pub fn apply_health_damage(mut requests: MessageReader<DamageRequest>, mut q: Query<&mut Health>) {
    for req in requests.read() {
        if let Ok(mut health) = q.get_mut(req.target) {
            health.take_damage(req.amount);
        }
    }
}
