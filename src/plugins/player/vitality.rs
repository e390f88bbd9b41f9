//! Player health with a post-hit invulnerability window.

use bevy::prelude::*;

use crate::plugins::combat::{DamageOutcome, DamageRequest, Damageable};
use crate::plugins::events::{GameEvent, PublishExt};

use super::Player;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerVitality {
    current: f32,
    max: f32,
    invulnerable_for: f32,
    invulnerability: f32,
}

impl Default for PlayerVitality {
    fn default() -> Self {
        Self::new(100.0, 2.0)
    }
}

impl PlayerVitality {
    pub fn new(max: f32, invulnerability: f32) -> Self {
        let max = max.max(1.0);
        Self { current: max, max, invulnerable_for: 0.0, invulnerability: invulnerability.max(0.0) }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    pub fn health_percentage(&self) -> f32 {
        self.current / self.max
    }

    /// Returns the heal event, or `None` when nothing was healed.
    pub fn heal(&mut self, amount: f32) -> Option<GameEvent> {
        if self.is_dead() {
            return None;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        let healed = self.current - before;
        (healed > 0.0).then_some(GameEvent::PlayerHealed { amount: healed, current_health: self.current })
    }

    pub fn set_max_health(&mut self, max: f32) {
        self.max = max.max(1.0);
        self.current = self.current.min(self.max);
    }

    /// Clamped to [0, max]. Landing on zero reports a death.
    pub fn set_health(&mut self, health: f32) -> Option<GameEvent> {
        self.current = health.clamp(0.0, self.max);
        self.is_dead().then_some(GameEvent::PlayerDied)
    }

    pub fn reset_health(&mut self) {
        self.current = self.max;
        self.invulnerable_for = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        self.invulnerable_for = (self.invulnerable_for - dt).max(0.0);
    }
}

impl Damageable for PlayerVitality {
    /// Ignored while invulnerable or dead. Non-lethal hits open the invulnerability window.
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_invulnerable() || self.is_dead() || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }
        self.current = (self.current - amount).max(0.0);
        if self.is_dead() {
            return DamageOutcome::Killed;
        }
        self.invulnerable_for = self.invulnerability;
        DamageOutcome::Damaged
    }

    #[inline]
    fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Apply requests aimed at the player and report what happened on the bus.
pub fn apply_player_damage(
    mut commands: Commands,
    mut requests: MessageReader<DamageRequest>,
    mut q_player: Query<&mut PlayerVitality, With<Player>>,
) {
    for req in requests.read() {
        let Ok(mut vitality) = q_player.get_mut(req.target) else {
            continue;
        };
        let outcome = vitality.take_damage(req.amount);
        if outcome == DamageOutcome::Ignored {
            continue;
        }
        commands.publish(GameEvent::PlayerDamaged { amount: req.amount, current_health: vitality.current() });
        if outcome == DamageOutcome::Killed {
            debug!("player died");
            commands.publish(GameEvent::PlayerDied);
        }
    }
}

pub fn tick_invulnerability(time: Res<Time<Fixed>>, mut q: Query<&mut PlayerVitality>) {
    let dt = time.delta_secs();
    for mut vitality in &mut q {
        if vitality.is_invulnerable() {
            vitality.tick(dt);
        }
    }
}
