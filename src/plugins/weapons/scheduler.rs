//! Per-weapon cooldown scheduling and attack dispatch.

use std::sync::Arc;

use bevy::prelude::*;

use crate::plugins::combat::{Damageable, DamageRequest, Health, Hostile};
use crate::plugins::player::Player;
use crate::plugins::pool::PoolState;

use super::orbit::OrbitAnchor;
use super::strategy::{AttackContext, OrbitAdvance, Pose, SpawnOrder, StrategyConfig, TargetSample};

/// Interval used when no strategy is set.
const FALLBACK_INTERVAL: f32 = 1.0;

/// One weapon: a shared strategy, a level and a cooldown.
#[derive(Component, Debug, Clone)]
pub struct WeaponScheduler {
    strategy: Option<Arc<StrategyConfig>>,
    level: u32,
    cooldown: f32,
    auto_attack: bool,
    interval_override: f32,
    forced: bool,
}

impl WeaponScheduler {
    /// The first attack comes one full interval after creation.
    pub fn new(strategy: Option<Arc<StrategyConfig>>, level: u32) -> Self {
        let mut weapon = Self {
            strategy,
            level: level.max(1),
            cooldown: 0.0,
            auto_attack: true,
            interval_override: 0.0,
            forced: false,
        };
        weapon.cooldown = weapon.effective_interval();
        weapon
    }

    pub fn strategy(&self) -> Option<&Arc<StrategyConfig>> {
        self.strategy.as_ref()
    }

    pub fn name(&self) -> &str {
        self.strategy.as_deref().map_or("Unarmed", |s| s.name.as_str())
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        debug!("{} upgraded to level {}", self.name(), self.level);
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    pub fn set_strategy(&mut self, strategy: Option<Arc<StrategyConfig>>) {
        self.strategy = strategy;
        debug!("weapon strategy changed to {}", self.name());
    }

    /// Positive values override the strategy's interval; zero restores it.
    pub fn set_attack_interval(&mut self, interval: f32) {
        self.interval_override = interval;
    }

    pub fn set_auto_attack(&mut self, enabled: bool) {
        self.auto_attack = enabled;
    }

    #[inline]
    pub fn auto_attack(&self) -> bool {
        self.auto_attack
    }

    /// Attack on the next weapons pass, whatever the cooldown.
    pub fn force_attack(&mut self) {
        self.forced = true;
    }

    pub fn effective_interval(&self) -> f32 {
        if self.interval_override > 0.0 {
            return self.interval_override;
        }
        self.strategy
            .as_deref()
            .map_or(FALLBACK_INTERVAL, |s| s.attack_rate(self.level))
    }

    #[inline]
    pub fn remaining_cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn current_damage(&self) -> i32 {
        self.strategy.as_deref().map_or(0, |s| s.base_damage(self.level))
    }

    /// Advance the cooldown by `dt`. Returns true when the weapon attacks now.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.strategy.is_none() {
            return false;
        }
        if self.forced {
            self.forced = false;
            self.cooldown = self.effective_interval();
            return true;
        }
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown <= 0.0 && self.auto_attack {
            self.cooldown = self.effective_interval();
            return true;
        }
        false
    }
}

/// The entity a weapon attacks from. Resolved once.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponOwner(pub Entity);

/// Something a strategy wants in the world (projectile, area effect).
#[derive(Message, Debug, Clone, PartialEq)]
pub struct SpawnPayload(pub SpawnOrder);

/// Prefer the parent; otherwise the player. Unresolved weapons retry next tick.
pub fn resolve_weapon_owners(
    mut commands: Commands,
    q_weapons: Query<(Entity, Option<&ChildOf>), (With<WeaponScheduler>, Without<WeaponOwner>)>,
    q_player: Query<Entity, With<Player>>,
) {
    for (e, parent) in &q_weapons {
        let owner = parent.map(ChildOf::parent).or_else(|| q_player.single().ok());
        if let Some(owner) = owner {
            commands.entity(e).insert(WeaponOwner(owner));
        }
    }
}

/// Tick every weapon and resolve the ones that fire.
pub fn fire_weapons(
    time: Res<Time<Fixed>>,
    mut q_weapons: Query<(&mut WeaponScheduler, Option<&WeaponOwner>, Option<&mut OrbitAnchor>)>,
    q_poses: Query<&Transform>,
    q_targets: Query<(Entity, &Transform, &Health, Option<&PoolState>), With<Hostile>>,
    mut damage: MessageWriter<DamageRequest>,
    mut payloads: MessageWriter<SpawnPayload>,
) {
    let dt = time.delta_secs();

    // Collected lazily: most ticks nothing fires.
    let mut targets: Option<Vec<TargetSample>> = None;

    for (mut weapon, owner, anchor) in &mut q_weapons {
        let Some(owner_tf) = owner.and_then(|o| q_poses.get(o.0).ok()) else {
            continue;
        };
        if !weapon.tick(dt) {
            continue;
        }
        let Some(strategy) = weapon.strategy().cloned() else {
            continue;
        };

        let targets = targets.get_or_insert_with(|| {
            q_targets
                .iter()
                .filter(|(_, _, hp, state)| !hp.is_dead() && *state != Some(&PoolState::Queued))
                .map(|(entity, tf, _, _)| TargetSample { entity, position: tf.translation.truncate() })
                .collect()
        });

        let owner_pose = Pose::from_transform(owner_tf);
        let orbit_anchor = match (strategy.orbit(), anchor) {
            (Some(params), Some(mut anchor)) => {
                if params.advance == OrbitAdvance::PerAttack {
                    anchor.advance(params.speed, dt);
                }
                Some(anchor.position(owner_pose.position, params.radius))
            }
            _ => None,
        };

        let outcome = strategy.resolve(&AttackContext {
            owner: owner_pose,
            level: weapon.level(),
            targets,
            orbit_anchor,
        });

        for (target, amount) in outcome.hits {
            damage.write(DamageRequest { target, amount: amount as f32 });
        }
        for order in outcome.spawns {
            payloads.write(SpawnPayload(order));
        }
    }
}
