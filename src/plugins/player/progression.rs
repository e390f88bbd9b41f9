//! Score, experience and levels.
//!
//! Methods return the events they imply instead of publishing, so the bookkeeping
//! stays testable without a world. Listeners installed by the player plugin feed
//! kills in and forward the returned events to the bus.

use anyhow::Context;
use bevy::prelude::*;

use crate::plugins::events::{EventBus, GameEvent};

/// Multipliers never drop below this.
const MIN_MULTIPLIER: f32 = 0.1;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerProgression {
    score: u32,
    level: u32,
    current_experience: u32,
    experience_to_next_level: u32,
    base_experience_to_next_level: u32,
    growth_factor: f32,
    damage_multiplier: f32,
    attack_speed_multiplier: f32,
    move_speed_multiplier: f32,
    luck: f32,
}

impl Default for PlayerProgression {
    fn default() -> Self {
        Self::new(100, 1.5)
    }
}

impl PlayerProgression {
    pub fn new(experience_to_next_level: u32, growth_factor: f32) -> Self {
        let threshold = experience_to_next_level.max(1);
        Self {
            score: 0,
            level: 1,
            current_experience: 0,
            experience_to_next_level: threshold,
            base_experience_to_next_level: threshold,
            growth_factor,
            damage_multiplier: 1.0,
            attack_speed_multiplier: 1.0,
            move_speed_multiplier: 1.0,
            luck: 1.0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_experience(&self) -> u32 {
        self.current_experience
    }

    pub fn experience_to_next_level(&self) -> u32 {
        self.experience_to_next_level
    }

    pub fn experience_percentage(&self) -> f32 {
        self.current_experience as f32 / self.experience_to_next_level as f32
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.damage_multiplier
    }

    pub fn attack_speed_multiplier(&self) -> f32 {
        self.attack_speed_multiplier
    }

    pub fn move_speed_multiplier(&self) -> f32 {
        self.move_speed_multiplier
    }

    pub fn luck(&self) -> f32 {
        self.luck
    }

    pub fn add_score(&mut self, amount: u32) -> GameEvent {
        self.score = self.score.saturating_add(amount);
        GameEvent::ScoreChanged { score: self.score, level: self.level }
    }

    /// Adds experience and drains whole levels. One `PlayerLevelUp` per level gained,
    /// then a final `ExperienceGained`.
    pub fn add_experience(&mut self, amount: u32) -> Vec<GameEvent> {
        self.current_experience = self.current_experience.saturating_add(amount);

        let mut events = Vec::new();
        while self.current_experience >= self.experience_to_next_level {
            self.current_experience -= self.experience_to_next_level;
            self.level += 1;
            let grown = (self.experience_to_next_level as f32 * self.growth_factor).round_ties_even();
            self.experience_to_next_level = (grown as u32).max(1);
            debug!("player reached level {}", self.level);
            events.push(GameEvent::PlayerLevelUp {
                level: self.level,
                experience_to_next_level: self.experience_to_next_level,
            });
        }

        events.push(GameEvent::ExperienceGained {
            current_experience: self.current_experience,
            experience_to_next_level: self.experience_to_next_level,
            level: self.level,
        });
        events
    }

    /// Kill reward: the score value, and half of it as experience.
    pub fn reward_kill(&mut self, score_value: u32) -> Vec<GameEvent> {
        let mut events = vec![self.add_score(score_value)];
        events.extend(self.add_experience(score_value / 2));
        events
    }

    pub fn set_damage_multiplier(&mut self, value: f32) {
        self.damage_multiplier = value.max(MIN_MULTIPLIER);
    }

    pub fn add_damage_multiplier(&mut self, delta: f32) {
        self.set_damage_multiplier(self.damage_multiplier + delta);
    }

    pub fn set_attack_speed_multiplier(&mut self, value: f32) {
        self.attack_speed_multiplier = value.max(MIN_MULTIPLIER);
    }

    pub fn add_attack_speed_multiplier(&mut self, delta: f32) {
        self.set_attack_speed_multiplier(self.attack_speed_multiplier + delta);
    }

    pub fn set_move_speed_multiplier(&mut self, value: f32) {
        self.move_speed_multiplier = value.max(MIN_MULTIPLIER);
    }

    pub fn add_move_speed_multiplier(&mut self, delta: f32) {
        self.set_move_speed_multiplier(self.move_speed_multiplier + delta);
    }

    pub fn set_luck(&mut self, value: f32) {
        self.luck = value.max(MIN_MULTIPLIER);
    }

    pub fn add_luck(&mut self, delta: f32) {
        self.set_luck(self.luck + delta);
    }

    pub fn reset_stats(&mut self) {
        *self = Self::new(self.base_experience_to_next_level, self.growth_factor);
    }
}

/// `EnemyKilled` listener.
pub fn on_enemy_killed(world: &mut World, event: &GameEvent) -> anyhow::Result<()> {
    let GameEvent::EnemyKilled { score_value, .. } = event else {
        return Ok(());
    };
    let events = world
        .get_resource_mut::<PlayerProgression>()
        .context("PlayerProgression resource missing")?
        .reward_kill(*score_value);
    for ev in events {
        EventBus::publish(world, ev);
    }
    Ok(())
}

/// `GameStart` / `GameRestart` listener.
pub fn on_game_reset(world: &mut World, _: &GameEvent) -> anyhow::Result<()> {
    world
        .get_resource_mut::<PlayerProgression>()
        .context("PlayerProgression resource missing")?
        .reset_stats();
    Ok(())
}
