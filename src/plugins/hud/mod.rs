//! HUD adapter: the numbers a HUD shows, kept current from bus notifications only.
//!
//! Nothing here reads gameplay components. A renderer can draw [`HudState`] as-is.

use anyhow::Context;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::events::{EventName, GameEvent, SubscribeExt};

/// One roster slot as the HUD shows it. `weapon` identifies the slot; names repeat
/// and change on evolve.
#[derive(Debug, Clone, PartialEq)]
pub struct HudWeapon {
    pub weapon: Entity,
    pub name: String,
    pub level: u32,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HudState {
    pub health: f32,
    pub max_health: f32,
    pub score: u32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    /// Equipped weapons in equip order.
    pub weapons: Vec<HudWeapon>,
    pub game_over: bool,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            health: 100.0,
            max_health: 100.0,
            score: 0,
            level: 1,
            experience: 0,
            experience_to_next_level: 100,
            weapons: Vec::new(),
            game_over: false,
        }
    }
}

impl HudState {
    pub fn health_fraction(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn weapon(&self, weapon: Entity) -> Option<&HudWeapon> {
        self.weapons.iter().find(|w| w.weapon == weapon)
    }

    pub fn experience_fraction(&self) -> f32 {
        if self.experience_to_next_level == 0 {
            return 0.0;
        }
        self.experience as f32 / self.experience_to_next_level as f32
    }

    /// Fold one notification into the view.
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerDamaged { current_health, .. } | GameEvent::PlayerHealed { current_health, .. } => {
                self.health = *current_health;
            }
            GameEvent::PlayerDied => self.health = 0.0,
            GameEvent::ScoreChanged { score, level } => {
                self.score = *score;
                self.level = *level;
            }
            GameEvent::PlayerLevelUp { level, experience_to_next_level } => {
                self.level = *level;
                self.experience_to_next_level = *experience_to_next_level;
            }
            GameEvent::ExperienceGained { current_experience, experience_to_next_level, level } => {
                self.experience = *current_experience;
                self.experience_to_next_level = *experience_to_next_level;
                self.level = *level;
            }
            GameEvent::WeaponEquipped { weapon, name, level }
            | GameEvent::WeaponUpgraded { weapon, name, level } => {
                let entry = HudWeapon { weapon: *weapon, name: name.clone(), level: *level };
                match self.weapons.iter_mut().find(|w| w.weapon == *weapon) {
                    Some(slot) => *slot = entry,
                    None => self.weapons.push(entry),
                }
            }
            GameEvent::WeaponRemoved { weapon, .. } => self.weapons.retain(|w| w.weapon != *weapon),
            GameEvent::GameStart | GameEvent::GameRestart => {
                // Weapons are equipped during the same transition; keep the list.
                let weapons = std::mem::take(&mut self.weapons);
                *self = Self { weapons, ..Self::default() };
            }
            GameEvent::GameOver => self.game_over = true,
            GameEvent::EnemyKilled { .. } | GameEvent::EnemySpawned { .. } => {}
        }
    }
}

const WATCHED: [EventName; 12] = [
    EventName::PlayerDamaged,
    EventName::PlayerHealed,
    EventName::PlayerDied,
    EventName::ScoreChanged,
    EventName::PlayerLevelUp,
    EventName::ExperienceGained,
    EventName::WeaponEquipped,
    EventName::WeaponUpgraded,
    EventName::WeaponRemoved,
    EventName::GameStart,
    EventName::GameRestart,
    EventName::GameOver,
];

pub fn plugin(app: &mut App) {
    app.init_resource::<HudState>()
        .add_systems(OnExit(GameState::InGame), clear_weapons);
    for name in WATCHED {
        app.subscribe(name, on_event);
    }
}

fn on_event(world: &mut World, event: &GameEvent) -> anyhow::Result<()> {
    world
        .get_resource_mut::<HudState>()
        .context("HudState resource missing")?
        .apply(event);
    Ok(())
}

/// The roster is dropped without per-weapon notifications when a run ends.
fn clear_weapons(mut hud: ResMut<HudState>) {
    hud.weapons.clear();
}
