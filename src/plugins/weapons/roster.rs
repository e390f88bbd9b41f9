//! The player's weapon collection.

use std::sync::Arc;

use bevy::ecs::system::SystemParam;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::plugins::events::{GameEvent, PublishExt};
use crate::plugins::player::Player;
use crate::plugins::pool::EntityPool;

use super::orbit::OrbitAnchor;
use super::scheduler::WeaponScheduler;
use super::strategy::StrategyConfig;

/// Weapon entities in equip order.
///
/// The display name of each slot is kept here as well, so removal can be announced
/// even when the weapon entity was spawned in the same command batch and is not
/// queryable yet.
#[derive(Resource, Debug, Default, Clone)]
pub struct WeaponRoster {
    weapons: Vec<Entity>,
    names: HashMap<Entity, String>,
}

impl WeaponRoster {
    pub fn weapons(&self) -> &[Entity] {
        &self.weapons
    }

    pub fn get(&self, index: usize) -> Option<Entity> {
        self.weapons.get(index).copied()
    }

    pub fn count(&self) -> usize {
        self.weapons.len()
    }

    pub fn name(&self, weapon: Entity) -> Option<&str> {
        self.names.get(&weapon).map(String::as_str)
    }

    /// Forget every handle without despawning (used when the world already dropped them).
    pub fn forget_all(&mut self) {
        self.weapons.clear();
        self.names.clear();
    }
}

/// Roster operations. Weapons are spawned as children of the player.
#[derive(SystemParam)]
pub struct Armory<'w, 's> {
    commands: Commands<'w, 's>,
    roster: ResMut<'w, WeaponRoster>,
    pool: ResMut<'w, EntityPool>,
    q_weapons: Query<'w, 's, (&'static mut WeaponScheduler, Option<&'static mut OrbitAnchor>)>,
    q_player: Query<'w, 's, Entity, With<Player>>,
}

impl Armory<'_, '_> {
    pub fn roster(&self) -> &WeaponRoster {
        &self.roster
    }

    pub fn add_weapon(&mut self, strategy: Option<Arc<StrategyConfig>>, level: u32) -> Option<Entity> {
        let Some(strategy) = strategy else {
            warn!("add_weapon called without a strategy");
            return None;
        };

        let weapon = WeaponScheduler::new(Some(strategy.clone()), level);
        let level = weapon.level();
        let mut ec = self.commands.spawn((
            Name::new(format!("Weapon({})", strategy.name)),
            weapon,
            OrbitAnchor::default(),
        ));
        if let Ok(player) = self.q_player.single() {
            ec.insert(ChildOf(player));
        }
        let e = ec.id();

        self.roster.weapons.push(e);
        self.roster.names.insert(e, strategy.name.clone());
        self.commands.publish(GameEvent::WeaponEquipped { weapon: e, name: strategy.name.clone(), level });
        debug!("equipped {} (level {level})", strategy.name);
        Some(e)
    }

    pub fn remove_weapon(&mut self, weapon: Entity) -> bool {
        let Some(index) = self.roster.weapons.iter().position(|w| *w == weapon) else {
            return false;
        };
        self.remove_at(index)
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.roster.weapons.len() {
            return false;
        }
        let e = self.roster.weapons.remove(index);
        let name = self.roster.names.remove(&e).unwrap_or_default();

        let visual = self
            .q_weapons
            .get_mut(e)
            .ok()
            .and_then(|(_, anchor)| anchor.and_then(|mut a| a.visual.take()));
        if let Some((id, visual)) = visual {
            self.pool.release(&mut self.commands, id, visual);
        }
        self.commands.entity(e).try_despawn();

        self.commands.publish(GameEvent::WeaponRemoved { weapon: e, name });
        true
    }

    pub fn upgrade(&mut self, index: usize) -> bool {
        let Some(e) = self.roster.get(index) else {
            return false;
        };
        let Ok((mut weapon, _)) = self.q_weapons.get_mut(e) else {
            return false;
        };
        weapon.upgrade();
        let event = GameEvent::WeaponUpgraded { weapon: e, name: weapon.name().to_string(), level: weapon.level() };
        self.commands.publish(event);
        true
    }

    pub fn upgrade_all(&mut self) {
        for index in 0..self.roster.count() {
            self.upgrade(index);
        }
    }

    /// Swap the strategy of the weapon at `index`, keeping its level.
    pub fn evolve(&mut self, index: usize, strategy: Arc<StrategyConfig>) -> bool {
        let Some(e) = self.roster.get(index) else {
            return false;
        };
        let Ok((mut weapon, anchor)) = self.q_weapons.get_mut(e) else {
            return false;
        };
        weapon.set_strategy(Some(strategy));
        let name = weapon.name().to_string();
        let event = GameEvent::WeaponUpgraded { weapon: e, name: name.clone(), level: weapon.level() };
        self.roster.names.insert(e, name);
        if let Some((id, visual)) = anchor.and_then(|mut a| a.visual.take()) {
            self.pool.release(&mut self.commands, id, visual);
        }
        self.commands.publish(event);
        true
    }

    pub fn get(&self, index: usize) -> Option<&WeaponScheduler> {
        let e = self.roster.get(index)?;
        self.q_weapons.get(e).ok().map(|(w, _)| w)
    }

    pub fn clear_all(&mut self) {
        while !self.roster.weapons.is_empty() {
            let last = self.roster.weapons.len() - 1;
            self.remove_at(last);
        }
    }

    pub fn set_all_auto_attack(&mut self, enabled: bool) {
        for &e in &self.roster.weapons {
            if let Ok((mut weapon, _)) = self.q_weapons.get_mut(e) {
                weapon.set_auto_attack(enabled);
            }
        }
    }

    pub fn force_all_attack(&mut self) {
        for &e in &self.roster.weapons {
            if let Ok((mut weapon, _)) = self.q_weapons.get_mut(e) {
                weapon.force_attack();
            }
        }
    }
}
