use std::fmt;
use std::sync::Arc;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

/// Shared listener handle. Cloning it and subscribing twice registers it twice.
pub type Listener = Arc<dyn Fn(&mut World, &GameEvent) -> anyhow::Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    PlayerDamaged,
    PlayerHealed,
    PlayerDied,
    PlayerLevelUp,
    ScoreChanged,
    ExperienceGained,
    EnemyKilled,
    EnemySpawned,
    WeaponEquipped,
    WeaponUpgraded,
    WeaponRemoved,
    GameStart,
    GameRestart,
    GameOver,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::PlayerDamaged => "PlayerDamaged",
            EventName::PlayerHealed => "PlayerHealed",
            EventName::PlayerDied => "PlayerDied",
            EventName::PlayerLevelUp => "PlayerLevelUp",
            EventName::ScoreChanged => "ScoreChanged",
            EventName::ExperienceGained => "ExperienceGained",
            EventName::EnemyKilled => "EnemyKilled",
            EventName::EnemySpawned => "EnemySpawned",
            EventName::WeaponEquipped => "WeaponEquipped",
            EventName::WeaponUpgraded => "WeaponUpgraded",
            EventName::WeaponRemoved => "WeaponRemoved",
            EventName::GameStart => "GameStart",
            EventName::GameRestart => "GameRestart",
            EventName::GameOver => "GameOver",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification. Each name has exactly one payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerDamaged { amount: f32, current_health: f32 },
    PlayerHealed { amount: f32, current_health: f32 },
    PlayerDied,
    PlayerLevelUp { level: u32, experience_to_next_level: u32 },
    ScoreChanged { score: u32, level: u32 },
    ExperienceGained { current_experience: u32, experience_to_next_level: u32, level: u32 },
    EnemyKilled { enemy_name: String, score_value: u32 },
    EnemySpawned { enemy_name: String, total_spawned: u32 },
    /// `weapon` is the roster slot's entity; it stays the same across upgrades and evolves.
    WeaponEquipped { weapon: Entity, name: String, level: u32 },
    /// Also sent by `evolve`, with the new strategy's name.
    WeaponUpgraded { weapon: Entity, name: String, level: u32 },
    WeaponRemoved { weapon: Entity, name: String },
    GameStart,
    GameRestart,
    GameOver,
}

impl GameEvent {
    pub fn name(&self) -> EventName {
        match self {
            GameEvent::PlayerDamaged { .. } => EventName::PlayerDamaged,
            GameEvent::PlayerHealed { .. } => EventName::PlayerHealed,
            GameEvent::PlayerDied => EventName::PlayerDied,
            GameEvent::PlayerLevelUp { .. } => EventName::PlayerLevelUp,
            GameEvent::ScoreChanged { .. } => EventName::ScoreChanged,
            GameEvent::ExperienceGained { .. } => EventName::ExperienceGained,
            GameEvent::EnemyKilled { .. } => EventName::EnemyKilled,
            GameEvent::EnemySpawned { .. } => EventName::EnemySpawned,
            GameEvent::WeaponEquipped { .. } => EventName::WeaponEquipped,
            GameEvent::WeaponUpgraded { .. } => EventName::WeaponUpgraded,
            GameEvent::WeaponRemoved { .. } => EventName::WeaponRemoved,
            GameEvent::GameStart => EventName::GameStart,
            GameEvent::GameRestart => EventName::GameRestart,
            GameEvent::GameOver => EventName::GameOver,
        }
    }
}

#[derive(Debug)]
pub struct ListenerFault {
    pub event: EventName,
    pub listener: ListenerId,
    pub error: anyhow::Error,
}

/// Outcome of one publish call.
#[derive(Debug, Default)]
pub struct Delivery {
    pub delivered: usize,
    pub faults: Vec<ListenerFault>,
}

impl Delivery {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Listener registry keyed by event name.
///
/// Subscribing the same listener twice accumulates: it runs twice per publish.
#[derive(Resource, Default)]
pub struct EventBus {
    listeners: HashMap<EventName, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl EventBus {
    pub fn subscribe<F>(&mut self, name: EventName, listener: F) -> ListenerId
    where
        F: Fn(&mut World, &GameEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe_shared(name, Arc::new(listener))
    }

    pub fn subscribe_shared(&mut self, name: EventName, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(name).or_default().push((id, listener));
        id
    }

    /// Returns false when `id` was never registered under `name`.
    pub fn unsubscribe(&mut self, name: EventName, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&name) else {
            return false;
        };
        let Some(index) = list.iter().position(|(lid, _)| *lid == id) else {
            return false;
        };
        list.remove(index);
        if list.is_empty() {
            self.listeners.remove(&name);
        }
        true
    }

    pub fn clear(&mut self, name: EventName) {
        self.listeners.remove(&name);
    }

    pub fn clear_all(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self, name: EventName) -> usize {
        self.listeners.get(&name).map_or(0, Vec::len)
    }

    #[inline]
    pub fn has_listeners(&self, name: EventName) -> bool {
        self.listener_count(name) > 0
    }

    fn snapshot(&self, name: EventName) -> Vec<(ListenerId, Listener)> {
        self.listeners.get(&name).cloned().unwrap_or_default()
    }

    /// Deliver `event` to every listener registered for its name at call time.
    ///
    /// The listener list is copied before delivery, so listeners may subscribe,
    /// unsubscribe or publish while running. No bus in the world means no listeners.
    pub fn publish(world: &mut World, event: GameEvent) -> Delivery {
        let name = event.name();
        let Some(listeners) = world.get_resource::<EventBus>().map(|bus| bus.snapshot(name)) else {
            return Delivery::default();
        };

        let mut delivery = Delivery::default();
        for (id, listener) in listeners {
            match listener(world, &event) {
                Ok(()) => delivery.delivered += 1,
                Err(error) => {
                    warn!("listener {id:?} for {name} failed: {error:#}");
                    delivery.faults.push(ListenerFault { event: name, listener: id, error });
                }
            }
        }
        delivery
    }
}
