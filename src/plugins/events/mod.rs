//! Events plugin: a synchronous publish/subscribe bus for game-level notifications.
//!
//! The bus decouples producers (enemy lifecycle, player vitality, weapon roster)
//! from consumers (progression, HUD, game flow). Nothing holds a reference to anything
//! else: a producer publishes a [`GameEvent`], every listener registered for its
//! [`EventName`] runs immediately, in registration order.
//!
//! ```text
//!   system ──commands.publish(ev)──▶ (next sync point) ──▶ EventBus::publish(world, ev)
//!                                                             │ snapshot listeners
//!                                                             ▼
//!                                              listener 1 ─ listener 2 ─ ... (same call stack)
//! ```
//!
//! Listeners get `&mut World`, so they can mutate resources and publish follow-up
//! events (nested publishes are delivered before the outer publish returns).
//!
//! A listener that fails is logged and reported in the returned [`Delivery`];
//! the remaining listeners still run.

pub mod bus;

use bevy::prelude::*;

pub use bus::{Delivery, EventBus, EventName, GameEvent, Listener, ListenerFault, ListenerId};

pub fn plugin(app: &mut App) {
    app.init_resource::<EventBus>();
}

/// Queue a publish from inside a system.
///
/// Delivery happens when the command queue is applied, i.e. at the next sync point
/// of the schedule.
pub trait PublishExt {
    fn publish(&mut self, event: GameEvent);
}

impl PublishExt for Commands<'_, '_> {
    fn publish(&mut self, event: GameEvent) {
        self.queue(move |world: &mut World| {
            EventBus::publish(world, event);
        });
    }
}

/// Register listeners while building the app.
pub trait SubscribeExt {
    fn subscribe<F>(&mut self, name: EventName, listener: F) -> &mut Self
    where
        F: Fn(&mut World, &GameEvent) -> anyhow::Result<()> + Send + Sync + 'static;
}

impl SubscribeExt for App {
    fn subscribe<F>(&mut self, name: EventName, listener: F) -> &mut Self
    where
        F: Fn(&mut World, &GameEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.init_resource::<EventBus>();
        self.world_mut()
            .resource_mut::<EventBus>()
            .subscribe(name, listener);
        self
    }
}

#[cfg(test)]
mod tests;
