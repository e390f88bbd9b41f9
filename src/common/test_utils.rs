//! Test helpers.
//!
//! `World::run_system_once` executes a system without building a schedule.
//! Systems that use `Commands` only enqueue structural changes, so we flush
//! after running to apply them before assertions.

use std::time::Duration;

use bevy::ecs::message::{Message, Messages};
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::plugins::events::{EventBus, EventName, GameEvent};

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A `Time<Fixed>` whose delta is `dt` seconds.
pub fn fixed_time_with_delta(dt: f32) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// Make sure a message buffer exists so readers/writers validate.
pub fn ensure_messages<M: Message>(world: &mut World) {
    if world.get_resource::<Messages<M>>().is_none() {
        world.init_resource::<Messages<M>>();
    }
}

/// Drain every message of type `M` currently buffered.
pub fn drain_messages<M: Message + Clone>(world: &mut World) -> Vec<M> {
    let mut msgs = world.resource_mut::<Messages<M>>();
    msgs.drain().collect()
}

/// Events captured by [`record_events`], in delivery order.
#[derive(Resource, Default, Debug)]
pub struct Recorded(pub Vec<GameEvent>);

/// Subscribe a recorder for each of `names` (creates the bus if needed).
pub fn record_events(world: &mut World, names: &[EventName]) {
    world.init_resource::<Recorded>();
    world.init_resource::<EventBus>();
    let mut bus = world.resource_mut::<EventBus>();
    for &name in names {
        bus.subscribe(name, |world: &mut World, ev: &GameEvent| {
            world.resource_mut::<Recorded>().0.push(ev.clone());
            Ok(())
        });
    }
}

/// Tiny deterministic PRNG for property-style tests (xorshift64*).
#[derive(Clone, Copy)]
pub struct TestRng(u64);

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // 24 random bits -> float in [0,1)
        let v = (self.next_u64() >> 40) as u32;
        (v as f32) / ((1u32 << 24) as f32)
    }

    #[inline]
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        debug_assert!(hi >= lo);
        lo + (hi - lo) * self.next_f32()
    }
}
