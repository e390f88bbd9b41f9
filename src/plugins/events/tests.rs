use std::sync::Arc;

use anyhow::bail;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

/// Records every delivered event name, in order.
#[derive(Resource, Default)]
struct Log(Vec<String>);

fn log_as(tag: &'static str) -> impl Fn(&mut World, &GameEvent) -> anyhow::Result<()> + Send + Sync {
    move |world: &mut World, ev: &GameEvent| {
        world.resource_mut::<Log>().0.push(format!("{tag}:{}", ev.name()));
        Ok(())
    }
}

fn world_with_bus() -> World {
    let mut world = World::new();
    world.init_resource::<EventBus>();
    world.init_resource::<Log>();
    world
}

#[test]
fn publish_without_listeners_is_noop() {
    let mut world = world_with_bus();
    let delivery = EventBus::publish(&mut world, GameEvent::GameOver);
    assert_eq!(delivery.delivered, 0);
    assert!(delivery.is_clean());
}

#[test]
fn publish_without_bus_is_noop() {
    let mut world = World::new();
    let delivery = EventBus::publish(&mut world, GameEvent::PlayerDied);
    assert_eq!(delivery.delivered, 0);
}

#[test]
fn listeners_run_in_registration_order() {
    let mut world = world_with_bus();
    {
        let mut bus = world.resource_mut::<EventBus>();
        bus.subscribe(EventName::GameStart, log_as("a"));
        bus.subscribe(EventName::GameStart, log_as("b"));
        bus.subscribe(EventName::GameOver, log_as("other"));
    }

    EventBus::publish(&mut world, GameEvent::GameStart);

    assert_eq!(world.resource::<Log>().0, vec!["a:GameStart", "b:GameStart"]);
}

#[test]
fn duplicate_subscription_accumulates() {
    let mut world = world_with_bus();
    let shared: Listener = Arc::new(log_as("dup"));
    {
        let mut bus = world.resource_mut::<EventBus>();
        bus.subscribe_shared(EventName::PlayerDied, shared.clone());
        bus.subscribe_shared(EventName::PlayerDied, shared);
    }

    let delivery = EventBus::publish(&mut world, GameEvent::PlayerDied);

    assert_eq!(delivery.delivered, 2);
    assert_eq!(world.resource::<Log>().0.len(), 2);
}

#[test]
fn unsubscribe_removes_one_registration() {
    let mut world = world_with_bus();
    let (first, second) = {
        let mut bus = world.resource_mut::<EventBus>();
        (
            bus.subscribe(EventName::GameOver, log_as("a")),
            bus.subscribe(EventName::GameOver, log_as("b")),
        )
    };

    assert!(world.resource_mut::<EventBus>().unsubscribe(EventName::GameOver, first));
    EventBus::publish(&mut world, GameEvent::GameOver);
    assert_eq!(world.resource::<Log>().0, vec!["b:GameOver"]);

    // Wrong name and repeated removal are both no-ops.
    let mut bus = world.resource_mut::<EventBus>();
    assert!(!bus.unsubscribe(EventName::GameStart, second));
    assert!(!bus.unsubscribe(EventName::GameOver, first));
    assert_eq!(bus.listener_count(EventName::GameOver), 1);
}

#[test]
fn clear_all_drops_every_listener() {
    let mut world = world_with_bus();
    {
        let mut bus = world.resource_mut::<EventBus>();
        bus.subscribe(EventName::GameOver, log_as("a"));
        bus.subscribe(EventName::GameStart, log_as("b"));
        bus.clear_all();
        assert!(!bus.has_listeners(EventName::GameOver));
        assert!(!bus.has_listeners(EventName::GameStart));
    }
    EventBus::publish(&mut world, GameEvent::GameOver);
    assert!(world.resource::<Log>().0.is_empty());
}

#[test]
fn failing_listener_does_not_stop_delivery() {
    let mut world = world_with_bus();
    {
        let mut bus = world.resource_mut::<EventBus>();
        bus.subscribe(EventName::GameOver, log_as("before"));
        bus.subscribe(EventName::GameOver, |_: &mut World, _: &GameEvent| bail!("boom"));
        bus.subscribe(EventName::GameOver, log_as("after"));
    }

    let delivery = EventBus::publish(&mut world, GameEvent::GameOver);

    assert_eq!(delivery.delivered, 2);
    assert_eq!(delivery.faults.len(), 1);
    assert_eq!(delivery.faults[0].event, EventName::GameOver);
    assert_eq!(world.resource::<Log>().0, vec!["before:GameOver", "after:GameOver"]);
}

#[test]
fn nested_publish_completes_before_outer_returns() {
    let mut world = world_with_bus();
    {
        let mut bus = world.resource_mut::<EventBus>();
        bus.subscribe(EventName::PlayerDied, |world: &mut World, _: &GameEvent| {
            world.resource_mut::<Log>().0.push("died".into());
            EventBus::publish(world, GameEvent::GameOver);
            world.resource_mut::<Log>().0.push("died-done".into());
            Ok(())
        });
        bus.subscribe(EventName::GameOver, log_as("over"));
    }

    EventBus::publish(&mut world, GameEvent::PlayerDied);

    assert_eq!(world.resource::<Log>().0, vec!["died", "over:GameOver", "died-done"]);
}

#[test]
fn commands_publish_delivers_on_flush() {
    let mut world = world_with_bus();
    world
        .resource_mut::<EventBus>()
        .subscribe(EventName::GameRestart, log_as("cmd"));

    run_system_once(&mut world, |mut commands: Commands| {
        commands.publish(GameEvent::GameRestart);
    });

    assert_eq!(world.resource::<Log>().0, vec!["cmd:GameRestart"]);
}

#[test]
fn every_event_maps_to_its_name() {
    let ev = GameEvent::EnemyKilled { enemy_name: "Minion".into(), score_value: 5 };
    assert_eq!(ev.name(), EventName::EnemyKilled);
    assert_eq!(ev.name().to_string(), "EnemyKilled");
    assert_eq!(
        GameEvent::ScoreChanged { score: 1, level: 1 }.name().as_str(),
        "ScoreChanged"
    );
}
