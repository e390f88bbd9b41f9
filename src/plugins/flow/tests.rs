use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use super::*;
use crate::common::test_utils::{Recorded, record_events, run_system_once};

fn world_with_state() -> World {
    let mut world = World::new();
    world.insert_resource(NextState::<GameState>::default());
    world
}

#[test]
fn entering_game_publishes_start() {
    let mut world = World::new();
    record_events(&mut world, &[EventName::GameStart]);

    run_system_once(&mut world, publish_game_start);

    assert_eq!(world.resource::<Recorded>().0, vec![GameEvent::GameStart]);
}

#[test]
fn player_death_ends_the_game() {
    let mut world = world_with_state();
    record_events(&mut world, &[EventName::GameOver]);
    world.resource_mut::<EventBus>().subscribe(EventName::PlayerDied, on_player_died);

    let delivery = EventBus::publish(&mut world, GameEvent::PlayerDied);

    assert!(delivery.is_clean());
    assert_eq!(world.resource::<Recorded>().0, vec![GameEvent::GameOver]);
}

#[test]
fn player_death_without_states_is_a_listener_fault() {
    let mut world = World::new();
    world.init_resource::<EventBus>();
    world.resource_mut::<EventBus>().subscribe(EventName::PlayerDied, on_player_died);

    let delivery = EventBus::publish(&mut world, GameEvent::PlayerDied);

    assert_eq!(delivery.faults.len(), 1);
}

#[test]
fn restart_announces_and_requests_new_run() {
    let mut world = world_with_state();
    record_events(&mut world, &[EventName::GameRestart]);

    restart_game(&mut world).expect("state initialized");

    assert_eq!(world.resource::<Recorded>().0, vec![GameEvent::GameRestart]);
}

#[test]
fn death_round_trip_through_app_states() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_state::<GameState>();
    crate::plugins::events::plugin(&mut app);
    plugin(&mut app);
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);

    EventBus::publish(app.world_mut(), GameEvent::PlayerDied);
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::GameOver);

    restart_game(app.world_mut()).expect("state initialized");
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
}
