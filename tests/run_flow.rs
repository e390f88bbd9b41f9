mod common;

use bevy::prelude::*;
use swarm_arena::common::state::GameState;
use swarm_arena::plugins::combat::DamageRequest;
use swarm_arena::plugins::events::{EventBus, GameEvent};
use swarm_arena::plugins::flow::restart_game;
use swarm_arena::plugins::hud::HudState;
use swarm_arena::plugins::player::{Player, PlayerProgression, PlayerVitality};
use swarm_arena::plugins::spawner::EnemySpawner;

fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
        .expect("exactly one player")
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

#[test]
fn kills_feed_score_level_and_hud() {
    let mut app = common::app_headless();

    for _ in 0..2 {
        let delivery = EventBus::publish(
            app.world_mut(),
            GameEvent::EnemyKilled { enemy_name: "Grunt".into(), score_value: 200 },
        );
        assert!(delivery.is_clean());
    }

    let progression = app.world().resource::<PlayerProgression>();
    assert_eq!(progression.score(), 400);
    assert_eq!(progression.level(), 2);
    assert_eq!(progression.current_experience(), 100);
    assert_eq!(progression.experience_to_next_level(), 150);

    let hud = app.world().resource::<HudState>();
    assert_eq!(hud.score, 400);
    assert_eq!(hud.level, 2);
    assert_eq!(hud.experience, 100);
    assert_eq!(hud.experience_to_next_level, 150);
}

#[test]
fn lethal_damage_ends_the_run() {
    let mut app = common::app_headless();
    let target = player(&mut app);

    app.world_mut().write_message(DamageRequest { target, amount: 1000.0 });
    common::step(&mut app, 2);

    assert_eq!(state(&app), GameState::GameOver);
    assert!(!app.world().resource::<EnemySpawner>().is_running());
    let hud = app.world().resource::<HudState>();
    assert!(hud.game_over);
    assert_eq!(hud.health, 0.0);
    assert!(hud.weapons.is_empty());
}

#[test]
fn restart_builds_a_fresh_run() {
    let mut app = common::app_headless();
    EventBus::publish(
        app.world_mut(),
        GameEvent::EnemyKilled { enemy_name: "Grunt".into(), score_value: 50 },
    );
    let first = player(&mut app);
    app.world_mut().write_message(DamageRequest { target: first, amount: 1000.0 });
    common::step(&mut app, 2);
    assert_eq!(state(&app), GameState::GameOver);

    restart_game(app.world_mut()).expect("states initialized");
    common::step(&mut app, 2);

    assert_eq!(state(&app), GameState::InGame);
    assert!(app.world().get_entity(first).is_err());
    let fresh = player(&mut app);
    let vitality = app.world().get::<PlayerVitality>(fresh).expect("player has vitality");
    assert_eq!(vitality.current(), vitality.max());

    assert_eq!(app.world().resource::<PlayerProgression>().score(), 0);
    assert!(app.world().resource::<EnemySpawner>().is_running());
    let hud = app.world().resource::<HudState>();
    assert!(!hud.game_over);
    assert_eq!(hud.score, 0);
    assert_eq!(hud.weapons.len(), 1);
}
