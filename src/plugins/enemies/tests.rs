use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{EnemyLife, EnemyStats, JumpAttack, PursuitTarget, RECYCLE_DELAY, SwarmBehavior};
use super::{EnemyCensus, behavior, components, lifecycle};
use crate::common::test_utils::{
    Recorded, drain_messages, ensure_messages, fixed_time_with_delta, record_events, run_system_once,
};
use crate::common::tunables::Tunables;
use crate::plugins::combat::{DamageOutcome, DamageRequest, Damageable, Health, Hostile};
use crate::plugins::core::SimClock;
use crate::plugins::events::{EventName, GameEvent};
use crate::plugins::player::Player;
use crate::plugins::pool::{BlueprintId, Blueprints, EntityPool, PoolAccess, PoolState, Pooled};

fn world(dt: f32) -> World {
    let t = Tunables::default();
    let mut blueprints = Blueprints::default();
    blueprints.register(BlueprintId::GRUNT, components::grunt_blueprint(&t));
    blueprints.register(BlueprintId::MINION, components::minion_blueprint(&t));

    let mut world = World::new();
    world.insert_resource(blueprints);
    world.insert_resource(t);
    world.init_resource::<EntityPool>();
    world.init_resource::<EnemyCensus>();
    world.init_resource::<SimClock>();
    world.insert_resource(fixed_time_with_delta(dt));
    ensure_messages::<CollisionStart>(&mut world);
    ensure_messages::<DamageRequest>(&mut world);
    world
}

fn acquire(world: &mut World, id: BlueprintId, at: Vec2) -> Entity {
    run_system_once(world, move |mut pool: PoolAccess| pool.acquire(id, at, Quat::IDENTITY))
        .expect("blueprint registered")
}

fn player_at(world: &mut World, at: Vec2) -> Entity {
    world.spawn((Player, Transform::from_translation(at.extend(1.0)))).id()
}

fn kill(world: &mut World, e: Entity) {
    world.get_mut::<Health>(e).unwrap().take_damage(10_000.0);
}

fn steer(world: &mut World) {
    run_system_once(world, behavior::acquire_pursuit_targets);
    run_system_once(world, behavior::steer_enemies);
}

#[test]
fn minion_blueprint_composes_swarm_and_jump() {
    let mut world = world(0.1);
    let e = acquire(&mut world, BlueprintId::MINION, Vec2::new(10.0, 0.0));

    assert_eq!(world.get::<EnemyLife>(e), Some(&EnemyLife::Alive));
    assert_eq!(world.get::<Health>(e).unwrap().current(), 30.0);
    assert!(world.get::<Hostile>(e).is_some());
    assert!(world.get::<SwarmBehavior>(e).is_some());
    assert!(world.get::<JumpAttack>(e).is_some());

    let grunt = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    assert!(world.get::<SwarmBehavior>(grunt).is_none());
    assert_eq!(world.get::<Health>(grunt).unwrap().current(), 100.0);
}

#[test]
fn stat_setters_clamp() {
    let mut stats = EnemyStats::grunt(&Tunables::default());
    stats.set_move_speed(-3.0);
    stats.set_damage(-1.0);
    assert_eq!(stats.move_speed, 0.0);
    assert_eq!(stats.contact_damage, 0.0);

    let mut hp = Health::full(100.0);
    hp.take_damage(20.0);
    hp.set_max(50.0);
    assert_eq!(hp.current(), 50.0);
    assert_eq!(hp.percentage(), 1.0);
}

#[test]
fn pursues_player_inside_detection_range() {
    let mut world = world(0.1);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    player_at(&mut world, Vec2::new(100.0, 0.0));

    steer(&mut world);

    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(60.0, 0.0));
    assert_eq!(world.get::<PursuitTarget>(e).unwrap().distance_to_player(), Some(100.0));
}

#[test]
fn stands_still_outside_detection_range() {
    let mut world = world(0.1);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::ONE;
    player_at(&mut world, Vec2::new(1000.0, 0.0));

    steer(&mut world);

    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
}

#[test]
fn turning_is_capped_by_rotate_speed() {
    let mut world = world(0.1);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    player_at(&mut world, Vec2::new(100.0, 0.0));

    steer(&mut world);

    let forward = (world.get::<Transform>(e).unwrap().rotation * Vec3::Y).truncate();
    let turned = forward.angle_to(Vec2::Y).abs().to_degrees();
    assert!((turned - 18.0).abs() < 1e-3, "turned {turned} degrees");
}

#[test]
fn without_player_enemy_waits() {
    let mut world = world(0.1);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);

    steer(&mut world);

    assert_eq!(world.get::<PursuitTarget>(e).unwrap().player, None);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
}

#[test]
fn death_goes_inert_and_publishes_kill_once() {
    let mut world = world(0.1);
    record_events(&mut world, &[EventName::EnemyKilled]);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::new(5.0, 5.0);

    kill(&mut world, e);
    run_system_once(&mut world, lifecycle::trigger_enemy_deaths);
    assert_eq!(world.get_mut::<Health>(e).unwrap().take_damage(5.0), DamageOutcome::Ignored);
    run_system_once(&mut world, lifecycle::trigger_enemy_deaths);

    assert_eq!(world.get::<EnemyLife>(e), Some(&EnemyLife::Dead { recycle_in: RECYCLE_DELAY }));
    assert_eq!(world.get::<Health>(e).unwrap().current(), 0.0);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
    assert_eq!(world.get::<CollisionLayers>(e).unwrap().filters, LayerMask::NONE);
    assert_eq!(
        world.resource::<Recorded>().0,
        vec![GameEvent::EnemyKilled { enemy_name: "Grunt".into(), score_value: 10 }]
    );
}

#[test]
fn recycled_after_delay_and_reset_on_reuse() {
    let mut world = world(0.5);
    let e = acquire(&mut world, BlueprintId::MINION, Vec2::ZERO);
    world.resource_mut::<EnemyCensus>().record_spawn();

    kill(&mut world, e);
    run_system_once(&mut world, lifecycle::trigger_enemy_deaths);
    for _ in 0..3 {
        run_system_once(&mut world, lifecycle::recycle_dead_enemies);
    }
    assert!(matches!(world.get::<EnemyLife>(e), Some(EnemyLife::Dead { .. })));
    assert_eq!(world.resource::<EnemyCensus>().live(), 1);

    run_system_once(&mut world, lifecycle::recycle_dead_enemies);
    assert_eq!(world.get::<EnemyLife>(e), Some(&EnemyLife::Recycled));
    assert_eq!(world.get::<PoolState>(e), Some(&PoolState::Queued));
    assert_eq!(world.resource::<EnemyCensus>().live(), 0);

    let again = acquire(&mut world, BlueprintId::MINION, Vec2::new(40.0, 0.0));
    assert_eq!(again, e);
    assert_eq!(world.get::<EnemyLife>(e), Some(&EnemyLife::Alive));
    assert_eq!(world.get::<Health>(e).unwrap().current(), 30.0);
    assert!(world.get::<CollisionLayers>(e).unwrap().filters.has_all(crate::common::layers::Layer::Player));

    // The old countdown is gone: a full delay of ticks changes nothing.
    for _ in 0..5 {
        run_system_once(&mut world, lifecycle::recycle_dead_enemies);
    }
    assert_eq!(world.get::<EnemyLife>(e), Some(&EnemyLife::Alive));
}

#[test]
fn unpooled_enemy_is_despawned() {
    let mut world = world(1.0);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    world.entity_mut(e).remove::<Pooled>();

    kill(&mut world, e);
    run_system_once(&mut world, lifecycle::trigger_enemy_deaths);
    run_system_once(&mut world, lifecycle::recycle_dead_enemies);
    run_system_once(&mut world, lifecycle::recycle_dead_enemies);

    assert!(world.get_entity(e).is_err());
}

#[test]
fn swarm_leader_is_member_closest_to_player() {
    let mut world = world(0.1);
    let a = acquire(&mut world, BlueprintId::MINION, Vec2::new(0.0, 0.0));
    let b = acquire(&mut world, BlueprintId::MINION, Vec2::new(50.0, 0.0));
    let c = acquire(&mut world, BlueprintId::MINION, Vec2::new(100.0, 0.0));
    player_at(&mut world, Vec2::new(300.0, 0.0));

    run_system_once(&mut world, behavior::rescan_swarms);

    for e in [a, b, c] {
        assert_eq!(world.get::<SwarmBehavior>(e).unwrap().leader(), Some(c));
    }
    assert_eq!(world.get::<SwarmBehavior>(a).unwrap().nearby_count(), 2);
    assert!(world.get::<SwarmBehavior>(c).unwrap().is_leader(c));
    assert!(!world.get::<SwarmBehavior>(a).unwrap().is_leader(a));
}

#[test]
fn lone_minion_leads_itself() {
    let mut world = world(0.1);
    let a = acquire(&mut world, BlueprintId::MINION, Vec2::ZERO);
    player_at(&mut world, Vec2::new(300.0, 0.0));

    run_system_once(&mut world, behavior::rescan_swarms);

    let swarm = world.get::<SwarmBehavior>(a).unwrap();
    assert!(swarm.is_leader(a));
    assert_eq!(swarm.nearby_count(), 0);
}

#[test]
fn follower_trails_leader_at_reduced_speed() {
    let mut world = world(0.1);
    let follower = acquire(&mut world, BlueprintId::MINION, Vec2::ZERO);
    let leader = acquire(&mut world, BlueprintId::MINION, Vec2::new(150.0, 0.0));
    player_at(&mut world, Vec2::new(400.0, 0.0));

    run_system_once(&mut world, behavior::rescan_swarms);
    steer(&mut world);

    let v = world.get::<LinearVelocity>(follower).unwrap().0;
    assert!((v - Vec2::new(63.0, 0.0)).length() < 1e-3, "follower velocity {v:?}");
    assert!(world.get::<SwarmBehavior>(leader).unwrap().is_leader(leader));
}

#[test]
fn followers_rescan_after_leader_dies() {
    let mut world = world(0.1);
    let follower = acquire(&mut world, BlueprintId::MINION, Vec2::ZERO);
    let leader = acquire(&mut world, BlueprintId::MINION, Vec2::new(100.0, 0.0));
    player_at(&mut world, Vec2::new(400.0, 0.0));
    run_system_once(&mut world, behavior::rescan_swarms);
    assert_eq!(world.get::<SwarmBehavior>(follower).unwrap().leader(), Some(leader));

    *world.get_mut::<EnemyLife>(leader).unwrap() = EnemyLife::Dead { recycle_in: RECYCLE_DELAY };
    world.resource_mut::<SimClock>().tick = 7;
    run_system_once(&mut world, behavior::rescan_swarms);

    assert_eq!(world.get::<SwarmBehavior>(follower).unwrap().leader(), Some(follower));
}

#[test]
fn jump_lunges_then_cools_down() {
    let mut world = world(0.5);
    let e = acquire(&mut world, BlueprintId::MINION, Vec2::ZERO);
    player_at(&mut world, Vec2::new(50.0, 0.0));

    steer(&mut world);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(100.0, 0.0));
    assert!(world.get::<JumpAttack>(e).unwrap().is_jumping());

    run_system_once(&mut world, lifecycle::tick_jump_timers);
    steer(&mut world);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(100.0, 0.0));

    run_system_once(&mut world, lifecycle::tick_jump_timers);
    let jump = world.get::<JumpAttack>(e).unwrap();
    assert!(!jump.is_jumping());
    assert!(!jump.ready());

    steer(&mut world);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(90.0, 0.0));
}

#[test]
fn contact_with_player_requests_damage() {
    let mut world = world(0.1);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    let player = player_at(&mut world, Vec2::new(20.0, 0.0));

    world.write_message(CollisionStart { collider1: player, collider2: e, body1: Some(player), body2: Some(e) });
    run_system_once(&mut world, lifecycle::contact_damage);

    assert_eq!(
        drain_messages::<DamageRequest>(&mut world),
        vec![DamageRequest { target: player, amount: 10.0 }]
    );
}

#[test]
fn dead_enemy_deals_no_contact_damage() {
    let mut world = world(0.1);
    let e = acquire(&mut world, BlueprintId::GRUNT, Vec2::ZERO);
    let player = player_at(&mut world, Vec2::new(20.0, 0.0));
    kill(&mut world, e);
    run_system_once(&mut world, lifecycle::trigger_enemy_deaths);

    world.write_message(CollisionStart { collider1: e, collider2: player, body1: Some(e), body2: Some(player) });
    run_system_once(&mut world, lifecycle::contact_damage);

    assert!(drain_messages::<DamageRequest>(&mut world).is_empty());
}

#[test]
fn census_never_underflows() {
    let mut census = EnemyCensus::default();
    census.record_recycle();
    assert_eq!(census.live(), 0);
    census.record_spawn();
    census.record_spawn();
    census.record_recycle();
    assert_eq!(census.live(), 1);
}
