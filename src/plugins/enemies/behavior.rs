//! Enemy movement: pursuit, swarm following and jump lunges.
//!
//! Per enemy and tick, the first applicable rule sets the velocity:
//! 1. an active lunge,
//! 2. a new lunge (player inside jump range, cooldown elapsed),
//! 3. following the swarm leader (non-leader farther than the follow distance),
//! 4. pursuit of the player inside detection range,
//! 5. standing still.

use avian2d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::plugins::core::SimClock;
use crate::plugins::player::Player;
use crate::plugins::pool::PoolState;

use super::components::{
    Enemy, EnemyLife, EnemyStats, JumpAttack, PursuitTarget, SWARM_FOLLOW_SPEED, SWARM_RESCAN_TICKS,
    SwarmBehavior,
};

/// Turn `tf` toward `dir` by at most `max_degrees`. Forward is local +Y.
pub fn turn_towards(tf: &mut Transform, dir: Vec2, max_degrees: f32) {
    if dir == Vec2::ZERO {
        return;
    }
    let target = Quat::from_rotation_z(Vec2::Y.angle_to(dir));
    tf.rotation = tf.rotation.rotate_towards(target, max_degrees.to_radians());
}

/// Re-resolve the player for enemies that lost it.
pub fn acquire_pursuit_targets(
    mut q_enemies: Query<(&EnemyLife, &mut PursuitTarget), With<Enemy>>,
    q_player: Query<Entity, With<Player>>,
) {
    for (life, mut pursuit) in &mut q_enemies {
        if !life.is_alive() {
            continue;
        }
        let lost = pursuit.player.is_none_or(|p| !q_player.contains(p));
        if lost {
            pursuit.player = q_player.single().ok();
        }
    }
}

/// Pick swarm leaders.
///
/// Members rescan every [`SWARM_RESCAN_TICKS`] ticks, right after activation, and
/// on the tick after their leader stopped being a live peer.
pub fn rescan_swarms(
    clock: Res<SimClock>,
    q_peers: Query<(Entity, &Transform, &EnemyLife, Option<&PoolState>), With<SwarmBehavior>>,
    mut q_swarm: Query<(Entity, &mut SwarmBehavior)>,
    q_player: Query<&Transform, With<Player>>,
) {
    let player = q_player.single().ok().map(|tf| tf.translation.truncate());
    let distance_to_player = |pos: Vec2| player.map_or(f32::INFINITY, |p| pos.distance(p));

    let peers: Vec<(Entity, Vec2)> = q_peers
        .iter()
        .filter(|(_, _, life, state)| life.is_alive() && *state != Some(&PoolState::Queued))
        .map(|(e, tf, _, _)| (e, tf.translation.truncate()))
        .collect();
    let periodic = clock.tick % SWARM_RESCAN_TICKS == 0;

    for (me, mut swarm) in &mut q_swarm {
        let Some(&(_, my_pos)) = peers.iter().find(|(e, _)| *e == me) else {
            continue;
        };
        let leader_lost = swarm.leader.is_some_and(|l| !peers.iter().any(|(e, _)| *e == l));
        if !(periodic || swarm.needs_rescan || leader_lost) {
            continue;
        }

        let mut leader = me;
        let mut best = distance_to_player(my_pos);
        let mut nearby = 0;
        for &(other, pos) in &peers {
            if other == me || pos.distance(my_pos) > swarm.detection_range {
                continue;
            }
            nearby += 1;
            let d = distance_to_player(pos);
            if d < best {
                best = d;
                leader = other;
            }
        }

        swarm.leader = Some(leader);
        swarm.nearby = nearby;
        swarm.needs_rescan = false;
    }
}

pub fn steer_enemies(
    time: Res<Time<Fixed>>,
    mut q_enemies: Query<
        (
            Entity,
            &EnemyStats,
            &EnemyLife,
            &mut PursuitTarget,
            &mut Transform,
            &mut LinearVelocity,
            Option<&SwarmBehavior>,
            Option<&mut JumpAttack>,
        ),
        With<Enemy>,
    >,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
) {
    let dt = time.delta_secs();

    // Leaders are other enemies; snapshot positions before the mutable pass.
    let positions: HashMap<Entity, Vec2> = q_enemies
        .iter()
        .filter(|(_, _, life, ..)| life.is_alive())
        .map(|(e, _, _, _, tf, ..)| (e, tf.translation.truncate()))
        .collect();

    for (me, stats, life, mut pursuit, mut tf, mut vel, swarm, jump) in &mut q_enemies {
        if !life.is_alive() {
            continue;
        }
        let Some(player_pos) = pursuit
            .player
            .and_then(|p| q_player.get(p).ok())
            .map(|p| p.translation.truncate())
        else {
            pursuit.set_distance(None);
            vel.0 = Vec2::ZERO;
            continue;
        };

        let pos = tf.translation.truncate();
        let to_player = player_pos - pos;
        let distance = to_player.length();
        let dir = to_player.normalize_or_zero();
        pursuit.set_distance(Some(distance));
        let max_turn = stats.rotate_speed * dt;

        if let Some(mut jump) = jump {
            if jump.is_jumping() {
                vel.0 = jump.lunge();
                continue;
            }
            if jump.ready() && distance <= jump.range && dir != Vec2::ZERO {
                vel.0 = jump.launch(dir);
                continue;
            }
        }

        let leader_pos = swarm
            .and_then(|s| s.leader.filter(|&l| l != me))
            .and_then(|l| positions.get(&l).copied());
        if let (Some(swarm), Some(leader_pos)) = (swarm, leader_pos) {
            let to_leader = leader_pos - pos;
            if to_leader.length() > swarm.follow_distance {
                let dir = to_leader.normalize_or_zero();
                turn_towards(&mut tf, dir, max_turn);
                vel.0 = dir * stats.move_speed * SWARM_FOLLOW_SPEED;
                continue;
            }
        }

        if distance <= stats.detection_range && dir != Vec2::ZERO {
            turn_towards(&mut tf, dir, max_turn);
            vel.0 = dir * stats.move_speed;
        } else {
            vel.0 = Vec2::ZERO;
        }
    }
}
