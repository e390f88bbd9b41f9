//! Contact damage, death and recycling.
//!
//! Death only flips state and makes the body inert. The entity stays in the
//! world for [`RECYCLE_DELAY`] seconds, then goes back to its pool (or is
//! despawned when it was never pooled). The countdown lives in [`EnemyLife`],
//! which the blueprint overwrites on reactivation, so a countdown from a
//! previous life can never fire.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::{Layer, inert};
use crate::plugins::combat::{DamageRequest, Damageable, Health};
use crate::plugins::events::{GameEvent, PublishExt};
use crate::plugins::player::Player;
use crate::plugins::pool::{PoolAccess, Pooled};

use super::EnemyCensus;
use super::components::{Enemy, EnemyLife, EnemyStats, JumpAttack, RECYCLE_DELAY};

/// One `DamageRequest` per contact start between a live enemy and the player.
///
/// Sustained contact does not repeat damage; the player's invulnerability
/// window covers back-to-back contacts.
pub fn contact_damage(
    mut started: MessageReader<CollisionStart>,
    q_enemies: Query<(&EnemyStats, &EnemyLife, &Health), With<Enemy>>,
    q_player: Query<(), With<Player>>,
    mut damage: MessageWriter<DamageRequest>,
) {
    for ev in started.read() {
        let a = ev.body1.unwrap_or(ev.collider1);
        let b = ev.body2.unwrap_or(ev.collider2);
        let (enemy, player) = if q_player.contains(b) {
            (a, b)
        } else if q_player.contains(a) {
            (b, a)
        } else {
            continue;
        };
        let Ok((stats, life, hp)) = q_enemies.get(enemy) else {
            continue;
        };
        if !life.is_alive() || hp.is_dead() {
            continue;
        }
        damage.write(DamageRequest { target: player, amount: stats.contact_damage });
    }
}

pub fn tick_jump_timers(time: Res<Time<Fixed>>, mut q: Query<&mut JumpAttack>) {
    let dt = time.delta_secs();
    for mut jump in &mut q {
        jump.tick(dt);
    }
}

/// Alive → Dead once health reaches zero. Publishes `EnemyKilled` exactly once.
pub fn trigger_enemy_deaths(
    mut commands: Commands,
    mut q: Query<
        (&EnemyStats, &Health, &mut EnemyLife, &mut CollisionLayers, &mut LinearVelocity, &mut Sprite),
        With<Enemy>,
    >,
) {
    for (stats, hp, mut life, mut layers, mut vel, mut sprite) in &mut q {
        if !life.is_alive() || !hp.is_dead() {
            continue;
        }
        *life = EnemyLife::Dead { recycle_in: RECYCLE_DELAY };
        *layers = inert(Layer::Enemy);
        vel.0 = Vec2::ZERO;
        sprite.color = Color::srgba(0.6, 0.6, 0.6, 0.5);

        debug!("{} died", stats.name);
        commands.publish(GameEvent::EnemyKilled {
            enemy_name: stats.name.to_string(),
            score_value: stats.score_value,
        });
    }
}

/// Dead → Recycled after the delay: back to the pool, or despawned.
pub fn recycle_dead_enemies(
    time: Res<Time<Fixed>>,
    mut census: ResMut<EnemyCensus>,
    mut pool: PoolAccess,
    mut q: Query<(Entity, &mut EnemyLife, Option<&Pooled>), With<Enemy>>,
) {
    let dt = time.delta_secs();
    for (e, mut life, pooled) in &mut q {
        let EnemyLife::Dead { recycle_in } = &mut *life else {
            continue;
        };
        *recycle_in -= dt;
        if *recycle_in > 0.0 {
            continue;
        }

        *life = EnemyLife::Recycled;
        census.record_recycle();
        match pooled {
            Some(pooled) => {
                pool.release(pooled.blueprint, e);
            }
            None => {
                pool.commands.entity(e).try_despawn();
            }
        }
        debug!("enemy {e} recycled");
    }
}
