//! Enemy data: stats, life state and the optional swarm/jump capabilities.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::Tunables;
use crate::plugins::combat::{Health, Hostile};
use crate::plugins::pool::Blueprint;

/// Seconds between death and return to the pool.
pub const RECYCLE_DELAY: f32 = 2.0;
/// Seconds a jump lunge lasts.
pub const JUMP_DURATION: f32 = 1.0;
/// Swarm members rescan their peers every this many ticks.
pub const SWARM_RESCAN_TICKS: u64 = 60;
/// Speed factor applied while following a swarm leader.
pub const SWARM_FOLLOW_SPEED: f32 = 0.7;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Per-kind tuning. Lengths and speeds are in pixels.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct EnemyStats {
    pub name: &'static str,
    pub max_health: f32,
    pub move_speed: f32,
    /// Degrees per second.
    pub rotate_speed: f32,
    pub detection_range: f32,
    pub contact_damage: f32,
    pub score_value: u32,
    pub radius: f32,
}

impl EnemyStats {
    pub fn grunt(t: &Tunables) -> Self {
        Self {
            name: "Grunt",
            max_health: 100.0,
            move_speed: t.meters(3.0),
            rotate_speed: 180.0,
            detection_range: t.meters(20.0),
            contact_damage: 10.0,
            score_value: 10,
            radius: 14.0,
        }
    }

    /// Faster, frailer and weaker than a grunt.
    pub fn minion(t: &Tunables) -> Self {
        Self {
            name: "Minion",
            max_health: 30.0,
            move_speed: t.meters(4.5),
            rotate_speed: 250.0,
            detection_range: t.meters(15.0),
            contact_damage: 5.0,
            score_value: 5,
            radius: 10.0,
        }
    }

    pub fn set_move_speed(&mut self, speed: f32) {
        self.move_speed = speed.max(0.0);
    }

    pub fn set_damage(&mut self, damage: f32) {
        self.contact_damage = damage.max(0.0);
    }
}

/// Alive → Dead → Recycled. Reactivation through the pool starts over at `Alive`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum EnemyLife {
    #[default]
    Alive,
    Dead {
        recycle_in: f32,
    },
    Recycled,
}

impl EnemyLife {
    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// The player this enemy chases, re-resolved whenever it is lost.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct PursuitTarget {
    pub player: Option<Entity>,
    distance: Option<f32>,
}

impl PursuitTarget {
    /// Distance measured on the last movement tick; `None` without a player.
    pub fn distance_to_player(&self) -> Option<f32> {
        self.distance
    }

    pub(crate) fn set_distance(&mut self, distance: Option<f32>) {
        self.distance = distance;
    }
}

/// Follow whichever nearby peer is closest to the player.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SwarmBehavior {
    pub detection_range: f32,
    pub follow_distance: f32,
    pub(crate) leader: Option<Entity>,
    pub(crate) nearby: usize,
    pub(crate) needs_rescan: bool,
}

impl SwarmBehavior {
    pub fn new(t: &Tunables) -> Self {
        Self {
            detection_range: t.meters(8.0),
            follow_distance: t.meters(3.0),
            leader: None,
            nearby: 0,
            needs_rescan: true,
        }
    }

    pub fn leader(&self) -> Option<Entity> {
        self.leader
    }

    pub fn is_leader(&self, me: Entity) -> bool {
        self.leader == Some(me)
    }

    /// Live peers found by the last scan, not counting itself.
    pub fn nearby_count(&self) -> usize {
        self.nearby
    }
}

/// Periodic lunge at a close player.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct JumpAttack {
    pub cooldown: f32,
    pub range: f32,
    /// Lunge speed, pixels per second.
    pub force: f32,
    pub(crate) cooldown_remaining: f32,
    pub(crate) jump_remaining: f32,
    pub(crate) lunge: Vec2,
}

impl JumpAttack {
    pub fn new(t: &Tunables) -> Self {
        Self {
            cooldown: 3.0,
            range: t.meters(5.0),
            force: t.meters(5.0),
            cooldown_remaining: 0.0,
            jump_remaining: 0.0,
            lunge: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jump_remaining > 0.0
    }

    #[inline]
    pub fn ready(&self) -> bool {
        !self.is_jumping() && self.cooldown_remaining <= 0.0
    }

    /// Start a lunge along `dir` (normalized). Returns the lunge velocity.
    pub fn launch(&mut self, dir: Vec2) -> Vec2 {
        self.cooldown_remaining = self.cooldown;
        self.jump_remaining = JUMP_DURATION;
        self.lunge = dir * self.force;
        self.lunge
    }

    #[inline]
    pub fn lunge(&self) -> Vec2 {
        self.lunge
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        if self.jump_remaining > 0.0 {
            self.jump_remaining = (self.jump_remaining - dt).max(0.0);
            if self.jump_remaining == 0.0 {
                self.lunge = Vec2::ZERO;
            }
        }
    }
}

pub fn active_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Enemy,
        [Layer::World, Layer::Player, Layer::Enemy, Layer::PlayerProjectile],
    )
}

fn base_components(stats: &EnemyStats, color: Color) -> impl Bundle {
    (
        Enemy,
        Hostile,
        stats.clone(),
        Health::full(stats.max_health),
        EnemyLife::Alive,
        PursuitTarget::default(),
        Sprite {
            color,
            custom_size: Some(Vec2::splat(stats.radius * 2.0)),
            ..default()
        },
        RigidBody::Dynamic,
        Collider::circle(stats.radius),
        LockedAxes::ROTATION_LOCKED,
        active_enemy_layers(),
        CollisionEventsEnabled,
        LinearVelocity::ZERO,
    )
}

/// Plain pursuer.
pub fn grunt_blueprint(t: &Tunables) -> Blueprint {
    let stats = EnemyStats::grunt(t);
    Blueprint::new("Grunt", 1.0, move |ec| {
        ec.insert(base_components(&stats, Color::srgb(0.9, 0.25, 0.25)));
    })
}

/// Pursuer with swarm following and a jump attack.
pub fn minion_blueprint(t: &Tunables) -> Blueprint {
    let stats = EnemyStats::minion(t);
    let swarm = SwarmBehavior::new(t);
    let jump = JumpAttack::new(t);
    Blueprint::new("Minion", 1.0, move |ec| {
        ec.insert((
            base_components(&stats, Color::srgb(0.95, 0.55, 0.2)),
            swarm.clone(),
            jump.clone(),
        ));
    })
}
