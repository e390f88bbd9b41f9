//! Attack strategies.
//!
//! A [`StrategyConfig`] is immutable and shared (`Arc`) between every weapon that
//! uses it. Anything that changes over time (cooldowns, orbit angle) lives on the
//! weapon entity instead.
//!
//! [`StrategyConfig::resolve`] is pure: it takes a snapshot of the owner and the
//! candidate targets and returns what the attack does. The weapon systems turn the
//! result into `DamageRequest`s and pool acquisitions.

use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::pool::BlueprintId;

use super::curve::LevelCurve;

/// Tolerance on the sector half-angle test, in degrees.
const SECTOR_ANGLE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct SectorParams {
    pub range: f32,
    /// Full cone angle, degrees.
    pub angle: f32,
}

/// When an orbit anchor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbitAdvance {
    /// Every fixed tick, so the anchor revolves at `speed` regardless of attack rate.
    #[default]
    Continuous,
    /// Only when the weapon fires, by `speed` times that tick's delta.
    PerAttack,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitParams {
    pub radius: f32,
    /// Degrees per second.
    pub speed: f32,
    /// Damage radius around the anchor.
    pub range: f32,
    pub advance: OrbitAdvance,
    pub visual: Option<BlueprintId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileParams {
    pub speed: f32,
    pub count: u32,
    /// Degrees between neighbouring projectiles.
    pub spread: f32,
    pub lifetime: f32,
    pub auto_aim: bool,
    pub aim_range: f32,
    /// Spawn distance ahead of the owner.
    pub muzzle_offset: f32,
    pub blueprint: Option<BlueprintId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaParams {
    pub radius: f32,
    pub duration: f32,
    pub ticks: u32,
    pub spawn_in_front: bool,
    pub spawn_distance: f32,
    pub blueprint: Option<BlueprintId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackStrategy {
    Sector(SectorParams),
    Orbiting(OrbitParams),
    Projectile(ProjectileParams),
    PersistentArea(AreaParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub name: String,
    pub base_damage: i32,
    /// Seconds between attacks at the curve's 1.0 point.
    pub base_rate: f32,
    pub damage_curve: LevelCurve,
    /// Must stay positive: the interval divides by it.
    pub rate_curve: LevelCurve,
    pub kind: AttackStrategy,
}

/// Where the attacker stands and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub forward: Vec2,
}

impl Pose {
    pub fn from_transform(tf: &Transform) -> Self {
        Self {
            position: tf.translation.truncate(),
            forward: (tf.rotation * Vec3::Y).truncate().normalize_or(Vec2::Y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSample {
    pub entity: Entity,
    pub position: Vec2,
}

pub struct AttackContext<'a> {
    pub owner: Pose,
    pub level: u32,
    /// Live damageable candidates, in scan order.
    pub targets: &'a [TargetSample],
    /// Current orbit anchor position, for orbiting weapons.
    pub orbit_anchor: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpawnOrder {
    Projectile {
        blueprint: BlueprintId,
        position: Vec2,
        velocity: Vec2,
        damage: i32,
        lifetime: f32,
    },
    Area {
        blueprint: BlueprintId,
        position: Vec2,
        radius: f32,
        damage: i32,
        duration: f32,
        ticks: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackOutcome {
    pub hits: Vec<(Entity, i32)>,
    pub spawns: Vec<SpawnOrder>,
}

impl StrategyConfig {
    fn with_kind(name: &str, kind: AttackStrategy) -> Self {
        Self {
            name: name.to_string(),
            base_damage: 10,
            base_rate: 1.0,
            damage_curve: LevelCurve::linear(0.0, 1.0, 7.0, 3.0),
            rate_curve: LevelCurve::linear(0.0, 1.0, 7.0, 1.5),
            kind,
        }
    }

    pub fn sector(t: &Tunables) -> Self {
        Self::with_kind(
            "Cleaver",
            AttackStrategy::Sector(SectorParams { range: t.meters(3.0), angle: 90.0 }),
        )
    }

    pub fn orbiting(t: &Tunables) -> Self {
        Self::with_kind(
            "Orbit Blade",
            AttackStrategy::Orbiting(OrbitParams {
                radius: t.meters(2.0),
                speed: 180.0,
                range: t.meters(1.5),
                advance: OrbitAdvance::Continuous,
                visual: Some(BlueprintId::ORBIT_BLADE),
            }),
        )
    }

    pub fn projectile(t: &Tunables) -> Self {
        Self::with_kind(
            "Blaster",
            AttackStrategy::Projectile(ProjectileParams {
                speed: t.meters(10.0),
                count: 1,
                spread: 30.0,
                lifetime: 3.0,
                auto_aim: false,
                aim_range: t.meters(10.0),
                muzzle_offset: t.meters(0.5),
                blueprint: Some(BlueprintId::PROJECTILE),
            }),
        )
    }

    pub fn persistent_area(t: &Tunables) -> Self {
        Self::with_kind(
            "Miasma",
            AttackStrategy::PersistentArea(AreaParams {
                radius: t.meters(2.0),
                duration: 3.0,
                ticks: 3,
                spawn_in_front: true,
                spawn_distance: t.meters(2.0),
                blueprint: Some(BlueprintId::AREA_EFFECT),
            }),
        )
    }

    /// `round(base_damage * damage_curve(level))`, never negative.
    pub fn base_damage(&self, level: u32) -> i32 {
        let scaled = self.base_damage as f32 * self.damage_curve.evaluate(level as f32);
        (scaled.round_ties_even() as i32).max(0)
    }

    /// Seconds between attacks (an interval, not a frequency).
    pub fn attack_rate(&self, level: u32) -> f32 {
        self.base_rate / self.rate_curve.evaluate(level as f32)
    }

    pub fn orbit(&self) -> Option<&OrbitParams> {
        match &self.kind {
            AttackStrategy::Orbiting(p) => Some(p),
            _ => None,
        }
    }

    pub fn resolve(&self, ctx: &AttackContext) -> AttackOutcome {
        let damage = self.base_damage(ctx.level);
        let mut out = AttackOutcome::default();

        match &self.kind {
            AttackStrategy::Sector(p) => {
                let half = p.angle * 0.5;
                out.hits = ctx
                    .targets
                    .iter()
                    .filter(|t| in_sector(ctx.owner, t.position, p.range, half))
                    .map(|t| (t.entity, damage))
                    .collect();
            }
            AttackStrategy::Orbiting(p) => {
                let center = ctx.orbit_anchor.unwrap_or(ctx.owner.position);
                out.hits = ctx
                    .targets
                    .iter()
                    .filter(|t| t.position.distance(center) <= p.range)
                    .map(|t| (t.entity, damage))
                    .collect();
            }
            AttackStrategy::Projectile(p) => {
                let Some(blueprint) = p.blueprint else {
                    return out;
                };
                let dir = if p.auto_aim {
                    nearest_target(ctx.owner.position, ctx.targets, p.aim_range)
                        .map(|t| (t.position - ctx.owner.position).normalize_or(ctx.owner.forward))
                        .unwrap_or(ctx.owner.forward)
                } else {
                    ctx.owner.forward
                };

                let total = p.spread * p.count.saturating_sub(1) as f32;
                let start = -total * 0.5;
                out.spawns = (0..p.count)
                    .map(|k| {
                        let heading = Vec2::from_angle((start + p.spread * k as f32).to_radians()).rotate(dir);
                        SpawnOrder::Projectile {
                            blueprint,
                            position: ctx.owner.position + heading * p.muzzle_offset,
                            velocity: heading * p.speed,
                            damage,
                            lifetime: p.lifetime,
                        }
                    })
                    .collect();
            }
            AttackStrategy::PersistentArea(p) => {
                let Some(blueprint) = p.blueprint else {
                    return out;
                };
                let position = if p.spawn_in_front {
                    ctx.owner.position + ctx.owner.forward * p.spawn_distance
                } else {
                    ctx.owner.position
                };
                out.spawns.push(SpawnOrder::Area {
                    blueprint,
                    position,
                    radius: p.radius,
                    damage,
                    duration: p.duration,
                    ticks: p.ticks,
                });
            }
        }
        out
    }
}

/// Inclusive on both the range and the half-angle boundary.
fn in_sector(owner: Pose, target: Vec2, range: f32, half_angle: f32) -> bool {
    let to_target = target - owner.position;
    if to_target.length() > range {
        return false;
    }
    if to_target.length_squared() <= f32::EPSILON {
        return true;
    }
    owner.forward.angle_to(to_target).abs().to_degrees() <= half_angle + SECTOR_ANGLE_EPSILON
}

/// First strictly-closest target within `range`; earlier samples win exact ties.
fn nearest_target(from: Vec2, targets: &[TargetSample], range: f32) -> Option<&TargetSample> {
    let mut best: Option<(&TargetSample, f32)> = None;
    for t in targets {
        let d = from.distance(t.position);
        if d > range {
            continue;
        }
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((t, d));
        }
    }
    best.map(|(t, _)| t)
}
