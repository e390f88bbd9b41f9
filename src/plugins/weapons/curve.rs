//! Level → multiplier curves.

use bevy::math::FloatExt;
use bevy::prelude::*;

/// Piecewise-linear curve over weapon level, clamped outside its keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCurve {
    /// (level, value), sorted by level.
    keys: Vec<Vec2>,
}

impl LevelCurve {
    pub fn linear(level_start: f32, value_start: f32, level_end: f32, value_end: f32) -> Self {
        Self::from_keys([Vec2::new(level_start, value_start), Vec2::new(level_end, value_end)])
    }

    pub fn constant(value: f32) -> Self {
        Self { keys: vec![Vec2::new(0.0, value)] }
    }

    pub fn from_keys(keys: impl IntoIterator<Item = Vec2>) -> Self {
        let mut keys: Vec<Vec2> = keys.into_iter().collect();
        keys.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { keys }
    }

    pub fn evaluate(&self, level: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        if level <= first.x {
            return first.y;
        }
        if level >= last.x {
            return last.y;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if level <= b.x {
                let span = (b.x - a.x).max(f32::EPSILON);
                return a.y.lerp(b.y, (level - a.x) / span);
            }
        }
        last.y
    }
}
