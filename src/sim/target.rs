//! Scoring sensor at the mouth of the glass

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::point_in_circle;
use crate::tuning::ArenaTuning;

/// Circular trigger region. Never takes part in collision response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetZone {
    pub center: Vec2,
    pub radius: f32,
}

impl TargetZone {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Zone for a glass scaled by the level's size multiplier
    pub fn for_glass(arena: &ArenaTuning, glass_size: f32) -> Self {
        let mouth_y = arena.glass_y - arena.glass_height * glass_size * 0.5;
        Self::new(
            Vec2::new(arena.glass_x, mouth_y),
            arena.target_radius * glass_size,
        )
    }

    /// True when the projectile centre is within the zone
    #[inline]
    pub fn contains(&self, position: Vec2) -> bool {
        point_in_circle(position, self.center, self.radius)
    }
}
