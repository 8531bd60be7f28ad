//! Drag vector to launch velocity and force

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::tuning::ThrowTuning;

/// Power ring radius at zero force
const RING_BASE_RADIUS: f32 = 15.0;
/// Additional ring radius at full force
const RING_RANGE: f32 = 25.0;

/// Everything needed to start a flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    /// Initial velocity (px/s), same direction as the drag
    pub velocity: Vec2,
    /// Power level in `[min_force, max_force]`
    pub force: f32,
}

/// Maps a smoothed drag vector to launch parameters
#[derive(Debug, Clone)]
pub struct LaunchMapper {
    tuning: ThrowTuning,
}

impl LaunchMapper {
    pub fn new(tuning: ThrowTuning) -> Self {
        Self { tuning }
    }

    /// Power curve: monotonic in distance, saturating at `max_drag_distance`
    pub fn force_for_distance(&self, distance: f32) -> f32 {
        let t = &self.tuning;
        let clamped = distance.clamp(0.0, t.max_drag_distance);
        let normalized = clamped / t.max_drag_distance;
        let curved = normalized.powf(t.power_curve);
        lerp(t.min_force, t.max_force, curved)
    }

    pub fn map(&self, smoothed: Vec2) -> LaunchParameters {
        LaunchParameters {
            velocity: smoothed * self.tuning.velocity_scale,
            force: self.force_for_distance(smoothed.length()),
        }
    }

    /// Radius of the aim power ring for a force value
    pub fn ring_radius(&self, force: f32) -> f32 {
        RING_BASE_RADIUS + RING_RANGE * (force / self.tuning.max_force).clamp(0.0, 1.0)
    }
}
