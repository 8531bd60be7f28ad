//! Glass Toss - flick a ball from the crowd into the drummer's glass
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gesture, launch, physics, scoring, game state)
//! - `levels`: Level table and lookup
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod levels;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use levels::{LevelConfig, LevelTable, ObstacleKind, ObstacleSpec};
pub use settings::{Settings, SmoothingMode};
pub use sim::{Game, GameEvent, GamePhase, TickInput, tick};
pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 1200.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Ball defaults - thrown from the audience at the bottom centre
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_START_X: f32 = PLAYFIELD_WIDTH / 2.0;
    pub const BALL_START_Y: f32 = PLAYFIELD_HEIGHT - 50.0;

    /// Stage floor line (top face)
    pub const STAGE_Y: f32 = 400.0;

    /// Glass on the drum kit (base position, unscaled size)
    pub const GLASS_X: f32 = 1000.0;
    pub const GLASS_Y: f32 = 310.0;
    pub const GLASS_WIDTH: f32 = 90.0;
    pub const GLASS_HEIGHT: f32 = 120.0;
    /// Scoring radius around the glass mouth at size multiplier 1.0
    pub const TARGET_ZONE_RADIUS: f32 = 70.0;

    /// Frame rate the per-frame balance values were tuned at
    pub const REFERENCE_HZ: f32 = 60.0;
}

/// Linear interpolation between `start` and `end`
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// True if `point` lies inside (or on) the circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) <= radius
}

/// Convert seconds to whole simulation ticks (rounded up, so a grace period
/// never ends early)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    if secs <= 0.0 {
        0
    } else {
        (secs / consts::SIM_DT).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_point_in_circle_edge() {
        let c = Vec2::new(10.0, 10.0);
        assert!(point_in_circle(Vec2::new(13.0, 14.0), c, 5.0));
        assert!(!point_in_circle(Vec2::new(13.0, 14.1), c, 5.0));
    }

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(0.0), 0);
        assert_eq!(secs_to_ticks(1.0), 120);
        assert_eq!(secs_to_ticks(0.001), 1);
    }
}
