//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host can override them from JSON
//! without rebuilding. Units are playfield pixels and seconds; values first
//! tuned per frame at 60 fps are converted where noted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors from loading configuration tables
#[derive(Debug)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types
    Parse(serde_json::Error),
    /// Structurally valid JSON with unusable values
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Drag-to-throw mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowTuning {
    /// Minimum smoothed drag (px) that counts as a throw
    pub min_drag_distance: f32,
    /// Drag length (px) at which force saturates
    pub max_drag_distance: f32,
    pub min_force: f32,
    pub max_force: f32,
    /// Exponent > 1 makes short drags weaker than linear
    pub power_curve: f32,
    /// Launch velocity (px/s) per pixel of smoothed drag
    pub velocity_scale: f32,
}

impl Default for ThrowTuning {
    fn default() -> Self {
        Self {
            min_drag_distance: 30.0,
            max_drag_distance: 250.0,
            min_force: 6.0,
            max_force: 20.0,
            power_curve: 1.2,
            // 0.12 px/frame per px of drag at 60 fps
            velocity_scale: 0.12 * REFERENCE_HZ,
        }
    }
}

/// Projectile integration and contact response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Multiplicative velocity damping per second
    pub air_drag: f32,
    pub ball_radius: f32,
    /// Below this speed (px/s) the ball counts as at rest
    pub stop_speed: f32,
    /// Seconds the ball must stay at rest before the flight resolves
    pub settle_time: f32,
    /// Impacts slower than this (px/s along the normal) are resting contacts
    pub rest_speed: f32,
    /// Tangential damping per second while in contact
    pub contact_friction: f32,
    pub floor_restitution: f32,
    pub wall_restitution: f32,
    pub glass_restitution: f32,
    pub monitor_restitution: f32,
    pub amp_restitution: f32,
    pub light_restitution: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            // 0.008 per frame at 60 fps
            air_drag: 0.008 * REFERENCE_HZ,
            ball_radius: BALL_RADIUS,
            // 0.1 px/frame at 60 fps
            stop_speed: 0.1 * REFERENCE_HZ,
            settle_time: 0.25,
            rest_speed: 30.0,
            contact_friction: 6.0,
            floor_restitution: 0.5,
            wall_restitution: 0.5,
            glass_restitution: 0.3,
            monitor_restitution: 0.4,
            amp_restitution: 0.6,
            light_restitution: 0.8,
        }
    }
}

/// Stage layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
    pub stage_y: f32,
    pub stage_thickness: f32,
    pub wall_thickness: f32,
    /// Where every throw starts
    pub launch_x: f32,
    pub launch_y: f32,
    pub glass_x: f32,
    /// Centre of the glass; the mouth is half a glass height above
    pub glass_y: f32,
    pub glass_width: f32,
    pub glass_height: f32,
    pub glass_wall_thickness: f32,
    pub target_radius: f32,
    /// Distance past the left/right/bottom edge before a ball is out
    pub out_of_bounds_margin: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            stage_y: STAGE_Y,
            stage_thickness: 10.0,
            wall_thickness: 50.0,
            launch_x: BALL_START_X,
            launch_y: BALL_START_Y,
            glass_x: GLASS_X,
            glass_y: GLASS_Y,
            glass_width: GLASS_WIDTH,
            glass_height: GLASS_HEIGHT,
            glass_wall_thickness: 6.0,
            target_radius: TARGET_ZONE_RADIUS,
            out_of_bounds_margin: 50.0,
        }
    }
}

/// Points and shot pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub successful_shot: u64,
    pub no_bounce_bonus: u64,
    pub bank_shot_bonus: u64,
    pub trick_shot_bonus: u64,
    /// Level-complete bonus when fewer than `efficient_threshold` balls were used
    pub efficient_bonus: u64,
    pub efficient_threshold: u32,
    /// Multipliers for consecutive hits (clamped at the last entry)
    pub combo_multipliers: Vec<f32>,
    /// Seconds before the next throw after a hit / a miss
    pub hit_grace: f32,
    pub miss_grace: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            successful_shot: 100,
            no_bounce_bonus: 50,
            bank_shot_bonus: 25,
            trick_shot_bonus: 100,
            efficient_bonus: 100,
            efficient_threshold: 5,
            combo_multipliers: vec![1.0, 1.5, 2.0, 3.0],
            hit_grace: 1.0,
            miss_grace: 0.0,
        }
    }
}

/// Crowd bump schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdTuning {
    pub enabled: bool,
    /// Seconds between bumps before the level multiplier
    pub base_interval: f32,
    /// Random ± spread on the interval
    pub variance: f32,
    /// How long a bump disturbs throws
    pub duration: f32,
    /// Full-strength per-axis velocity offset (px/s)
    pub max_offset: f32,
    pub base_strength: f32,
}

impl Default for CrowdTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            base_interval: 5.0,
            variance: 2.0,
            duration: 0.5,
            // ±4 px/frame at 60 fps
            max_offset: 4.0 * REFERENCE_HZ,
            base_strength: 0.3,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub throw: ThrowTuning,
    pub physics: PhysicsTuning,
    pub arena: ArenaTuning,
    pub scoring: ScoringTuning,
    pub crowd: CrowdTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning table; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.combo_multipliers.is_empty() {
            return Err(ConfigError::Invalid("combo_multipliers is empty".into()));
        }
        if self.throw.max_drag_distance <= 0.0 {
            return Err(ConfigError::Invalid("max_drag_distance must be positive".into()));
        }
        if self.throw.power_curve <= 0.0 {
            return Err(ConfigError::Invalid("power_curve must be positive".into()));
        }
        if self.throw.max_force <= 0.0 {
            return Err(ConfigError::Invalid("max_force must be positive".into()));
        }
        if self.throw.min_force > self.throw.max_force {
            return Err(ConfigError::Invalid("min_force exceeds max_force".into()));
        }
        if self.physics.ball_radius <= 0.0 {
            return Err(ConfigError::Invalid("ball_radius must be positive".into()));
        }
        Ok(())
    }
}
