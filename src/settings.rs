//! Player preferences
//!
//! Kept in memory for the session; the host may hand in a JSON blob.

use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_HZ;
use crate::tuning::ConfigError;

/// How the drag vector is low-pass filtered between pointer-move events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Fixed blend per event: feel depends on the input sampling rate
    PerEvent { factor: f32 },
    /// Blend scaled by the time between events, matching `PerEvent` at
    /// `reference_hz`
    TimeNormalized { factor: f32, reference_hz: f32 },
}

impl Default for SmoothingMode {
    fn default() -> Self {
        SmoothingMode::PerEvent { factor: 0.15 }
    }
}

impl SmoothingMode {
    /// Time-normalized variant with the same feel at 60 events per second
    pub fn time_normalized() -> Self {
        SmoothingMode::TimeNormalized {
            factor: 0.15,
            reference_hz: REFERENCE_HZ,
        }
    }

    /// Blend weight for an event arriving `dt` seconds after the previous one
    pub fn alpha(&self, dt: f32) -> f32 {
        match *self {
            SmoothingMode::PerEvent { factor } => factor.clamp(0.0, 1.0),
            SmoothingMode::TimeNormalized {
                factor,
                reference_hz,
            } => {
                let factor = factor.clamp(0.0, 1.0);
                let frames = (dt.max(0.0) * reference_hz).max(0.0);
                1.0 - (1.0 - factor).powf(frames)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SmoothingMode::PerEvent { .. } => "per-event",
            SmoothingMode::TimeNormalized { .. } => "time-normalized",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gesture smoothing filter
    pub smoothing: SmoothingMode,
    /// Emit predicted flight points with aim feedback
    pub trajectory_preview: bool,
    /// Number of preview points
    pub preview_points: usize,
    /// Seconds of flight covered by the preview
    pub preview_horizon: f32,
    /// Pause automatically when the page is hidden or loses focus
    pub auto_pause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            smoothing: SmoothingMode::default(),
            trajectory_preview: true,
            preview_points: 15,
            preview_horizon: 1.5,
            auto_pause: true,
        }
    }
}

impl Settings {
    /// Parse settings; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        log::info!("Using {} smoothing", settings.smoothing.as_str());
        Ok(settings)
    }

    /// Effective preview point count (0 when the preview is off)
    pub fn preview_count(&self) -> usize {
        if self.trajectory_preview {
            self.preview_points
        } else {
            0
        }
    }
}
