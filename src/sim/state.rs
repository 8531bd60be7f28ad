//! Game state and core simulation types
//!
//! Session counters, phases and everything the host receives from the outbox.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::StaticCollider;
use super::scoring::ShotRecord;
use super::target::TargetZone;
use super::world::Bounce;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Goal reached, waiting for next level / restart
    LevelComplete,
    /// Out of balls before the goal
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::LevelComplete => "level_complete",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Per-shot state inside `Playing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPhase {
    /// A throw may be made
    Ready,
    /// Projectile active; remembers whether it was thrown during a crowd bump
    InFlight { crowd_bump: bool },
    /// Shot scored, next throw blocked for the grace period (ticks)
    Resolved { grace_ticks: u32 },
}

/// Why a throw was not accepted. No state is changed by a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowRejected {
    NotPlaying,
    NoBallsRemaining,
    /// Inside the post-shot grace period
    Cooldown,
    ProjectileInFlight,
}

impl fmt::Display for ThrowRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThrowRejected::NotPlaying => write!(f, "game is not in play"),
            ThrowRejected::NoBallsRemaining => write!(f, "no balls remaining"),
            ThrowRejected::Cooldown => write!(f, "previous shot still settling"),
            ThrowRejected::ProjectileInFlight => write!(f, "a ball is already in flight"),
        }
    }
}

impl std::error::Error for ThrowRejected {}

/// Counters for one level attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub balls_remaining: u32,
    pub starting_balls: u32,
    pub shots_made: u32,
    pub goal_shots: u32,
    pub combo_streak: u32,
    pub score: u64,
}

impl SessionState {
    pub fn new(starting_balls: u32, goal_shots: u32) -> Self {
        Self {
            balls_remaining: starting_balls,
            starting_balls,
            shots_made: 0,
            goal_shots,
            combo_streak: 0,
            score: 0,
        }
    }

    pub fn balls_used(&self) -> u32 {
        self.starting_balls.saturating_sub(self.balls_remaining)
    }

    pub fn goal_reached(&self) -> bool {
        self.shots_made >= self.goal_shots
    }

    /// No balls left and the goal still open
    pub fn out_of_balls(&self) -> bool {
        self.balls_remaining == 0 && !self.goal_reached()
    }
}

/// HUD counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub level: u32,
    pub balls_remaining: u32,
    pub starting_balls: u32,
    pub shots_made: u32,
    pub goal_shots: u32,
    pub combo_streak: u32,
    pub score: u64,
    pub run_score: u64,
}

/// Shown when a level is cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u32,
    pub name: String,
    pub score: u64,
    pub balls_used: u32,
    pub efficiency_bonus: u64,
    /// Run total including this level
    pub run_score: u64,
    pub has_next_level: bool,
}

/// Shown when the player runs out of balls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub level: u32,
    pub score: u64,
    pub shots_made: u32,
    pub goal_shots: u32,
    pub run_score: u64,
}

/// Aim arrow, power ring and optional predicted path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimFeedback {
    pub origin: Vec2,
    pub vector: Vec2,
    pub force: f32,
    pub ring_radius: f32,
    pub preview: Vec<Vec2>,
}

/// Outbox events for the presentation layer (fire-and-forget)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GameEvent {
    StateChanged {
        from: GamePhase,
        to: GamePhase,
    },
    LevelLoaded {
        level: u32,
        name: String,
        description: String,
        tutorial: bool,
        colliders: Vec<StaticCollider>,
        target: TargetZone,
    },
    AimUpdated(AimFeedback),
    AimCleared,
    ThrowAccepted {
        velocity: Vec2,
        force: f32,
        crowd_bump: bool,
    },
    Bounce(Bounce),
    ShotResolved(ShotRecord),
    Hud(HudSnapshot),
    LevelComplete(LevelSummary),
    GameOver(GameOverSummary),
    GameComplete {
        final_score: u64,
    },
    CrowdBump {
        offset: Vec2,
    },
    ThrowReady,
}

/// Projectile pose for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec2,
    pub rotation: f32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub projectile: Option<ProjectileView>,
    pub crowd_bump_active: bool,
    pub hud: HudSnapshot,
}
