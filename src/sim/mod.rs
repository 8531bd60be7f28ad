//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collider;
pub mod collision;
pub mod crowd;
pub mod gesture;
pub mod launch;
pub mod scoring;
pub mod sdf;
pub mod state;
pub mod target;
pub mod tick;
pub mod world;

pub use collider::{ColliderKind, Shape, StaticCollider, build_arena};
pub use collision::{CollisionResult, reflect_velocity, resolve_contact};
pub use crowd::CrowdBump;
pub use gesture::{DragGesture, GestureTracker};
pub use launch::{LaunchMapper, LaunchParameters};
pub use scoring::{ShotBonus, ShotOutcome, ShotRecord};
pub use state::{
    AimFeedback, FrameSnapshot, GameEvent, GameOverSummary, GamePhase, HudSnapshot, LevelSummary,
    ProjectileView, SessionState, ShotPhase, ThrowRejected,
};
pub use target::TargetZone;
pub use tick::{Game, ThrowAttempt, TickInput, tick};
pub use world::{Bounce, FlightResolution, Projectile, Simulator, StepReport};
