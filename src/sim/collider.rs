//! Static stage geometry
//!
//! The arena is rebuilt from the tuning table and the level configuration on
//! every level load. Colliders never move; the spinning light's rotation is
//! purely cosmetic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sdf::{sd_box, sd_circle};
use crate::levels::{LevelConfig, ObstacleKind};
use crate::tuning::Tuning;

/// Stage monitor footprint
pub const MONITOR_SIZE: Vec2 = Vec2::new(80.0, 60.0);
/// Amp stack footprint
pub const AMP_SIZE: Vec2 = Vec2::new(70.0, 100.0);
pub const LIGHT_RADIUS: f32 = 25.0;

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rect { center: Vec2, half_extents: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    pub fn rect(center: Vec2, size: Vec2) -> Self {
        Shape::Rect {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Signed distance from `p` to the shape surface
    #[inline]
    pub fn distance(&self, p: Vec2) -> f32 {
        match *self {
            Shape::Rect {
                center,
                half_extents,
            } => sd_box(p, center, half_extents),
            Shape::Circle { center, radius } => sd_circle(p, center, radius),
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Rect { center, .. } | Shape::Circle { center, .. } => center,
        }
    }

    /// Y coordinate of the topmost point
    pub fn top(&self) -> f32 {
        match *self {
            Shape::Rect {
                center,
                half_extents,
            } => center.y - half_extents.y,
            Shape::Circle { center, radius } => center.y - radius,
        }
    }
}

/// What a collider represents on stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderKind {
    StageFloor,
    LeftWall,
    RightWall,
    Glass,
    Obstacle(ObstacleKind),
}

/// A static, immovable body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCollider {
    pub kind: ColliderKind,
    pub shape: Shape,
    pub restitution: f32,
    /// Only blocks objects arriving from above
    pub one_way: bool,
}

impl StaticCollider {
    pub fn new(kind: ColliderKind, shape: Shape, restitution: f32) -> Self {
        Self {
            kind,
            shape,
            restitution,
            one_way: false,
        }
    }

    pub fn one_way(mut self) -> Self {
        self.one_way = true;
        self
    }
}

/// Build the collider list for a level
pub fn build_arena(tuning: &Tuning, level: &LevelConfig) -> Vec<StaticCollider> {
    let arena = &tuning.arena;
    let physics = &tuning.physics;
    let mut colliders = Vec::with_capacity(5 + level.obstacles.len());

    // Floor spans well past both edges so nothing slips around its ends
    colliders.push(
        StaticCollider::new(
            ColliderKind::StageFloor,
            Shape::rect(
                Vec2::new(arena.width * 0.5, arena.stage_y + arena.stage_thickness * 0.5),
                Vec2::new(arena.width * 3.0, arena.stage_thickness),
            ),
            physics.floor_restitution,
        )
        .one_way(),
    );

    // Walls sit just outside the playfield and extend above the open top
    let wall_size = Vec2::new(arena.wall_thickness, arena.height * 3.0);
    colliders.push(StaticCollider::new(
        ColliderKind::LeftWall,
        Shape::rect(Vec2::new(-arena.wall_thickness * 0.5, arena.height * 0.5), wall_size),
        physics.wall_restitution,
    ));
    colliders.push(StaticCollider::new(
        ColliderKind::RightWall,
        Shape::rect(
            Vec2::new(arena.width + arena.wall_thickness * 0.5, arena.height * 0.5),
            wall_size,
        ),
        physics.wall_restitution,
    ));

    // Cup walls span the full glass height around its centre
    let size = level.glass_size;
    let height = arena.glass_height * size;
    let offset = 0.4 * arena.glass_width * size;
    for side in [-1.0, 1.0] {
        colliders.push(StaticCollider::new(
            ColliderKind::Glass,
            Shape::rect(
                Vec2::new(arena.glass_x + side * offset, arena.glass_y),
                Vec2::new(arena.glass_wall_thickness, height),
            ),
            physics.glass_restitution,
        ));
    }

    for obstacle in &level.obstacles {
        let center = obstacle.position();
        let (shape, restitution) = match obstacle.kind {
            ObstacleKind::StageMonitor => {
                (Shape::rect(center, MONITOR_SIZE), physics.monitor_restitution)
            }
            ObstacleKind::AmpStack => (Shape::rect(center, AMP_SIZE), physics.amp_restitution),
            ObstacleKind::SpinningLight { .. } => (
                Shape::Circle {
                    center,
                    radius: LIGHT_RADIUS,
                },
                physics.light_restitution,
            ),
        };
        colliders.push(StaticCollider::new(
            ColliderKind::Obstacle(obstacle.kind),
            shape,
            restitution,
        ));
    }

    log::debug!(
        "Level {} arena: {} colliders",
        level.id,
        colliders.len()
    );
    colliders
}
