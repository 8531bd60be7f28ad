//! Collision detection and response for the projectile
//!
//! Discrete checks only: the ball is tested against every collider after it
//! has moved. Thin colliders can be tunneled at extreme speeds.

use glam::Vec2;

use super::collider::StaticCollider;
use super::sdf::sdf_gradient;

/// Slack when deciding whether the ball was above a one-way surface
const ONE_WAY_SLOP: f32 = 0.5;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a solid collider
pub fn ball_collider_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    collider: &StaticCollider,
) -> CollisionResult {
    let dist = collider.shape.distance(ball_pos);
    if dist >= ball_radius {
        return CollisionResult::miss();
    }

    let mut normal = sdf_gradient(ball_pos, |p| collider.shape.distance(p));
    if normal == Vec2::ZERO {
        // Centre sits exactly on a symmetry line inside the shape
        normal = (ball_pos - collider.shape.center()).normalize_or(Vec2::NEG_Y);
    }

    CollisionResult {
        hit: true,
        point: ball_pos - normal * dist,
        normal,
        penetration: ball_radius - dist,
    }
}

/// Check a ball against a one-way collider (solid from above only)
///
/// Responds only when the ball's bottom was at or above the top face on the
/// previous step and the ball is now moving down through it.
pub fn ball_one_way_collision(
    prev_pos: Vec2,
    ball_pos: Vec2,
    ball_vel: Vec2,
    ball_radius: f32,
    collider: &StaticCollider,
) -> CollisionResult {
    if ball_vel.y <= 0.0 {
        return CollisionResult::miss();
    }

    let top = collider.shape.top();
    if prev_pos.y + ball_radius > top + ONE_WAY_SLOP {
        return CollisionResult::miss();
    }

    let penetration = ball_pos.y + ball_radius - top;
    if penetration <= 0.0 {
        return CollisionResult::miss();
    }

    // Horizontal extent: the ball must overlap the surface footprint
    let footprint = collider.shape.distance(Vec2::new(ball_pos.x, top + 0.01));
    if footprint > ball_radius {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: Vec2::new(ball_pos.x, top),
        normal: Vec2::NEG_Y,
        penetration,
    }
}

/// Velocity after hitting a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResponse {
    pub velocity: Vec2,
    /// Speed along the normal at impact
    pub impact_speed: f32,
    /// False for resting contacts
    pub bounced: bool,
}

/// Reflect velocity off a surface, scaling the normal component
///
/// Standard reflection with restitution: v' = v - (1 + e)(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}

/// Resolve a contact: bounce, tangential friction, resting contacts
///
/// `friction` is the fraction of tangential speed removed this step.
pub fn resolve_contact(
    velocity: Vec2,
    normal: Vec2,
    restitution: f32,
    friction: f32,
    rest_speed: f32,
) -> ContactResponse {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        // Already separating
        return ContactResponse {
            velocity,
            impact_speed: 0.0,
            bounced: false,
        };
    }

    let impact_speed = -vn;
    let tangent = (velocity - vn * normal) * (1.0 - friction).clamp(0.0, 1.0);

    if impact_speed < rest_speed {
        return ContactResponse {
            velocity: tangent,
            impact_speed,
            bounced: false,
        };
    }

    let reflected = reflect_velocity(velocity, normal, restitution);
    let normal_part = reflected.dot(normal) * normal;
    ContactResponse {
        velocity: tangent + normal_part,
        impact_speed,
        bounced: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collider::{ColliderKind, Shape};

    fn floor() -> StaticCollider {
        StaticCollider::new(
            ColliderKind::StageFloor,
            Shape::rect(Vec2::new(600.0, 405.0), Vec2::new(3600.0, 10.0)),
            0.5,
        )
        .one_way()
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal, 1.0);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);

        let damped = reflect_velocity(velocity, normal, 0.5);
        assert!((damped.x - (-50.0)).abs() < 0.001);
    }

    #[test]
    fn test_circle_collision_normal_points_at_ball() {
        let light = StaticCollider::new(
            ColliderKind::Obstacle(crate::levels::ObstacleKind::SpinningLight { spin_speed: 2.0 }),
            Shape::Circle {
                center: Vec2::new(100.0, 100.0),
                radius: 25.0,
            },
            0.8,
        );
        let result = ball_collider_collision(Vec2::new(135.0, 100.0), 15.0, &light);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-3);
        assert!((result.penetration - 5.0).abs() < 1e-3);

        assert!(!ball_collider_collision(Vec2::new(141.0, 100.0), 15.0, &light).hit);
    }

    #[test]
    fn test_one_way_floor_catches_falling_ball() {
        let floor = floor();
        let result = ball_one_way_collision(
            Vec2::new(300.0, 383.0),
            Vec2::new(300.0, 389.0),
            Vec2::new(0.0, 700.0),
            15.0,
            &floor,
        );
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!((result.penetration - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_one_way_floor_passes_rising_ball() {
        let floor = floor();
        // Moving up through the floor
        let rising = ball_one_way_collision(
            Vec2::new(300.0, 420.0),
            Vec2::new(300.0, 400.0),
            Vec2::new(0.0, -900.0),
            15.0,
            &floor,
        );
        assert!(!rising.hit);

        // Apex inside the floor band, now falling: still below the top face
        let sinking = ball_one_way_collision(
            Vec2::new(300.0, 395.0),
            Vec2::new(300.0, 396.0),
            Vec2::new(0.0, 50.0),
            15.0,
            &floor,
        );
        assert!(!sinking.hit);
    }

    #[test]
    fn test_slow_contact_rests_without_bounce() {
        let response = resolve_contact(Vec2::new(40.0, 10.0), Vec2::NEG_Y, 0.5, 0.05, 30.0);
        assert!(!response.bounced);
        assert_eq!(response.velocity.y, 0.0);
        assert!((response.velocity.x - 38.0).abs() < 1e-4);
    }

    #[test]
    fn test_fast_contact_bounces_with_restitution() {
        let response = resolve_contact(Vec2::new(0.0, 400.0), Vec2::NEG_Y, 0.5, 0.05, 30.0);
        assert!(response.bounced);
        assert!((response.velocity.y + 200.0).abs() < 1e-3);
        assert!((response.impact_speed - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_separating_contact_untouched() {
        let v = Vec2::new(10.0, -300.0);
        let response = resolve_contact(v, Vec2::NEG_Y, 0.5, 0.05, 30.0);
        assert_eq!(response.velocity, v);
        assert!(!response.bounced);
    }
}
