//! Signed distance functions for the static stage geometry
//!
//! Distances are negative inside a shape. Normals come from the SDF gradient.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box
#[inline]
pub fn sd_box(p: Vec2, center: Vec2, half_extents: Vec2) -> f32 {
    let d = (p - center).abs() - half_extents;
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Compute SDF gradient (surface normal) using central differences
pub fn sdf_gradient<F>(p: Vec2, sdf: F) -> Vec2
where
    F: Fn(Vec2) -> f32,
{
    let eps = 0.5;
    let dx = sdf(p + Vec2::new(eps, 0.0)) - sdf(p - Vec2::new(eps, 0.0));
    let dy = sdf(p + Vec2::new(0.0, eps)) - sdf(p - Vec2::new(0.0, eps));
    Vec2::new(dx, dy).normalize_or_zero()
}
