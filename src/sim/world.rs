//! Rigid-body simulation of the single projectile
//!
//! One active ball at a time against static colliders. The caller drives
//! `step` at a fixed timestep and reacts to the returned report.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::{ColliderKind, StaticCollider};
use super::collision::{ball_collider_collision, ball_one_way_collision, resolve_contact};
use super::state::ThrowRejected;
use super::target::TargetZone;
use crate::tuning::{ArenaTuning, PhysicsTuning};

/// The ball in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Rolling angle (radians), cosmetic
    pub rotation: f32,
    pub bounce_count: u32,
    pub has_scored: bool,
    pub is_active: bool,
    /// Seconds spent below the stop speed
    pub rest_time: f32,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            rotation: 0.0,
            bounce_count: 0,
            has_scored: false,
            is_active: true,
            rest_time: 0.0,
        }
    }
}

/// How a flight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightResolution {
    /// Entered the target zone
    Scored,
    /// Came to rest without scoring
    Stopped,
    /// Left the playfield
    OutOfBounds,
}

/// A counted impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounce {
    pub kind: ColliderKind,
    pub point: Vec2,
    pub impact_speed: f32,
}

/// What happened during one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub bounces: Vec<Bounce>,
    pub resolution: Option<FlightResolution>,
}

/// Playfield bounds for the out-of-bounds check (top is open)
#[derive(Debug, Clone, Copy)]
struct Bounds {
    width: f32,
    height: f32,
    margin: f32,
}

impl Bounds {
    fn contains(&self, p: Vec2) -> bool {
        p.x >= -self.margin && p.x <= self.width + self.margin && p.y <= self.height + self.margin
    }
}

/// Single-projectile physics world
#[derive(Debug, Clone)]
pub struct Simulator {
    physics: PhysicsTuning,
    bounds: Bounds,
    colliders: Vec<StaticCollider>,
    target: TargetZone,
    projectile: Option<Projectile>,
}

impl Simulator {
    pub fn new(physics: PhysicsTuning, arena: &ArenaTuning) -> Self {
        Self {
            physics,
            bounds: Bounds {
                width: arena.width,
                height: arena.height,
                margin: arena.out_of_bounds_margin,
            },
            colliders: Vec::new(),
            target: TargetZone::for_glass(arena, 1.0),
            projectile: None,
        }
    }

    /// Replace the static geometry and target (level load)
    pub fn rebuild(&mut self, colliders: Vec<StaticCollider>, target: TargetZone) {
        self.colliders = colliders;
        self.target = target;
        self.projectile = None;
    }

    pub fn colliders(&self) -> &[StaticCollider] {
        &self.colliders
    }

    pub fn target(&self) -> &TargetZone {
        &self.target
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.projectile.as_ref().is_some_and(|p| p.is_active)
    }

    /// Remove any projectile (menu, restart)
    pub fn clear(&mut self) {
        self.projectile = None;
    }

    /// Start a flight. Never queued: an active projectile rejects the launch.
    pub fn launch(&mut self, origin: Vec2, velocity: Vec2) -> Result<(), ThrowRejected> {
        if self.is_active() {
            return Err(ThrowRejected::ProjectileInFlight);
        }
        self.projectile = Some(Projectile::new(origin, velocity, self.physics.ball_radius));
        Ok(())
    }

    /// Gravity then drag for one step
    #[inline]
    fn integrate_forces(physics: &PhysicsTuning, velocity: Vec2, dt: f32) -> Vec2 {
        let mut v = velocity;
        v.y += physics.gravity * dt;
        v * (1.0 - physics.air_drag * dt).max(0.0)
    }

    /// Advance the projectile by one fixed step
    pub fn step(&mut self, dt: f32) -> StepReport {
        let mut report = StepReport::default();
        let physics = &self.physics;
        let Some(ball) = self.projectile.as_mut().filter(|p| p.is_active) else {
            return report;
        };

        let prev_pos = ball.position;
        ball.velocity = Self::integrate_forces(physics, ball.velocity, dt);
        ball.position += ball.velocity * dt;
        ball.rotation += ball.velocity.x / ball.radius * dt;

        // Scoring wins over any contact this step
        if self.target.contains(ball.position) {
            ball.has_scored = true;
            ball.is_active = false;
            report.resolution = Some(FlightResolution::Scored);
            return report;
        }

        let friction = physics.contact_friction * dt;
        for collider in &self.colliders {
            let contact = if collider.one_way {
                ball_one_way_collision(prev_pos, ball.position, ball.velocity, ball.radius, collider)
            } else {
                ball_collider_collision(ball.position, ball.radius, collider)
            };
            if !contact.hit {
                continue;
            }

            ball.position += contact.normal * contact.penetration;
            let response = resolve_contact(
                ball.velocity,
                contact.normal,
                collider.restitution,
                friction,
                physics.rest_speed,
            );
            ball.velocity = response.velocity;
            if response.bounced {
                ball.bounce_count += 1;
                report.bounces.push(Bounce {
                    kind: collider.kind,
                    point: contact.point,
                    impact_speed: response.impact_speed,
                });
            }
        }

        if !self.bounds.contains(ball.position) {
            ball.is_active = false;
            report.resolution = Some(FlightResolution::OutOfBounds);
            return report;
        }

        if ball.velocity.length() < physics.stop_speed {
            ball.rest_time += dt;
        } else {
            ball.rest_time = 0.0;
        }
        if ball.rest_time >= physics.settle_time {
            ball.is_active = false;
            report.resolution = Some(FlightResolution::Stopped);
        }

        report
    }

    /// Predicted flight path under gravity and drag (no collisions)
    pub fn preview_trajectory(
        &self,
        origin: Vec2,
        velocity: Vec2,
        points: usize,
        horizon: f32,
    ) -> Vec<Vec2> {
        if points == 0 || horizon <= 0.0 {
            return Vec::new();
        }

        let dt = crate::consts::SIM_DT;
        let total_steps = (horizon / dt).ceil() as usize;
        let stride = (total_steps / points).max(1);

        let mut out = Vec::with_capacity(points);
        let mut pos = origin;
        let mut vel = velocity;
        for step in 1..=total_steps {
            vel = Self::integrate_forces(&self.physics, vel, dt);
            pos += vel * dt;
            if step % stride == 0 {
                out.push(pos);
                if out.len() == points {
                    break;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::levels::LevelTable;
    use crate::sim::collider::build_arena;
    use crate::tuning::Tuning;

    fn world(tuning: &Tuning, glass_x: f32) -> Simulator {
        let mut tuning = tuning.clone();
        tuning.arena.glass_x = glass_x;
        let level = LevelTable::builtin().get(1).clone();
        let mut sim = Simulator::new(tuning.physics.clone(), &tuning.arena);
        sim.rebuild(
            build_arena(&tuning, &level),
            TargetZone::for_glass(&tuning.arena, level.glass_size),
        );
        sim
    }

    fn run(sim: &mut Simulator, max_steps: usize) -> (Option<FlightResolution>, u32) {
        let mut bounces = 0;
        for _ in 0..max_steps {
            let report = sim.step(SIM_DT);
            bounces += report.bounces.len() as u32;
            if report.resolution.is_some() {
                return (report.resolution, bounces);
            }
        }
        (None, bounces)
    }

    #[test]
    fn test_straight_up_throw_scores_without_bounce() {
        let tuning = Tuning::default();
        let mut sim = world(&tuning, 600.0);
        sim.launch(Vec2::new(600.0, 750.0), Vec2::new(0.0, -1440.0)).unwrap();

        let (resolution, bounces) = run(&mut sim, 2000);
        assert_eq!(resolution, Some(FlightResolution::Scored));
        assert_eq!(bounces, 0);
        let ball = sim.projectile().unwrap();
        assert!(ball.has_scored);
        assert!(!ball.is_active);
    }

    #[test]
    fn test_ball_lands_on_stage_and_stops() {
        let tuning = Tuning::default();
        // Glass far to the right, ball goes straight up and comes back down
        let mut sim = world(&tuning, 1000.0);
        sim.launch(Vec2::new(600.0, 750.0), Vec2::new(0.0, -1440.0)).unwrap();

        let (resolution, bounces) = run(&mut sim, 20 * 120);
        assert_eq!(resolution, Some(FlightResolution::Stopped));
        assert!(bounces >= 1);
        let ball = sim.projectile().unwrap();
        assert!((ball.position.y + ball.radius - tuning.arena.stage_y).abs() < 1.0);
        assert_eq!(ball.bounce_count, bounces);
    }

    #[test]
    fn test_weak_throw_falls_out_of_bounds() {
        let tuning = Tuning::default();
        let mut sim = world(&tuning, 1000.0);
        sim.launch(Vec2::new(600.0, 750.0), Vec2::new(0.0, 300.0)).unwrap();
        let (resolution, bounces) = run(&mut sim, 1000);
        assert_eq!(resolution, Some(FlightResolution::OutOfBounds));
        assert_eq!(bounces, 0);
    }

    #[test]
    fn test_launch_rejected_while_active() {
        let tuning = Tuning::default();
        let mut sim = world(&tuning, 1000.0);
        sim.launch(Vec2::new(600.0, 750.0), Vec2::new(0.0, -800.0)).unwrap();
        assert_eq!(
            sim.launch(Vec2::new(600.0, 750.0), Vec2::new(0.0, -800.0)),
            Err(ThrowRejected::ProjectileInFlight)
        );
    }

    #[test]
    fn test_sensor_is_not_a_collider() {
        let tuning = Tuning::default();
        let sim = world(&tuning, 600.0);
        let zone = *sim.target();
        // Nothing in the collider list reaches the zone centre
        assert!(sim
            .colliders()
            .iter()
            .all(|c| c.shape.distance(zone.center) > 0.0));
    }

    #[test]
    fn test_wall_bounce_counts() {
        let tuning = Tuning::default();
        let mut sim = world(&tuning, 1000.0);
        // Hard throw up-left into the left wall
        sim.launch(Vec2::new(600.0, 750.0), Vec2::new(-1400.0, -900.0)).unwrap();
        let mut kinds = Vec::new();
        for _ in 0..600 {
            let report = sim.step(SIM_DT);
            kinds.extend(report.bounces.iter().map(|b| b.kind));
            if report.resolution.is_some() {
                break;
            }
        }
        assert!(kinds.contains(&ColliderKind::LeftWall));
    }

    #[test]
    fn test_preview_follows_flight_without_contacts() {
        let tuning = Tuning::default();
        let mut sim = world(&tuning, 1000.0);
        let origin = Vec2::new(600.0, 750.0);
        let velocity = Vec2::new(100.0, -600.0);
        let preview = sim.preview_trajectory(origin, velocity, 15, 0.25);
        assert_eq!(preview.len(), 15);

        // Same integration as the live projectile while nothing is hit
        sim.launch(origin, velocity).unwrap();
        let stride = (0.25f32 / SIM_DT).ceil() as usize / 15;
        for _ in 0..stride {
            sim.step(SIM_DT);
        }
        let live = sim.projectile().unwrap().position;
        assert!((live - preview[0]).length() < 1e-3);
        assert!(sim.preview_trajectory(origin, velocity, 0, 1.0).is_empty());
    }
}
