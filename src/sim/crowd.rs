//! Crowd bumps: the audience jostles the thrower at random intervals
//!
//! Timers count simulation ticks. The schedule and offsets come from a
//! seeded `Pcg32`, so a run replays identically for the same seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::levels::LevelConfig;
use crate::secs_to_ticks;
use crate::tuning::CrowdTuning;

/// Scheduler for the aim-disturbing bump
#[derive(Debug, Clone)]
pub struct CrowdBump {
    rng: Pcg32,
    enabled: bool,
    /// Mean seconds between bumps for this level
    interval: f32,
    variance: f32,
    duration_ticks: u32,
    /// Max per-axis offset (px/s) for this level
    max_offset: f32,
    ticks_until_next: u32,
    active_ticks: u32,
    offset: Vec2,
}

impl CrowdBump {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            enabled: false,
            interval: 0.0,
            variance: 0.0,
            duration_ticks: 0,
            max_offset: 0.0,
            ticks_until_next: 0,
            active_ticks: 0,
            offset: Vec2::ZERO,
        }
    }

    /// Reseed and reschedule for a level
    pub fn configure(&mut self, seed: u64, tuning: &CrowdTuning, level: &LevelConfig) {
        self.rng = Pcg32::seed_from_u64(seed ^ (u64::from(level.id) << 32));
        self.enabled = tuning.enabled;
        self.interval = tuning.base_interval * level.crowd_bump_frequency;
        self.variance = tuning.variance;
        self.duration_ticks = secs_to_ticks(tuning.duration);
        self.max_offset = tuning.max_offset * tuning.base_strength * level.crowd_bump_strength;
        self.active_ticks = 0;
        self.offset = Vec2::ZERO;
        self.schedule_next();
    }

    fn schedule_next(&mut self) {
        let spread = if self.variance > 0.0 {
            self.rng.random_range(-self.variance..=self.variance)
        } else {
            0.0
        };
        // Never fire twice in the same tick
        self.ticks_until_next = secs_to_ticks(self.interval + spread).max(1);
    }

    /// Advance one tick; returns the offset when a new bump starts
    pub fn step(&mut self) -> Option<Vec2> {
        if !self.enabled {
            return None;
        }

        if self.active_ticks > 0 {
            self.active_ticks -= 1;
            if self.active_ticks == 0 {
                self.offset = Vec2::ZERO;
            }
        }

        self.ticks_until_next = self.ticks_until_next.saturating_sub(1);
        if self.ticks_until_next > 0 {
            return None;
        }

        let m = self.max_offset;
        self.offset = if m > 0.0 {
            Vec2::new(self.rng.random_range(-m..=m), self.rng.random_range(-m..=m))
        } else {
            Vec2::ZERO
        };
        self.active_ticks = self.duration_ticks;
        self.schedule_next();
        log::debug!("Crowd bump {:?}", self.offset);
        Some(self.offset)
    }

    /// Offset to add to a throw made right now
    pub fn active_offset(&self) -> Option<Vec2> {
        (self.active_ticks > 0).then_some(self.offset)
    }

    pub fn is_active(&self) -> bool {
        self.active_ticks > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTable;

    fn configured(seed: u64) -> CrowdBump {
        let mut crowd = CrowdBump::new(seed);
        crowd.configure(seed, &CrowdTuning::default(), LevelTable::builtin().get(3));
        crowd
    }

    #[test]
    fn test_bump_schedule_within_bounds() {
        let mut crowd = configured(7);
        // Level 3: 5 s * 0.9 = 4.5 s, +- 2 s
        let first = (1..=10 * 120).find(|_| crowd.step().is_some()).unwrap();
        assert!(first >= secs_to_ticks(2.5) - 1 && first <= secs_to_ticks(6.5) + 1);
        assert!(crowd.is_active());

        let offset = crowd.active_offset().unwrap();
        let max = 240.0 * 0.3 * 1.0;
        assert!(offset.x.abs() <= max && offset.y.abs() <= max);

        for _ in 0..secs_to_ticks(0.5) {
            crowd.step();
        }
        assert!(crowd.active_offset().is_none());
    }

    #[test]
    fn test_same_seed_same_bumps() {
        let mut a = configured(99);
        let mut b = configured(99);
        for _ in 0..60 * 120 {
            assert_eq!(a.step(), b.step());
        }
    }

    #[test]
    fn test_disabled_never_fires() {
        let tuning = CrowdTuning {
            enabled: false,
            ..Default::default()
        };
        let mut crowd = CrowdBump::new(1);
        crowd.configure(1, &tuning, LevelTable::builtin().get(1));
        assert!((0..60 * 120).all(|_| crowd.step().is_none()));
    }
}
