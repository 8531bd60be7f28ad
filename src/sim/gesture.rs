//! Drag gesture capture and smoothing
//!
//! Pointer events arrive at event rate, independent of the simulation tick.
//! The smoothed vector is written only by the smoothing filter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::SmoothingMode;

/// An in-progress or finalized drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragGesture {
    pub start_point: Vec2,
    pub current_point: Vec2,
    /// `current_point - start_point`
    pub raw_vector: Vec2,
    pub smoothed_vector: Vec2,
    /// Seconds, host clock
    pub start_time: f64,
    pub last_event_time: f64,
}

impl DragGesture {
    fn new(point: Vec2, time: f64) -> Self {
        Self {
            start_point: point,
            current_point: point,
            raw_vector: Vec2::ZERO,
            smoothed_vector: Vec2::ZERO,
            start_time: time,
            last_event_time: time,
        }
    }

    /// Seconds between pointer down and the latest event
    pub fn duration(&self) -> f64 {
        self.last_event_time - self.start_time
    }
}

/// Tracks at most one drag at a time
#[derive(Debug, Clone)]
pub struct GestureTracker {
    mode: SmoothingMode,
    min_drag_distance: f32,
    active: Option<DragGesture>,
}

impl GestureTracker {
    pub fn new(mode: SmoothingMode, min_drag_distance: f32) -> Self {
        Self {
            mode,
            min_drag_distance,
            active: None,
        }
    }

    pub fn set_mode(&mut self, mode: SmoothingMode) {
        self.mode = mode;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn current(&self) -> Option<&DragGesture> {
        self.active.as_ref()
    }

    /// Begin a new gesture, replacing any in progress
    pub fn pointer_down(&mut self, point: Vec2, time: f64) {
        self.active = Some(DragGesture::new(point, time));
    }

    /// Update the drag; returns the gesture when one is active
    pub fn pointer_move(&mut self, point: Vec2, time: f64) -> Option<&DragGesture> {
        let mode = self.mode;
        let gesture = self.active.as_mut()?;

        let dt = (time - gesture.last_event_time).max(0.0) as f32;
        gesture.current_point = point;
        gesture.raw_vector = point - gesture.start_point;
        let alpha = mode.alpha(dt);
        gesture.smoothed_vector = gesture.smoothed_vector.lerp(gesture.raw_vector, alpha);
        gesture.last_event_time = time;

        Some(&*gesture)
    }

    /// Finish the gesture. Drags shorter than the minimum are discarded.
    pub fn pointer_up(&mut self, time: f64) -> Option<DragGesture> {
        let mut gesture = self.active.take()?;
        gesture.last_event_time = gesture.last_event_time.max(time);

        if gesture.smoothed_vector.length() < self.min_drag_distance {
            log::debug!(
                "Drag of {:.1}px over {:.2}s discarded",
                gesture.smoothed_vector.length(),
                gesture.duration()
            );
            return None;
        }
        log::debug!("Drag finished after {:.2}s", gesture.duration());
        Some(gesture)
    }

    /// Drop the gesture without producing a throw
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracker() -> GestureTracker {
        GestureTracker::new(SmoothingMode::default(), 30.0)
    }

    #[test]
    fn test_pointer_down_resets() {
        let mut t = tracker();
        t.pointer_down(Vec2::new(10.0, 10.0), 0.0);
        t.pointer_move(Vec2::new(10.0, -90.0), 0.016);
        t.pointer_down(Vec2::new(50.0, 50.0), 1.0);

        let g = t.current().unwrap();
        assert_eq!(g.start_point, Vec2::new(50.0, 50.0));
        assert_eq!(g.current_point, g.start_point);
        assert_eq!(g.smoothed_vector, Vec2::ZERO);
        assert_eq!(g.start_time, 1.0);
    }

    #[test]
    fn test_per_event_smoothing_blend() {
        let mut t = tracker();
        t.pointer_down(Vec2::ZERO, 0.0);
        let g = t.pointer_move(Vec2::new(0.0, -100.0), 0.016).unwrap();
        assert_eq!(g.raw_vector, Vec2::new(0.0, -100.0));
        assert!((g.smoothed_vector.y + 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_without_gesture_ignored() {
        let mut t = tracker();
        assert!(t.pointer_move(Vec2::new(5.0, 5.0), 0.0).is_none());
        assert!(t.pointer_up(0.1).is_none());
    }

    #[test]
    fn test_long_drag_finalizes() {
        let mut t = tracker();
        t.pointer_down(Vec2::ZERO, 0.0);
        for i in 1..=40 {
            t.pointer_move(Vec2::new(0.0, -200.0), i as f64 / 60.0);
        }
        let g = t.pointer_up(0.7).unwrap();
        assert!(g.smoothed_vector.length() > 190.0);
        assert!((g.duration() - 0.7).abs() < 1e-9);
        assert!(!t.is_active());
    }

    #[test]
    fn test_cancel_drops_gesture() {
        let mut t = tracker();
        t.pointer_down(Vec2::ZERO, 0.0);
        assert!(t.cancel());
        assert!(!t.cancel());
        assert!(t.pointer_up(0.5).is_none());
    }

    #[test]
    fn test_time_normalized_is_rate_independent() {
        let mut fast = GestureTracker::new(SmoothingMode::time_normalized(), 30.0);
        let mut slow = GestureTracker::new(SmoothingMode::time_normalized(), 30.0);
        fast.pointer_down(Vec2::ZERO, 0.0);
        slow.pointer_down(Vec2::ZERO, 0.0);
        let target = Vec2::new(80.0, -160.0);
        for i in 1..=24 {
            fast.pointer_move(target, i as f64 / 120.0);
        }
        for i in 1..=12 {
            slow.pointer_move(target, i as f64 / 60.0);
        }
        let a = fast.current().unwrap().smoothed_vector;
        let b = slow.current().unwrap().smoothed_vector;
        assert!((a - b).length() < 0.01);
    }

    proptest! {
        #[test]
        fn short_drags_never_finalize(x in -20.0f32..20.0, y in -20.0f32..20.0, moves in 1usize..50) {
            let mut t = tracker();
            t.pointer_down(Vec2::ZERO, 0.0);
            for i in 1..=moves {
                t.pointer_move(Vec2::new(x, y), i as f64 / 60.0);
            }
            // |raw| < 30, and the smoothed vector never exceeds the raw one
            prop_assert!(t.pointer_up(1.0).is_none());
        }
    }
}
