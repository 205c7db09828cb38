//! Drag and single-finger swipe navigation

use std::time::Duration;

use glam::Vec2;
use sn_core::Direction;
use tracing::trace;

use crate::event::{PointerInput, PointerPhase, TouchInput, TouchPhase};

/// Turns pointer and touch movement into discrete navigation steps.
///
/// A step fires once the pointer has travelled `threshold` pixels from the
/// origin along the dominant axis; the origin then moves to the current
/// position so a long drag fires repeatedly, at most once per `cooldown`.
#[derive(Debug, Clone)]
pub struct DragNavigator {
    threshold: f32,
    cooldown: Duration,
    origin: Option<Vec2>,
    touch_id: Option<u64>,
    last_fired: Option<Duration>,
}

impl DragNavigator {
    pub fn new(threshold: f32, cooldown: Duration) -> Self {
        Self {
            threshold: threshold.max(0.0),
            cooldown,
            origin: None,
            touch_id: None,
            last_fired: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    /// Forget the current gesture
    pub fn reset(&mut self) {
        self.origin = None;
        self.touch_id = None;
    }

    /// Feed a pointer event. `enabled` is false while another mode owns the
    /// pointer; that also drops any gesture in progress.
    pub fn pointer(&mut self, input: &PointerInput, enabled: bool) -> Option<Direction> {
        if !enabled {
            self.reset();
            return None;
        }
        match input.phase {
            PointerPhase::Down => {
                self.origin = Some(input.position);
                None
            }
            PointerPhase::Move => self.track(input.position, input.time),
            PointerPhase::Up | PointerPhase::Cancel => {
                self.reset();
                None
            }
        }
    }

    /// Feed a touch event. Only single-finger gestures navigate.
    pub fn touch(&mut self, input: &TouchInput, enabled: bool) -> Option<Direction> {
        if !enabled || input.touch_count > 1 {
            self.reset();
            return None;
        }
        match input.phase {
            TouchPhase::Start => {
                self.origin = Some(input.position);
                self.touch_id = Some(input.id);
                None
            }
            TouchPhase::Move if self.touch_id == Some(input.id) => {
                self.track(input.position, input.time)
            }
            TouchPhase::Move => None,
            TouchPhase::End | TouchPhase::Cancel => {
                self.reset();
                None
            }
        }
    }

    fn track(&mut self, position: Vec2, time: Duration) -> Option<Direction> {
        let origin = self.origin?;
        let delta = position - origin;
        let (dx, dy) = (delta.x.abs(), delta.y.abs());

        let direction = if dy > self.threshold && dy > dx {
            // Content follows the finger: dragging up reveals what is below
            if delta.y < 0.0 {
                Direction::Down
            } else {
                Direction::Up
            }
        } else if dx > self.threshold && dx > dy {
            if delta.x < 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else {
            return None;
        };

        if let Some(last) = self.last_fired {
            if time.saturating_sub(last) < self.cooldown {
                return None;
            }
        }

        trace!(?direction, ?delta, "Drag step");
        self.origin = Some(position);
        self.last_fired = Some(time);
        Some(direction)
    }
}

impl Default for DragNavigator {
    fn default() -> Self {
        Self::new(80.0, Duration::from_millis(150))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(phase: PointerPhase, x: f32, y: f32, ms: u64) -> PointerInput {
        PointerInput {
            phase,
            position: Vec2::new(x, y),
            time: Duration::from_millis(ms),
        }
    }

    fn touch(phase: TouchPhase, id: u64, count: usize, x: f32, y: f32, ms: u64) -> TouchInput {
        TouchInput {
            phase,
            id,
            position: Vec2::new(x, y),
            touch_count: count,
            time: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_dominant_axis_and_direction() {
        let mut drag = DragNavigator::default();
        drag.pointer(&pointer(PointerPhase::Down, 100.0, 100.0, 0), true);
        assert_eq!(drag.pointer(&pointer(PointerPhase::Move, 130.0, 50.0, 10), true), None);
        assert_eq!(
            drag.pointer(&pointer(PointerPhase::Move, 130.0, 10.0, 20), true),
            Some(Direction::Down)
        );

        // Origin moved to the firing point
        assert_eq!(
            drag.pointer(&pointer(PointerPhase::Move, 20.0, 10.0, 400), true),
            Some(Direction::Right)
        );
        assert_eq!(
            drag.pointer(&pointer(PointerPhase::Move, 120.0, 10.0, 800), true),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_cooldown_gates_repeats() {
        let mut drag = DragNavigator::default();
        drag.pointer(&pointer(PointerPhase::Down, 0.0, 0.0, 0), true);
        assert_eq!(drag.pointer(&pointer(PointerPhase::Move, 0.0, 90.0, 100), true), Some(Direction::Up));
        assert_eq!(drag.pointer(&pointer(PointerPhase::Move, 0.0, 180.0, 200), true), None);
        assert_eq!(drag.pointer(&pointer(PointerPhase::Move, 0.0, 190.0, 250), true), Some(Direction::Up));
    }

    #[test]
    fn test_release_and_disable_clear_origin() {
        let mut drag = DragNavigator::default();
        drag.pointer(&pointer(PointerPhase::Down, 0.0, 0.0, 0), true);
        drag.pointer(&pointer(PointerPhase::Up, 0.0, 0.0, 5), true);
        assert_eq!(drag.pointer(&pointer(PointerPhase::Move, 0.0, 300.0, 10), true), None);

        drag.pointer(&pointer(PointerPhase::Down, 0.0, 0.0, 20), true);
        assert_eq!(drag.pointer(&pointer(PointerPhase::Move, 0.0, 300.0, 30), false), None);
        assert!(!drag.is_tracking());
        assert_eq!(drag.pointer(&pointer(PointerPhase::Move, 0.0, 600.0, 40), true), None);
    }

    #[test]
    fn test_second_finger_cancels_swipe() {
        let mut drag = DragNavigator::default();
        drag.touch(&touch(TouchPhase::Start, 1, 1, 0.0, 0.0, 0), true);
        drag.touch(&touch(TouchPhase::Start, 2, 2, 50.0, 0.0, 5), true);
        assert_eq!(drag.touch(&touch(TouchPhase::Move, 1, 1, 0.0, -200.0, 10), true), None);

        drag.touch(&touch(TouchPhase::Start, 3, 1, 0.0, 0.0, 20), true);
        assert_eq!(
            drag.touch(&touch(TouchPhase::Move, 3, 1, 0.0, -200.0, 30), true),
            Some(Direction::Down)
        );
    }
}
