//! Wheel gestures for host actions such as zoom-level toggling

use crate::event::WheelInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelAction {
    ScrollUp,
    ScrollDown,
}

/// Ignores small wheel deltas
#[derive(Debug, Clone, Copy)]
pub struct WheelGate {
    threshold: f32,
}

impl WheelGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    pub fn classify(&self, input: &WheelInput) -> Option<WheelAction> {
        let dy = input.delta.y;
        if dy.abs() <= self.threshold || !dy.is_finite() {
            return None;
        }
        Some(if dy > 0.0 {
            WheelAction::ScrollDown
        } else {
            WheelAction::ScrollUp
        })
    }
}

impl Default for WheelGate {
    fn default() -> Self {
        Self::new(40.0)
    }
}
