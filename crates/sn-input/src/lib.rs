//! Input handling for the spatial navigation engine
//!
//! Raw keyboard, pointer, touch and wheel events come in as [`InputEvent`]s.
//! The controllers here turn them into navigation steps, section-exit
//! decisions and browse-mode movement. [`NavigationController`] and
//! [`SectionExitController`] are the only writers of their states.

pub mod drag;
pub mod event;
pub mod flat;
pub mod grid;
pub mod keyboard;
pub mod navigator;
pub mod section_exit;
pub mod wheel;

pub use drag::DragNavigator;
pub use event::{
    FocusTarget, InputEvent, Key, KeyInput, PointerInput, PointerPhase, TouchInput, TouchPhase,
    WheelInput,
};
pub use keyboard::{map_key, Command, KeyContext, MovementKeys};
pub use navigator::{NavOutcome, NavigationController};
pub use section_exit::SectionExitController;
pub use wheel::{WheelAction, WheelGate};

use serde::{Deserialize, Serialize};

/// Input tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub drag_threshold_px: f32,
    pub drag_cooldown_ms: u64,
    pub wheel_threshold: f32,
    pub browse_key: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 80.0,
            drag_cooldown_ms: 150,
            wheel_threshold: 40.0,
            browse_key: 'b',
        }
    }
}
