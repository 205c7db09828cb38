//! Browse-mode state

use serde::{Deserialize, Serialize};

use crate::geometry::CameraPose;

/// Camera control scheme while browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Drag/wheel orbit around a fixed target
    #[default]
    Orbit,
    /// Per-frame translate/yaw in the camera's local axes
    FreeMove,
    /// No camera input; the layout frames itself
    Static,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseModeState {
    pub is_active: bool,
    pub control_type: ControlType,
    /// Camera captured on entry. Only meaningful while active; may be stale
    /// after an exit that did not restore.
    pub saved_camera_state: Option<CameraPose>,
    /// Entered because a layout switch asked for it
    pub auto_entered: bool,
}

impl BrowseModeState {
    /// Saved pose, only while browse mode is active
    pub fn restorable_pose(&self) -> Option<CameraPose> {
        self.is_active.then_some(self.saved_camera_state).flatten()
    }
}
