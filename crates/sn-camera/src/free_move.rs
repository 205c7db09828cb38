//! Free-move controls in the camera's local axes

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::rig::CameraRig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeMoveConfig {
    /// World units per second
    pub speed: f32,
    /// Radians per second
    pub yaw_speed: f32,
}

impl Default for FreeMoveConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            yaw_speed: 1.5,
        }
    }
}

/// Held movement input, each axis in `[-1, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: f32,
    pub strafe: f32,
    pub vertical: f32,
    /// Positive turns left
    pub yaw: f32,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0 && self.vertical == 0.0 && self.yaw == 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct FreeMoveControls {
    config: FreeMoveConfig,
}

impl FreeMoveControls {
    pub fn new(config: FreeMoveConfig) -> Self {
        Self { config }
    }

    /// Move the rig for one frame. Returns whether anything moved.
    pub fn apply(&self, rig: &mut dyn CameraRig, intent: MoveIntent, dt: f32) -> bool {
        if intent.is_idle() || dt <= 0.0 {
            return false;
        }

        let pose = rig.pose();
        let forward = pose.forward();
        let right = {
            let r = forward.cross(Vec3::Y).normalize_or_zero();
            if r == Vec3::ZERO {
                Vec3::X
            } else {
                r
            }
        };
        let up = right.cross(forward).normalize_or_zero();

        let clamp = |v: f32| v.clamp(-1.0, 1.0);
        let step = self.config.speed * dt;
        let translation = (forward * clamp(intent.forward)
            + right * clamp(intent.strafe)
            + up * clamp(intent.vertical))
            * step;

        let turn = Quat::from_rotation_y(clamp(intent.yaw) * self.config.yaw_speed * dt);
        let distance = pose.distance().max(1.0);
        let eye = pose.eye + translation;
        let target = eye + turn * forward * distance;

        rig.set_look_at(eye, target, false);
        true
    }
}
