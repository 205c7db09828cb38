//! Orbit controls around a vertical axis

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use sn_core::{Aabb, CameraPose};

use crate::rig::CameraRig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub radius: f32,
    /// Radians per pixel of horizontal drag
    pub sensitivity: f32,
    /// World units per pixel of vertical drag
    pub height_sensitivity: f32,
    /// World units per wheel delta unit
    pub wheel_step: f32,
    /// Extra height allowed beyond the tallest column
    pub overshoot: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            sensitivity: 0.005,
            height_sensitivity: 0.01,
            wheel_step: 0.002,
            overshoot: 0.5,
        }
    }
}

/// Height range covering `bounds` vertically, plus `overshoot` at both ends
pub fn height_range_around(bounds: &Aabb, overshoot: f32) -> (f32, f32) {
    let overshoot = overshoot.max(0.0);
    (bounds.min.y - overshoot, bounds.max.y + overshoot)
}

/// Camera on a circle of fixed radius, looking at the axis at its own height
#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: OrbitConfig,
    angle: f32,
    height: f32,
    min_height: f32,
    max_height: f32,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig) -> Self {
        let overshoot = config.overshoot;
        Self {
            config,
            angle: 0.0,
            height: 0.0,
            min_height: -overshoot,
            max_height: overshoot,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    pub fn set_height_range(&mut self, min: f32, max: f32) {
        self.min_height = min.min(max);
        self.max_height = min.max(max);
        self.height = self.clamp_height(self.height);
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = self.clamp_height(height);
    }

    fn clamp_height(&self, height: f32) -> f32 {
        height.clamp(self.min_height, self.max_height)
    }

    /// Pick up angle and height from an existing camera
    pub fn sync_from_pose(&mut self, pose: &CameraPose) {
        let eye = pose.eye;
        if eye.x != 0.0 || eye.z != 0.0 {
            self.angle = eye.z.atan2(eye.x);
        }
        self.height = self.clamp_height(eye.y);
    }

    /// Pointer drag in pixels
    pub fn drag(&mut self, delta: Vec2) {
        self.angle -= delta.x * self.config.sensitivity;
        self.height = self.clamp_height(self.height + delta.y * self.config.height_sensitivity);
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.height = self.clamp_height(self.height + delta_y * self.config.wheel_step);
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.config.radius * self.angle.cos(),
            self.height,
            self.config.radius * self.angle.sin(),
        )
    }

    pub fn target(&self) -> Vec3 {
        Vec3::new(0.0, self.height, 0.0)
    }

    /// Move the rig to the current orbit position
    pub fn apply(&self, rig: &mut dyn CameraRig, smooth: bool) {
        rig.set_look_at(self.eye(), self.target(), smooth);
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}
