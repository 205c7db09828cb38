//! Interfaces to the camera and the positioned scene

use glam::{Mat4, Vec3};
use sn_core::{Aabb, CameraPose, WorldPose};

use crate::error::Result;

/// Geometry of the positioned content, in world space
pub trait SceneQuery {
    fn item_count(&self) -> usize;

    /// Bounding volume of one item
    fn item_bounds(&self, index: usize) -> Result<Aabb>;

    /// World position and orientation of one item
    fn item_pose(&self, index: usize) -> Result<WorldPose>;

    /// "Show everything" volume
    fn overview_bounds(&self) -> Option<Aabb>;

    /// Refinement volume for a focused item, if the layout defines one
    fn focus_bounds(&self, _index: usize) -> Option<Aabb> {
        None
    }
}

/// A controllable camera
pub trait CameraRig {
    fn pose(&self) -> CameraPose;

    /// Vertical field of view in radians
    fn vertical_fov(&self) -> f32;

    fn aspect(&self) -> f32;

    fn set_look_at(&mut self, eye: Vec3, target: Vec3, smooth: bool);

    /// Frame `volume` keeping the current viewing direction. `padding` is a
    /// fraction added on every side.
    fn fit_to_box(&mut self, volume: &Aabb, smooth: bool, padding: f32);

    fn set_zoom(&mut self, zoom: f32, smooth: bool);

    /// `false` once the last requested motion has arrived
    fn is_animating(&self) -> bool;

    /// Viewport aspect changed
    fn set_aspect(&mut self, _aspect: f32) {}

    /// Advance any interpolation by `dt` seconds. Rigs animated by their
    /// host leave this alone.
    fn tick(&mut self, _dt: f32) {}
}

/// Exponentially interpolating camera
#[derive(Debug, Clone)]
pub struct SmoothCamera {
    current: CameraPose,
    goal: CameraPose,
    fov: f32,
    aspect: f32,
    /// Convergence rate per second
    rate: f32,
    near: f32,
    far: f32,
}

const ARRIVAL_EPSILON: f32 = 1e-3;

impl Default for SmoothCamera {
    fn default() -> Self {
        Self::new(50.0_f32.to_radians(), 16.0 / 9.0)
    }
}

impl SmoothCamera {
    pub fn new(fov: f32, aspect: f32) -> Self {
        Self {
            current: CameraPose::default(),
            goal: CameraPose::default(),
            fov,
            aspect,
            rate: 6.0,
            near: 0.05,
            far: 500.0,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate.max(0.1);
        self
    }

    pub fn set_fov(&mut self, fov: f32) {
        if fov.is_finite() && fov > 0.0 {
            self.fov = fov;
        }
    }

    /// Pose the camera is heading for
    pub fn goal(&self) -> CameraPose {
        self.goal
    }

    fn arrived(&self) -> bool {
        self.current.eye.distance(self.goal.eye) < ARRIVAL_EPSILON
            && self.current.target.distance(self.goal.target) < ARRIVAL_EPSILON
            && (self.current.zoom - self.goal.zoom).abs() < ARRIVAL_EPSILON
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.current.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        // Zoom narrows the field of view
        let fov = (self.fov / self.current.zoom.max(0.01)).clamp(0.01, 3.0);
        Mat4::perspective_rh(fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera distance that fits `volume` with `padding` on every side
    pub fn fit_distance(&self, volume: &Aabb, padding: f32) -> f32 {
        let half = volume.half_extents() * (1.0 + 2.0 * padding.max(0.0));
        let tan = (self.fov * 0.5).tan().max(1e-4);
        let vertical = half.y / tan;
        let horizontal = half.x / (tan * self.aspect.max(1e-4));
        vertical.max(horizontal) + half.z
    }

    fn retarget(&mut self, goal: CameraPose, smooth: bool) {
        if !goal.is_finite() {
            tracing::warn!(?goal, "Ignoring non-finite camera goal");
            return;
        }
        self.goal = goal;
        if !smooth {
            self.current = goal;
        }
    }
}

impl CameraRig for SmoothCamera {
    fn pose(&self) -> CameraPose {
        self.current
    }

    fn vertical_fov(&self) -> f32 {
        self.fov
    }

    fn aspect(&self) -> f32 {
        self.aspect
    }

    fn set_look_at(&mut self, eye: Vec3, target: Vec3, smooth: bool) {
        let goal = CameraPose {
            eye,
            target,
            zoom: self.goal.zoom,
        };
        self.retarget(goal, smooth);
    }

    fn fit_to_box(&mut self, volume: &Aabb, smooth: bool, padding: f32) {
        let forward = self.current.forward();
        let center = volume.center();
        let distance = self.fit_distance(volume, padding).max(self.near * 2.0);
        let goal = CameraPose {
            eye: center - forward * distance,
            target: center,
            zoom: 1.0,
        };
        self.retarget(goal, smooth);
    }

    fn set_zoom(&mut self, zoom: f32, smooth: bool) {
        let goal = CameraPose {
            zoom: zoom.max(0.01),
            ..self.goal
        };
        self.retarget(goal, smooth);
    }

    fn is_animating(&self) -> bool {
        self.current != self.goal
    }

    fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    fn tick(&mut self, dt: f32) {
        if !self.is_animating() {
            return;
        }
        let alpha = 1.0 - (-self.rate * dt.max(0.0)).exp();
        self.current.eye = self.current.eye.lerp(self.goal.eye, alpha);
        self.current.target = self.current.target.lerp(self.goal.target, alpha);
        self.current.zoom += (self.goal.zoom - self.current.zoom) * alpha;

        if self.arrived() {
            self.current = self.goal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_motion_arrives() {
        let mut camera = SmoothCamera::default();
        camera.set_look_at(Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 1.0, 0.0), true);
        assert!(camera.is_animating());

        for _ in 0..600 {
            camera.tick(1.0 / 60.0);
        }
        assert!(!camera.is_animating());
        assert_eq!(camera.pose().target, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_instant_motion() {
        let mut camera = SmoothCamera::default();
        camera.set_look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, false);
        assert!(!camera.is_animating());
        assert_eq!(camera.pose().eye, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_fit_keeps_direction_and_contains_box() {
        let mut camera = SmoothCamera::new(60.0_f32.to_radians(), 1.0);
        let volume = Aabb::from_center_size(Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 0.0));
        camera.fit_to_box(&volume, false, 0.03);

        let pose = camera.pose();
        assert_eq!(pose.target, volume.center());
        assert!((pose.forward() - Vec3::NEG_Z).length() < 1e-5);

        // Every corner projects inside clip space
        let clip = camera.view_projection();
        for corner in volume.corners() {
            let p = clip.project_point3(corner);
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
        }
    }

    #[test]
    fn test_non_finite_goal_is_ignored() {
        let mut camera = SmoothCamera::default();
        let before = camera.pose();
        camera.set_look_at(Vec3::splat(f32::NAN), Vec3::ZERO, false);
        assert_eq!(camera.pose(), before);
    }
}
