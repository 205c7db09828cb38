//! Browse-mode state machine
//!
//! `Inactive -> Active(control, saved pose) -> Inactive`. The machine is the
//! only writer of [`BrowseModeState`]; everything else reads it through a
//! [`StoreReader`].

use glam::Vec2;
use sn_core::{store, BrowseModeState, ControlType, StoreReader, StoreWriter};
use tracing::info;

use crate::free_move::{FreeMoveConfig, FreeMoveControls, MoveIntent};
use crate::orbit::{OrbitConfig, OrbitControls};
use crate::rig::CameraRig;

/// Outcome of a browse-mode operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseTransition {
    Entered(ControlType),
    Exited { restored: bool },
    Unchanged,
}

pub struct BrowseMachine {
    state: StoreWriter<BrowseModeState>,
    orbit: OrbitControls,
    free_move: FreeMoveControls,
}

impl BrowseMachine {
    pub fn new(orbit: OrbitConfig, free_move: FreeMoveConfig) -> Self {
        let (_, state) = store(BrowseModeState::default());
        Self {
            state,
            orbit: OrbitControls::new(orbit),
            free_move: FreeMoveControls::new(free_move),
        }
    }

    pub fn reader(&self) -> StoreReader<BrowseModeState> {
        self.state.reader()
    }

    pub fn is_active(&self) -> bool {
        self.state.with(|s| s.is_active)
    }

    pub fn control_type(&self) -> Option<ControlType> {
        self.state.with(|s| s.is_active.then_some(s.control_type))
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    /// Enter with `control`, capturing the current camera
    pub fn enter(&mut self, rig: &mut dyn CameraRig, control: ControlType, auto: bool) -> BrowseTransition {
        if self.is_active() {
            return BrowseTransition::Unchanged;
        }

        let saved = rig.pose();
        self.state.set(BrowseModeState {
            is_active: true,
            control_type: control,
            saved_camera_state: Some(saved),
            auto_entered: auto,
        });

        if control == ControlType::Orbit {
            self.orbit.sync_from_pose(&saved);
            self.orbit.apply(rig, true);
        }

        info!(?control, auto, "Entered browse mode");
        BrowseTransition::Entered(control)
    }

    /// Leave browse mode, optionally animating back to the saved camera
    pub fn exit(&mut self, rig: &mut dyn CameraRig, restore: bool) -> BrowseTransition {
        let Some(saved) = self.state.with(|s| s.is_active.then_some(s.saved_camera_state)) else {
            return BrowseTransition::Unchanged;
        };

        // The saved pose is left in place, stale, until the next entry
        self.state.update(|s| {
            s.is_active = false;
            s.auto_entered = false;
        });

        let restored = match (restore, saved) {
            (true, Some(pose)) => {
                rig.set_look_at(pose.eye, pose.target, true);
                rig.set_zoom(pose.zoom, true);
                true
            }
            _ => false,
        };

        info!(restored, "Left browse mode");
        BrowseTransition::Exited { restored }
    }

    /// Toggle: enter, or exit with restore
    pub fn toggle(&mut self, rig: &mut dyn CameraRig, control: ControlType) -> BrowseTransition {
        if self.is_active() {
            self.exit(rig, true)
        } else {
            self.enter(rig, control, false)
        }
    }

    /// Exit without restore
    pub fn cancel(&mut self, rig: &mut dyn CameraRig) -> BrowseTransition {
        self.exit(rig, false)
    }

    /// Follow a layout switch. `previous` is `None` for the initial layout,
    /// which never auto-enters.
    pub fn follow_layout_switch(
        &mut self,
        rig: &mut dyn CameraRig,
        previous: Option<bool>,
        next_auto_browse: bool,
        next_control: ControlType,
    ) -> BrowseTransition {
        let Some(previous_auto) = previous else {
            return BrowseTransition::Unchanged;
        };

        let auto_entered = self.state.with(|s| s.is_active && s.auto_entered);
        if previous_auto && auto_entered && !next_auto_browse {
            return self.exit(rig, false);
        }

        if next_auto_browse && !self.is_active() {
            return self.enter(rig, next_control, true);
        }

        BrowseTransition::Unchanged
    }

    /// Pointer drag in pixels; orbit only
    pub fn pointer_drag(&mut self, rig: &mut dyn CameraRig, delta: Vec2) -> bool {
        if self.control_type() != Some(ControlType::Orbit) {
            return false;
        }
        self.orbit.drag(delta);
        self.orbit.apply(rig, false);
        true
    }

    /// Wheel delta; orbit only
    pub fn wheel(&mut self, rig: &mut dyn CameraRig, delta_y: f32) -> bool {
        if self.control_type() != Some(ControlType::Orbit) {
            return false;
        }
        self.orbit.wheel(delta_y);
        self.orbit.apply(rig, false);
        true
    }

    /// Held movement keys for one frame; free-move only
    pub fn free_move(&mut self, rig: &mut dyn CameraRig, intent: MoveIntent, dt: f32) -> bool {
        if self.control_type() != Some(ControlType::FreeMove) {
            return false;
        }
        self.free_move.apply(rig, intent, dt)
    }
}

impl Default for BrowseMachine {
    fn default() -> Self {
        Self::new(OrbitConfig::default(), FreeMoveConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::SmoothCamera;
    use glam::Vec3;
    use sn_core::CameraPose;

    fn camera() -> SmoothCamera {
        let mut camera = SmoothCamera::default();
        camera.set_look_at(Vec3::new(1.0, 2.0, 8.0), Vec3::new(0.0, 2.0, 0.0), false);
        camera
    }

    fn settle(camera: &mut SmoothCamera) {
        for _ in 0..600 {
            camera.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn test_toggle_restores_camera() {
        let mut camera = camera();
        let before = camera.pose();
        let mut browse = BrowseMachine::default();
        let reader = browse.reader();

        assert_eq!(
            browse.toggle(&mut camera, ControlType::FreeMove),
            BrowseTransition::Entered(ControlType::FreeMove)
        );
        assert!(reader.get().is_active);
        assert_eq!(reader.get().restorable_pose(), Some(before));

        browse.free_move(
            &mut camera,
            MoveIntent {
                forward: 1.0,
                ..Default::default()
            },
            0.5,
        );
        assert_ne!(camera.pose(), before);

        assert_eq!(
            browse.toggle(&mut camera, ControlType::FreeMove),
            BrowseTransition::Exited { restored: true }
        );
        settle(&mut camera);
        assert_eq!(camera.pose(), before);
        assert!(!reader.get().is_active);
    }

    #[test]
    fn test_cancel_leaves_camera() {
        let mut camera = camera();
        let mut browse = BrowseMachine::default();
        browse.enter(&mut camera, ControlType::Orbit, false);
        browse.pointer_drag(&mut camera, Vec2::new(-100.0, 0.0));
        let moved = camera.goal();

        assert_eq!(browse.cancel(&mut camera), BrowseTransition::Exited { restored: false });
        assert_eq!(camera.goal(), moved);

        // Saved pose stays behind but is no longer restorable
        let state = browse.reader().get();
        assert!(state.saved_camera_state.is_some());
        assert_eq!(state.restorable_pose(), None);
        assert_eq!(browse.cancel(&mut camera), BrowseTransition::Unchanged);
    }

    #[test]
    fn test_controls_follow_control_type() {
        let mut camera = camera();
        let mut browse = BrowseMachine::default();
        assert!(!browse.pointer_drag(&mut camera, Vec2::new(10.0, 0.0)));

        browse.enter(&mut camera, ControlType::Static, false);
        assert!(!browse.pointer_drag(&mut camera, Vec2::new(10.0, 0.0)));
        assert!(!browse.free_move(&mut camera, MoveIntent { forward: 1.0, ..Default::default() }, 1.0));
    }

    #[test]
    fn test_orbit_entry_starts_from_camera() {
        let mut camera = SmoothCamera::default();
        camera.set_look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, false);
        let mut browse = BrowseMachine::default();
        browse.enter(&mut camera, ControlType::Orbit, false);

        let goal: CameraPose = camera.goal();
        assert!((goal.eye - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
        assert_eq!(goal.target, Vec3::ZERO);
    }

    #[test]
    fn test_layout_switch_auto_browse() {
        let mut camera = camera();
        let mut browse = BrowseMachine::default();

        // Initial selection never auto-enters
        assert_eq!(
            browse.follow_layout_switch(&mut camera, None, true, ControlType::FreeMove),
            BrowseTransition::Unchanged
        );

        assert_eq!(
            browse.follow_layout_switch(&mut camera, Some(false), true, ControlType::FreeMove),
            BrowseTransition::Entered(ControlType::FreeMove)
        );
        assert!(browse.reader().get().auto_entered);

        assert_eq!(
            browse.follow_layout_switch(&mut camera, Some(true), false, ControlType::Orbit),
            BrowseTransition::Exited { restored: false }
        );
        assert!(!browse.is_active());
    }

    #[test]
    fn test_manual_browse_survives_layout_switch() {
        let mut camera = camera();
        let mut browse = BrowseMachine::default();
        browse.enter(&mut camera, ControlType::FreeMove, false);
        assert_eq!(
            browse.follow_layout_switch(&mut camera, Some(true), false, ControlType::Orbit),
            BrowseTransition::Unchanged
        );
        assert!(browse.is_active());
    }
}
