//! Frames the active item, the whole layout or a safe home pose

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sn_core::{Aabb, CameraPose};
use tracing::{debug, warn};

use crate::error::{CameraError, Result};
use crate::rig::{CameraRig, SceneQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the volume added on every side when fitting
    pub padding: f32,
    /// Extra distance factor when focusing a single item
    pub focus_margin: f32,
    pub fov_degrees: f32,
    pub home_eye: [f32; 3],
    pub home_target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            padding: 0.03,
            focus_margin: 1.3,
            fov_degrees: 50.0,
            home_eye: [0.0, 0.0, 10.0],
            home_target: [0.0, 0.0, 0.0],
        }
    }
}

impl CameraConfig {
    pub fn home_pose(&self) -> CameraPose {
        CameraPose::new(Vec3::from(self.home_eye), Vec3::from(self.home_target))
    }
}

/// What the camera should frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitRequest {
    /// Whole layout
    Overview,
    /// One item, by global index
    Focus(usize),
}

/// Camera transition phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraTransition {
    #[default]
    Idle,
    Animating,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Fit,
    Home,
    /// Approaching an item; `refine` is fitted once the approach arrives
    Approach { item: usize, refine: Aabb },
    Refine { item: usize },
}

/// Issues camera motions and tracks their completion.
///
/// Every request replaces whatever motion is in flight. Requests made while
/// the layout itself is animating are parked, the latest one wins, and run
/// when the layout settles.
#[derive(Debug, Default)]
pub struct CameraChoreographer {
    config: CameraConfig,
    transition: CameraTransition,
    motion: Option<Motion>,
    layout_busy: bool,
    parked: Option<FitRequest>,
    focused_item: Option<usize>,
}

impl CameraChoreographer {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn transition(&self) -> CameraTransition {
        self.transition
    }

    /// Item the last completed or in-flight focus was aimed at
    pub fn focused_item(&self) -> Option<usize> {
        self.focused_item
    }

    pub fn parked(&self) -> Option<FitRequest> {
        self.parked
    }

    /// Run `request` now, or park it while the layout is animating
    pub fn request(&mut self, rig: &mut dyn CameraRig, scene: &dyn SceneQuery, request: FitRequest) {
        if self.layout_busy {
            debug!(?request, "Parking camera request until layout settles");
            self.parked = Some(request);
            return;
        }
        self.run(rig, scene, request);
    }

    fn run(&mut self, rig: &mut dyn CameraRig, scene: &dyn SceneQuery, request: FitRequest) {
        match request {
            FitRequest::Overview => self.frame_overview(rig, scene),
            FitRequest::Focus(index) => self.focus_on_content(rig, scene, index),
        }
    }

    /// Layout animation started
    pub fn layout_started(&mut self) {
        self.layout_busy = true;
    }

    /// Layout animation settled; issues the parked request if any
    pub fn layout_settled(&mut self, rig: &mut dyn CameraRig, scene: &dyn SceneQuery) {
        self.layout_busy = false;
        if let Some(request) = self.parked.take() {
            self.run(rig, scene, request);
        }
    }

    /// Drop any parked request and stop tracking the current motion. The
    /// rig keeps whatever goal it has.
    pub fn preempt(&mut self) {
        self.parked = None;
        self.motion = None;
        self.transition = CameraTransition::Idle;
    }

    /// Frame a volume with the configured padding
    pub fn fit_to_bounds(&mut self, rig: &mut dyn CameraRig, volume: &Aabb) -> Result<()> {
        if !volume.is_finite() {
            return Err(CameraError::GeometryUnavailable(
                "non-finite bounding volume".to_string(),
            ));
        }
        rig.fit_to_box(volume, true, self.config.padding);
        self.begin(Motion::Fit);
        Ok(())
    }

    /// Frame the overview volume, else go home
    pub fn frame_overview(&mut self, rig: &mut dyn CameraRig, scene: &dyn SceneQuery) {
        self.focused_item = None;
        let result = scene
            .overview_bounds()
            .ok_or(CameraError::NothingToFrame)
            .and_then(|volume| self.fit_to_bounds(rig, &volume));
        if let Err(err) = result {
            warn!(%err, "Overview framing failed, returning home");
            self.go_home(rig);
        }
    }

    /// Fixed safe pose
    pub fn go_home(&mut self, rig: &mut dyn CameraRig) {
        let home = self.config.home_pose();
        rig.set_look_at(home.eye, home.target, true);
        rig.set_zoom(home.zoom, true);
        self.begin(Motion::Home);
    }

    /// Look at item `index` head-on, then refine once arrived. Falls back to
    /// the overview when its geometry is unusable.
    pub fn focus_on_content(&mut self, rig: &mut dyn CameraRig, scene: &dyn SceneQuery, index: usize) {
        match self.approach(rig, scene, index) {
            Ok(()) => {
                self.focused_item = Some(index);
            }
            Err(err) => {
                warn!(%err, index, "Content focus failed, framing overview");
                self.frame_overview(rig, scene);
            }
        }
    }

    fn approach(&mut self, rig: &mut dyn CameraRig, scene: &dyn SceneQuery, index: usize) -> Result<()> {
        let count = scene.item_count();
        if index >= count {
            return Err(CameraError::ItemOutOfRange { index, count });
        }

        let pose = scene.item_pose(index)?;
        let bounds = scene.item_bounds(index)?;
        let normal = pose.normal();
        if !pose.is_finite() || !bounds.is_finite() || normal == Vec3::ZERO {
            return Err(CameraError::NonFiniteGeometry(index));
        }

        let half_fov = rig.vertical_fov() * 0.5;
        let distance = (bounds.max_dimension() * 0.5) / half_fov.tan() * self.config.focus_margin;
        let eye = pose.position + normal * distance;
        if !eye.is_finite() || !distance.is_finite() {
            return Err(CameraError::NonFiniteGeometry(index));
        }

        let refine = scene
            .focus_bounds(index)
            .filter(Aabb::is_finite)
            .unwrap_or(bounds);

        debug!(index, distance, "Focusing content");
        rig.set_look_at(eye, pose.position, true);
        self.begin(Motion::Approach { item: index, refine });
        Ok(())
    }

    fn begin(&mut self, motion: Motion) {
        self.motion = Some(motion);
        self.transition = CameraTransition::Animating;
    }

    /// Poll the rig once per frame after it ticked. Returns the focused
    /// item (if any) on the frame the whole motion settles.
    pub fn update(&mut self, rig: &mut dyn CameraRig) -> Option<Option<usize>> {
        if self.transition != CameraTransition::Animating || rig.is_animating() {
            return None;
        }

        match self.motion.take() {
            Some(Motion::Approach { item, refine }) => {
                rig.fit_to_box(&refine, true, self.config.padding);
                self.motion = Some(Motion::Refine { item });
                None
            }
            Some(Motion::Refine { item }) => {
                self.transition = CameraTransition::Settled;
                Some(Some(item))
            }
            Some(Motion::Fit) | Some(Motion::Home) | None => {
                self.transition = CameraTransition::Settled;
                Some(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::SmoothCamera;
    use glam::Quat;
    use sn_core::WorldPose;

    #[derive(Default)]
    struct RecordingRig {
        pose: CameraPose,
        look_ats: Vec<(Vec3, Vec3)>,
        fits: Vec<Aabb>,
        animating: bool,
    }

    impl CameraRig for RecordingRig {
        fn pose(&self) -> CameraPose {
            self.pose
        }
        fn vertical_fov(&self) -> f32 {
            50.0_f32.to_radians()
        }
        fn aspect(&self) -> f32 {
            1.0
        }
        fn set_look_at(&mut self, eye: Vec3, target: Vec3, _smooth: bool) {
            self.look_ats.push((eye, target));
            self.pose = CameraPose::new(eye, target);
            self.animating = true;
        }
        fn fit_to_box(&mut self, volume: &Aabb, _smooth: bool, _padding: f32) {
            self.fits.push(*volume);
            self.animating = true;
        }
        fn set_zoom(&mut self, _zoom: f32, _smooth: bool) {}
        fn is_animating(&self) -> bool {
            self.animating
        }
    }

    struct OneCard {
        overview: Option<Aabb>,
    }

    impl SceneQuery for OneCard {
        fn item_count(&self) -> usize {
            1
        }
        fn item_bounds(&self, _index: usize) -> Result<Aabb> {
            Ok(Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 1.0, 0.0)))
        }
        fn item_pose(&self, _index: usize) -> Result<WorldPose> {
            Ok(WorldPose {
                position: Vec3::ZERO,
                orientation: Quat::IDENTITY,
                scale: Vec3::ONE,
            })
        }
        fn overview_bounds(&self) -> Option<Aabb> {
            self.overview
        }
    }

    struct BrokenScene {
        overview: Option<Aabb>,
    }

    impl SceneQuery for BrokenScene {
        fn item_count(&self) -> usize {
            3
        }
        fn item_bounds(&self, _index: usize) -> Result<Aabb> {
            Err(CameraError::GeometryUnavailable("no mesh".to_string()))
        }
        fn item_pose(&self, index: usize) -> Result<WorldPose> {
            Err(CameraError::NonFiniteGeometry(index))
        }
        fn overview_bounds(&self) -> Option<Aabb> {
            self.overview
        }
    }

    #[test]
    fn test_focus_distance_and_refinement() {
        let mut rig = RecordingRig::default();
        let mut choreographer = CameraChoreographer::default();
        choreographer.focus_on_content(&mut rig, &OneCard { overview: None }, 0);

        let (eye, target) = rig.look_ats[0];
        let expected = 1.0 / (25.0_f32.to_radians()).tan() * 1.3;
        assert_eq!(target, Vec3::ZERO);
        assert!((eye - Vec3::new(0.0, 0.0, expected)).length() < 1e-4);
        assert_eq!(choreographer.transition(), CameraTransition::Animating);

        // Still moving: nothing happens
        assert_eq!(choreographer.update(&mut rig), None);

        // Arrival issues the refinement fit
        rig.animating = false;
        assert_eq!(choreographer.update(&mut rig), None);
        assert_eq!(rig.fits.len(), 1);

        rig.animating = false;
        assert_eq!(choreographer.update(&mut rig), Some(Some(0)));
        assert_eq!(choreographer.transition(), CameraTransition::Settled);
    }

    #[test]
    fn test_geometry_failure_falls_back_to_overview() {
        let overview = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(4.0));
        let mut rig = RecordingRig::default();
        let mut choreographer = CameraChoreographer::default();
        choreographer.focus_on_content(&mut rig, &BrokenScene { overview: Some(overview) }, 1);

        assert!(rig.look_ats.is_empty());
        assert_eq!(rig.fits, vec![overview]);
        assert_eq!(choreographer.focused_item(), None);
    }

    #[test]
    fn test_fallback_chain_ends_finite() {
        let mut camera = SmoothCamera::default();
        let mut choreographer = CameraChoreographer::default();
        choreographer.focus_on_content(&mut camera, &BrokenScene { overview: None }, 0);
        for _ in 0..600 {
            camera.tick(1.0 / 60.0);
            choreographer.update(&mut camera);
        }
        assert!(camera.pose().is_finite());
        assert_eq!(camera.pose(), choreographer.config().home_pose());

        let nan = Aabb::new(Vec3::splat(f32::NAN), Vec3::ONE);
        choreographer.focus_on_content(&mut camera, &BrokenScene { overview: Some(nan) }, 0);
        assert!(camera.goal().is_finite());
    }

    #[test]
    fn test_out_of_range_focus() {
        let mut rig = RecordingRig::default();
        let mut choreographer = CameraChoreographer::default();
        choreographer.focus_on_content(&mut rig, &OneCard { overview: None }, 7);
        assert!(rig.look_ats.iter().all(|(eye, _)| eye.is_finite()));
        assert_eq!(rig.look_ats.last().map(|l| l.0), Some(Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_requests_park_during_layout_animation() {
        let scene = OneCard {
            overview: Some(Aabb::from_center_size(Vec3::ZERO, Vec3::ONE)),
        };
        let mut rig = RecordingRig::default();
        let mut choreographer = CameraChoreographer::default();

        choreographer.layout_started();
        choreographer.request(&mut rig, &scene, FitRequest::Focus(0));
        choreographer.request(&mut rig, &scene, FitRequest::Overview);
        assert!(rig.fits.is_empty() && rig.look_ats.is_empty());
        assert_eq!(choreographer.parked(), Some(FitRequest::Overview));

        choreographer.layout_settled(&mut rig, &scene);
        assert_eq!(rig.fits.len(), 1);
        assert!(rig.look_ats.is_empty());
        assert_eq!(choreographer.parked(), None);
    }
}
