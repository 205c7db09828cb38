//! The engine facade: the single update point wiring content, navigation,
//! layout and camera together

mod input;

use std::sync::Arc;

use glam::Vec2;
use serde_json::Value;
use sn_camera::{
    height_range_around, BrowseMachine, BrowseTransition, CameraChoreographer, CameraRig,
    CameraTransition, FitRequest, SmoothCamera,
};
use sn_core::events::events::{
    ActiveItemChanged, BrowseModeChanged, CameraSettled, ContentLoaded, LayoutChanged,
    SectionExitHidden, SectionExitShown,
};
use sn_core::{
    BrowseModeState, Category, ContentIndex, ContentItem, ContentPayload, ControlType, Direction,
    EventBus, NavigationMode, NavigationState, SectionExitState, Side, StateSubscriber,
    StoreReader,
};
use sn_input::{
    DragNavigator, MovementKeys, NavOutcome, NavigationController, SectionExitController,
    WheelAction, WheelGate,
};
use sn_layout::{
    AnimationEvent, LayoutAnimator, LayoutContext, LayoutFrame, LayoutSnapshot, PillarPositioner,
    Positioner, PositionerRegistry, StackPositioner, Viewport,
};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::scene::LayoutScene;

type Callback = Box<dyn FnMut() + Send>;
type ScrollCallback = Box<dyn FnMut(WheelAction) + Send>;

#[derive(Default)]
struct Callbacks {
    toggle_focus: Option<Callback>,
    escape: Option<Callback>,
    scroll: Option<ScrollCallback>,
}

/// Spatial navigation engine.
///
/// Owns the content index, the state writers, the layout pipeline and the
/// camera. Hosts feed it input events and a per-frame [`tick`], and read
/// state back through the store readers or the event bus.
///
/// [`tick`]: SpatialEngine::tick
pub struct SpatialEngine<P = Value, R = SmoothCamera> {
    config: EngineConfig,
    index: ContentIndex<P>,
    generation: u64,
    navigation: NavigationController,
    section_exit: SectionExitController,
    browse: BrowseMachine,
    choreographer: CameraChoreographer,
    rig: R,
    registry: PositionerRegistry,
    layout: String,
    frame: LayoutFrame,
    animator: LayoutAnimator,
    viewport: Viewport,
    drag: DragNavigator,
    wheel: WheelGate,
    movement: MovementKeys,
    orbit_pointer: Option<Vec2>,
    events: EventBus,
    callbacks: Callbacks,
}

impl<P> SpatialEngine<P, SmoothCamera>
where
    P: ContentPayload + Clone,
{
    /// Engine with the built-in interpolating camera
    pub fn new(config: EngineConfig) -> Result<Self> {
        let rig = SmoothCamera::new(
            config.camera.fov_degrees.to_radians(),
            Viewport::default().aspect(),
        );
        Self::with_rig(config, rig)
    }
}

impl<P, R> SpatialEngine<P, R>
where
    P: ContentPayload + Clone,
    R: CameraRig,
{
    /// Engine driving a host-provided camera
    pub fn with_rig(config: EngineConfig, mut rig: R) -> Result<Self> {
        let mut registry = PositionerRegistry::new();
        registry.register(Arc::new(PillarPositioner::new(config.pillar.clone())), false);
        registry.register(
            Arc::new(StackPositioner::new(config.stack.clone())),
            config.deck_auto_browse,
        );
        registry.get(&config.initial_layout)?;

        let viewport = Viewport::default();
        rig.set_aspect(viewport.aspect());
        let home = config.camera.home_pose();
        rig.set_look_at(home.eye, home.target, false);

        let drag = DragNavigator::new(
            config.input.drag_threshold_px,
            std::time::Duration::from_millis(config.input.drag_cooldown_ms),
        );

        info!(layout = %config.initial_layout, "Spatial engine ready");
        Ok(Self {
            index: ContentIndex::default(),
            generation: 0,
            navigation: NavigationController::new(),
            section_exit: SectionExitController::new(),
            browse: BrowseMachine::new(config.orbit.clone(), config.free_move.clone()),
            choreographer: CameraChoreographer::new(config.camera.clone()),
            rig,
            registry,
            layout: config.initial_layout.clone(),
            frame: LayoutFrame::new(),
            animator: LayoutAnimator::new(),
            viewport,
            drag,
            wheel: WheelGate::new(config.input.wheel_threshold),
            movement: MovementKeys::new(),
            orbit_pointer: None,
            events: EventBus::new(),
            callbacks: Callbacks::default(),
            config,
        })
    }

    // ---- Content ----

    /// Replace the content. The active item survives if its id still
    /// exists, otherwise the first item becomes active.
    pub fn load_content(&mut self, categories: &[Category<P>]) {
        let first_load = self.generation == 0;
        self.generation += 1;

        let preferred = self.navigation.state().active_item_id;
        self.index = ContentIndex::build(categories, self.generation);
        info!(
            items = self.index.len(),
            categories = self.index.category_count(),
            generation = self.generation,
            "Content loaded"
        );

        if self.section_exit.cancel() {
            self.events.publish(SectionExitHidden { target: None });
        }

        let outcome = self.navigation.reset(&self.index, preferred.as_deref());
        self.events.publish(ContentLoaded {
            item_count: self.index.len(),
            category_count: self.index.category_count(),
            generation: self.generation,
        });

        self.refresh_layout();
        if let Some(to) = outcome.moved_to() {
            self.publish_active_changed(to);
        }

        if self.browse.is_active() {
            return;
        }
        if first_load {
            self.request_camera(FitRequest::Overview);
        } else {
            self.focus_active();
        }
    }

    pub fn index(&self) -> &ContentIndex<P> {
        &self.index
    }

    pub fn active_item(&self) -> Option<&ContentItem<P>> {
        self.navigation
            .current(&self.index)
            .and_then(|global| self.index.get(global))
    }

    pub fn category_title(&self, category_index: usize) -> Option<&str> {
        self.index.category(category_index).map(|c| c.display_title())
    }

    // ---- Navigation ----

    /// One step in the current layout's navigation mode. Suppressed while
    /// the section-exit modal is open.
    pub fn navigate(&mut self, direction: Direction) -> NavOutcome {
        if self.section_exit.is_visible() {
            debug!(?direction, "Navigation suppressed by section exit");
            return NavOutcome::Unchanged;
        }

        let outcome = self
            .navigation
            .step(&self.index, self.navigation_mode(), direction);
        match outcome {
            NavOutcome::Moved { to, .. } => self.after_move(to),
            NavOutcome::Boundary { category, .. } => self.open_section_exit(category),
            NavOutcome::Unchanged => {}
        }
        outcome
    }

    /// Activate an item by id. Unknown ids are ignored.
    pub fn navigate_to_item(&mut self, id: &str) -> NavOutcome {
        if self.section_exit.cancel() {
            self.events.publish(SectionExitHidden { target: None });
        }
        let outcome = self.navigation.jump_to_id(&self.index, id);
        if let Some(to) = outcome.moved_to() {
            self.after_move(to);
        }
        outcome
    }

    pub fn navigation(&self) -> StoreReader<NavigationState> {
        self.navigation.reader()
    }

    pub fn subscribe_navigation(&self, subscriber: &Arc<dyn StateSubscriber<NavigationState>>) {
        self.navigation.subscribe(subscriber);
    }

    pub fn navigation_mode(&self) -> NavigationMode {
        self.registry
            .get(&self.layout)
            .map(|entry| entry.positioner.navigation_mode())
            .unwrap_or(NavigationMode::Grid)
    }

    fn after_move(&mut self, to: usize) {
        self.publish_active_changed(to);
        self.refresh_layout();
        if !self.browse.is_active() {
            self.request_camera(FitRequest::Focus(to));
        }
    }

    fn publish_active_changed(&self, global: usize) {
        if let Some(item) = self.index.get(global) {
            self.events.publish(ActiveItemChanged {
                item_id: item.id.clone(),
                global_index: global,
                category_index: item.category_index,
                item_index: item.item_index,
            });
        }
    }

    // ---- Section exit ----

    pub fn section_exit(&self) -> StoreReader<SectionExitState> {
        self.section_exit.reader()
    }

    fn open_section_exit(&mut self, category: usize) {
        if !self.section_exit.open(&self.index, category) {
            return;
        }
        self.drag.reset();

        let state = self.section_exit.state();
        self.events.publish(SectionExitShown {
            category_index: category,
            left: state.left_category.map(|n| n.index),
            right: state.right_category.map(|n| n.index),
        });

        // Settle the camera on the item the user is leaving from
        if !self.browse.is_active() {
            self.focus_active();
        }
    }

    pub fn highlight_exit(&mut self, side: Side) -> bool {
        self.section_exit.highlight(side)
    }

    /// Confirm the highlighted neighbour
    pub fn confirm_exit(&mut self) -> NavOutcome {
        let target = self.section_exit.confirm();
        self.finish_exit(target)
    }

    /// Jump straight to a neighbour
    pub fn select_exit(&mut self, side: Side) -> NavOutcome {
        let target = self.section_exit.select(side);
        self.finish_exit(target)
    }

    pub fn cancel_exit(&mut self) -> bool {
        let cancelled = self.section_exit.cancel();
        if cancelled {
            self.events.publish(SectionExitHidden { target: None });
        }
        cancelled
    }

    fn finish_exit(&mut self, target: Option<usize>) -> NavOutcome {
        let Some(category) = target else {
            return NavOutcome::Unchanged;
        };
        self.events.publish(SectionExitHidden {
            target: Some(category),
        });
        let outcome = self.navigation.jump_to_category(&self.index, category);
        if let Some(to) = outcome.moved_to() {
            self.after_move(to);
        }
        outcome
    }

    // ---- Layouts ----

    /// Register another layout. Replacing the active one re-lays out.
    pub fn register_layout(&mut self, positioner: Arc<dyn Positioner>, auto_browse: bool) {
        let replaces_active = positioner.name() == self.layout;
        self.registry.register(positioner, auto_browse);
        if replaces_active {
            self.frame.invalidate();
            self.refresh_layout();
        }
    }

    pub fn registry(&self) -> &PositionerRegistry {
        &self.registry
    }

    pub fn layout_name(&self) -> &str {
        &self.layout
    }

    /// Switch layouts, following browse-mode auto entry and exit
    pub fn set_layout(&mut self, name: &str) -> Result<()> {
        let entry = self.registry.get(name)?.clone();
        if name == self.layout {
            return Ok(());
        }

        let previous = std::mem::replace(&mut self.layout, name.to_string());
        let previous_auto = self
            .registry
            .get(&previous)
            .map(|e| e.auto_browse)
            .unwrap_or(false);
        info!(layout = name, previous = %previous, "Switching layout");
        self.events.publish(LayoutChanged {
            layout: name.to_string(),
            previous: Some(previous),
        });

        if entry.positioner.navigation_mode() != NavigationMode::Grid {
            self.cancel_exit();
        }

        self.refresh_layout();
        let transition = self.browse.follow_layout_switch(
            &mut self.rig,
            Some(previous_auto),
            entry.auto_browse,
            entry.positioner.browse_control(),
        );
        self.after_browse(transition);

        if !self.browse.is_active() {
            self.focus_active();
        }
        Ok(())
    }

    /// Switch to the next registered layout
    pub fn cycle_layout(&mut self) -> Result<String> {
        let next = self.registry.next_after(&self.layout)?.to_string();
        self.set_layout(&next)?;
        Ok(next)
    }

    /// Target transforms of the current layout
    pub fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.frame.snapshot()
    }

    /// Rendered, animated transforms
    pub fn animator(&self) -> &LayoutAnimator {
        &self.animator
    }

    fn refresh_layout(&mut self) {
        let positioner = match self.registry.get(&self.layout) {
            Ok(entry) => entry.positioner.clone(),
            Err(err) => {
                warn!(%err, "Active layout missing");
                return;
            }
        };

        let state = self.navigation.state();
        let ctx = LayoutContext::from_index(&self.index, &state, self.viewport);
        if !self
            .frame
            .refresh(positioner.as_ref(), &ctx, self.generation)
        {
            return;
        }
        let Some(snapshot) = self.frame.snapshot() else {
            return;
        };

        if let Some(bounds) = snapshot.overview_bounds() {
            let (min, max) = height_range_around(&bounds, self.config.orbit.overshoot);
            self.browse.orbit_mut().set_height_range(min, max);
        }

        match self.animator.retarget(snapshot) {
            Some(AnimationEvent::Started) => self.choreographer.layout_started(),
            Some(AnimationEvent::Settled) => {
                let scene = LayoutScene::new(self.frame.snapshot());
                self.choreographer.layout_settled(&mut self.rig, &scene);
            }
            None => {}
        }
    }

    // ---- Browse mode ----

    pub fn browse_state(&self) -> StoreReader<BrowseModeState> {
        self.browse.reader()
    }

    /// Enter browse mode with the layout's control scheme, or leave it
    /// restoring the camera
    pub fn toggle_browse(&mut self) -> BrowseTransition {
        let control = self
            .registry
            .get(&self.layout)
            .map(|entry| entry.positioner.browse_control())
            .unwrap_or_default();
        let transition = self.browse.toggle(&mut self.rig, control);
        self.after_browse(transition);
        transition
    }

    /// Leave browse mode where the camera is
    pub fn cancel_browse(&mut self) -> BrowseTransition {
        let transition = self.browse.cancel(&mut self.rig);
        self.after_browse(transition);
        transition
    }

    fn after_browse(&mut self, transition: BrowseTransition) {
        match transition {
            BrowseTransition::Entered(control) => {
                self.choreographer.preempt();
                self.drag.reset();
                self.orbit_pointer = None;
                if control != ControlType::Orbit {
                    self.request_camera(FitRequest::Overview);
                }
                self.events.publish(BrowseModeChanged {
                    active: true,
                    control_type: control,
                    restored: false,
                });
            }
            BrowseTransition::Exited { restored } => {
                self.choreographer.preempt();
                self.movement.clear();
                self.orbit_pointer = None;
                let control_type = self.browse.reader().with(|s| s.control_type);
                self.events.publish(BrowseModeChanged {
                    active: false,
                    control_type,
                    restored,
                });
            }
            BrowseTransition::Unchanged => {}
        }
    }

    // ---- Camera ----

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    pub fn camera_transition(&self) -> CameraTransition {
        self.choreographer.transition()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Viewport size in pixels changed
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        debug!(width, height, "Viewport resized");
        self.viewport = viewport;
        self.rig.set_aspect(viewport.aspect());
        self.refresh_layout();
        if !self.browse.is_active() {
            self.focus_active();
        }
    }

    fn focus_active(&mut self) {
        let request = match self.navigation.current(&self.index) {
            Some(global) => FitRequest::Focus(global),
            None => FitRequest::Overview,
        };
        self.request_camera(request);
    }

    fn request_camera(&mut self, request: FitRequest) {
        let scene = LayoutScene::new(self.frame.snapshot());
        self.choreographer.request(&mut self.rig, &scene, request);
    }

    /// Advance one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.browse.control_type() == Some(ControlType::FreeMove) {
            self.browse
                .free_move(&mut self.rig, self.movement.intent(), dt);
        }

        if self.animator.step(dt) == Some(AnimationEvent::Settled) {
            let scene = LayoutScene::new(self.frame.snapshot());
            self.choreographer.layout_settled(&mut self.rig, &scene);
        }

        self.rig.tick(dt);

        if let Some(focused_item) = self.choreographer.update(&mut self.rig) {
            debug!(?focused_item, "Camera settled");
            self.events.publish(CameraSettled { focused_item });
        }
    }

    // ---- Host hooks ----

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Enter/Space outside any modal
    pub fn on_toggle_focus(&mut self, f: impl FnMut() + Send + 'static) {
        self.callbacks.toggle_focus = Some(Box::new(f));
    }

    /// Escape outside any modal or browse mode
    pub fn on_escape(&mut self, f: impl FnMut() + Send + 'static) {
        self.callbacks.escape = Some(Box::new(f));
    }

    /// Wheel gestures past the threshold
    pub fn on_scroll(&mut self, f: impl FnMut(WheelAction) + Send + 'static) {
        self.callbacks.scroll = Some(Box::new(f));
    }
}
