//! Computed layout output and its cache

use glam::{Vec2, Vec3};
use sn_core::{Aabb, ControlType, NavigationMode, Transform, WorldPose};
use tracing::trace;

use crate::positioner::{ActiveIndices, AnimationConfig, Framing, LayoutContext, Positioner, Viewport};

/// Card thickness used for bounds
const CARD_DEPTH: f32 = 0.01;

/// Everything one positioner produced for one set of inputs
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub layout: String,
    pub mode: NavigationMode,
    pub control: ControlType,
    pub animation: AnimationConfig,
    pub group: Transform,
    pub items: Vec<Transform>,
    pub item_size: Vec2,
    pub framing: Framing,
}

impl LayoutSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn world_pose(&self, index: usize) -> Option<WorldPose> {
        self.items
            .get(index)
            .map(|item| WorldPose::compose(&self.group, item))
    }

    /// World bounds of one card
    pub fn item_bounds(&self, index: usize) -> Option<Aabb> {
        let item = self.items.get(index)?;
        let local = Aabb::from_center_size(
            Vec3::ZERO,
            Vec3::new(self.item_size.x, self.item_size.y, CARD_DEPTH),
        );
        Some(local.transformed(&(self.group.matrix() * item.matrix())))
    }

    /// Union of all card bounds
    pub fn content_bounds(&self) -> Option<Aabb> {
        (0..self.items.len())
            .filter_map(|i| self.item_bounds(i))
            .reduce(|a, b| a.union(&b))
    }

    /// Layout-provided overview volume, else the content bounds
    pub fn overview_bounds(&self) -> Option<Aabb> {
        self.framing
            .overview
            .map(|b| b.transformed(&self.group.matrix()))
            .or_else(|| self.content_bounds())
    }

    /// Layout-provided focus volume in world space
    pub fn focus_bounds(&self) -> Option<Aabb> {
        self.framing.focus.map(|b| b.transformed(&self.group.matrix()))
    }
}

/// Run a positioner over a context
pub fn compute_snapshot(positioner: &dyn Positioner, ctx: &LayoutContext) -> LayoutSnapshot {
    let items = (0..ctx.item_count())
        .map(|i| positioner.item_transform(ctx, i))
        .collect();

    LayoutSnapshot {
        layout: positioner.name().to_string(),
        mode: positioner.navigation_mode(),
        control: positioner.browse_control(),
        animation: positioner.animation_config(),
        group: positioner.group_transform(ctx),
        items,
        item_size: positioner.item_size(ctx),
        framing: positioner.framing(ctx),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FrameKey {
    layout: String,
    generation: u64,
    active: Option<ActiveIndices>,
    viewport: Viewport,
    item_count: usize,
}

/// Caches the last snapshot and recomputes only when an input changed
#[derive(Debug, Default)]
pub struct LayoutFrame {
    key: Option<FrameKey>,
    snapshot: Option<LayoutSnapshot>,
}

impl LayoutFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute if any input differs from the cached one. Returns `true`
    /// when a new snapshot was produced.
    pub fn refresh(
        &mut self,
        positioner: &dyn Positioner,
        ctx: &LayoutContext,
        generation: u64,
    ) -> bool {
        let key = FrameKey {
            layout: positioner.name().to_string(),
            generation,
            active: ctx.active,
            viewport: ctx.viewport,
            item_count: ctx.item_count(),
        };

        if self.key.as_ref() == Some(&key) && self.snapshot.is_some() {
            return false;
        }

        trace!(layout = %key.layout, generation, "Recomputing layout");
        self.snapshot = Some(compute_snapshot(positioner, ctx));
        self.key = Some(key);
        true
    }

    pub fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
