//! The positioner strategy interface

use glam::Vec2;
use serde::{Deserialize, Serialize};
use sn_core::{
    Aabb, CategorySummary, ContentIndex, ControlType, ItemSlot, NavigationMode, NavigationState,
    Transform,
};

/// Viewport size in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height; `1.0` for degenerate sizes
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite() {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// The active item in every index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveIndices {
    pub global: usize,
    pub category: usize,
    pub item: usize,
}

/// Everything a positioner may look at
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    pub slots: &'a [ItemSlot],
    pub categories: &'a [CategorySummary],
    /// `None` while the collection is empty
    pub active: Option<ActiveIndices>,
    pub viewport: Viewport,
}

impl<'a> LayoutContext<'a> {
    pub fn from_index<P>(
        index: &'a ContentIndex<P>,
        state: &NavigationState,
        viewport: Viewport,
    ) -> Self {
        let active = state.active_global_index(index).and_then(|global| {
            let item = index.get(global)?;
            Some(ActiveIndices {
                global,
                category: item.category_index,
                item: item.item_index,
            })
        });

        Self {
            slots: index.slots(),
            categories: index.categories(),
            active,
            viewport,
        }
    }

    pub fn item_count(&self) -> usize {
        self.slots.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn tallest_category_len(&self) -> usize {
        self.categories.iter().map(|c| c.len).max().unwrap_or(0)
    }

    pub fn is_active(&self, slot: &ItemSlot) -> bool {
        self.active.map(|a| a.global == slot.global_index).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// How transform changes should be animated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationConfig {
    Timed { duration_ms: u32, easing: Easing },
    Spring { tension: f32, friction: f32 },
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig::Spring {
            tension: 170.0,
            friction: 26.0,
        }
    }
}

/// World-space volumes a layout wants the camera to use instead of the
/// bounds of its items
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Framing {
    /// "Show everything" target
    pub overview: Option<Aabb>,
    /// Refinement target after focusing the active item
    pub focus: Option<Aabb>,
}

/// A layout strategy.
///
/// Implementations must be pure functions of their options and the context:
/// the same inputs always produce bit-identical transforms.
pub trait Positioner: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    fn navigation_mode(&self) -> NavigationMode;

    /// Camera control scheme used when browsing this layout
    fn browse_control(&self) -> ControlType;

    fn animation_config(&self) -> AnimationConfig;

    /// Unscaled width/height of one item card
    fn item_size(&self, ctx: &LayoutContext) -> Vec2;

    /// Transform for the whole positioned collection
    fn group_transform(&self, ctx: &LayoutContext) -> Transform;

    /// Transform of item `index` (global) inside the group. Out-of-range
    /// indices yield the identity.
    fn item_transform(&self, ctx: &LayoutContext, index: usize) -> Transform;

    fn framing(&self, _ctx: &LayoutContext) -> Framing {
        Framing::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOutCubic, Easing::EaseInOutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
            assert!((easing.apply(2.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_viewport_aspect() {
        assert_eq!(Viewport::new(0.0, 100.0).aspect(), 1.0);
        assert_eq!(Viewport::new(200.0, 100.0).aspect(), 2.0);
    }

    #[test]
    fn test_animation_config_json() {
        let config: AnimationConfig =
            serde_json::from_str(r#"{ "kind": "timed", "duration_ms": 300, "easing": "linear" }"#)
                .expect("valid config");
        assert_eq!(
            config,
            AnimationConfig::Timed {
                duration_ms: 300,
                easing: Easing::Linear
            }
        );
    }
}
