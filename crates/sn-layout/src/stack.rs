//! Deck layout: one pile per category side by side, the active item lifted
//! out of its pile into the content zone above the decks.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use sn_core::{Aabb, ControlType, NavigationMode, Scale, Transform};

use crate::positioner::{AnimationConfig, Easing, Framing, LayoutContext, Positioner};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackOptions {
    pub item_height: f32,
    pub min_aspect: f32,
    pub max_aspect: f32,
    /// Horizontal gap between piles
    pub category_gap: f32,
    /// Depth offset between consecutive cards of a pile
    pub deck_spacing: f32,
    pub floor_y: f32,
    /// Height of the zone idle piles sit in
    pub deck_zone_height: f32,
    /// Content zone height as a multiple of the deck zone height
    pub content_zone_multiple: f32,
    /// Scale of the raised active card
    pub active_scale: f32,
    pub duration_ms: u32,
    pub easing: Easing,
    pub navigation_mode: NavigationMode,
    pub browse_control: ControlType,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            item_height: 1.0,
            min_aspect: 0.6,
            max_aspect: 1.6,
            category_gap: 0.4,
            deck_spacing: 0.15,
            floor_y: 0.0,
            deck_zone_height: 1.5,
            content_zone_multiple: 3.0,
            active_scale: 2.0,
            duration_ms: 450,
            easing: Easing::EaseOutCubic,
            navigation_mode: NavigationMode::Grid,
            browse_control: ControlType::FreeMove,
        }
    }
}

/// The two vertical zones of the deck layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckZones {
    pub floor_y: f32,
    pub deck_top: f32,
    pub content_top: f32,
}

impl DeckZones {
    pub fn from_options(options: &StackOptions) -> Self {
        let deck_top = options.floor_y + options.deck_zone_height;
        Self {
            floor_y: options.floor_y,
            deck_top,
            content_top: deck_top + options.deck_zone_height * options.content_zone_multiple,
        }
    }

    pub fn content_center_y(&self) -> f32 {
        (self.deck_top + self.content_top) * 0.5
    }

    /// Vertical offset of the raised active item from the floor
    pub fn active_lift(&self) -> f32 {
        self.content_center_y() - self.floor_y
    }
}

pub struct StackPositioner {
    options: StackOptions,
    zones: DeckZones,
}

impl StackPositioner {
    pub const NAME: &'static str = "deck";

    pub fn new(options: StackOptions) -> Self {
        let zones = DeckZones::from_options(&options);
        Self { options, zones }
    }

    pub fn options(&self) -> &StackOptions {
        &self.options
    }

    pub fn zones(&self) -> DeckZones {
        self.zones
    }

    /// Local depth offset of a card within its pile
    pub fn deck_offset(&self, item_index: usize) -> f32 {
        item_index as f32 * self.options.deck_spacing
    }

    fn item_width(&self, ctx: &LayoutContext) -> f32 {
        let aspect = ctx
            .viewport
            .aspect()
            .clamp(self.options.min_aspect, self.options.max_aspect);
        self.options.item_height * aspect
    }

    /// X of a pile, piles centred on the origin
    fn pile_x(&self, ctx: &LayoutContext, category_index: usize) -> f32 {
        let stride = self.item_width(ctx) + self.options.category_gap;
        let centre = (ctx.category_count().saturating_sub(1)) as f32 * 0.5;
        (category_index as f32 - centre) * stride
    }

    fn active_z(&self) -> f32 {
        self.options.deck_spacing
    }
}

impl Default for StackPositioner {
    fn default() -> Self {
        Self::new(StackOptions::default())
    }
}

impl Positioner for StackPositioner {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn navigation_mode(&self) -> NavigationMode {
        self.options.navigation_mode
    }

    fn browse_control(&self) -> ControlType {
        self.options.browse_control
    }

    fn animation_config(&self) -> AnimationConfig {
        AnimationConfig::Timed {
            duration_ms: self.options.duration_ms,
            easing: self.options.easing,
        }
    }

    fn item_size(&self, ctx: &LayoutContext) -> Vec2 {
        Vec2::new(self.item_width(ctx), self.options.item_height)
    }

    fn group_transform(&self, _ctx: &LayoutContext) -> Transform {
        Transform::IDENTITY
    }

    fn item_transform(&self, ctx: &LayoutContext, index: usize) -> Transform {
        let Some(slot) = ctx.slots.get(index) else {
            return Transform::IDENTITY;
        };
        let x = self.pile_x(ctx, slot.category_index);

        if ctx.is_active(slot) {
            let y = self.zones.floor_y + self.zones.active_lift();
            return Transform::from_position(Vec3::new(x, y, self.active_z()))
                .with_scale(Scale::Uniform(self.options.active_scale));
        }

        let y = self.zones.floor_y + self.options.item_height * 0.5;
        Transform::from_position(Vec3::new(x, y, -self.deck_offset(slot.item_index)))
    }

    fn framing(&self, ctx: &LayoutContext) -> Framing {
        if ctx.category_count() == 0 {
            return Framing::default();
        }

        let width = self.item_width(ctx);
        let half_width = width * 0.5;
        let left = self.pile_x(ctx, 0) - half_width;
        let right = self.pile_x(ctx, ctx.category_count() - 1) + half_width;
        let deepest = self.deck_offset(ctx.tallest_category_len().saturating_sub(1));

        // Both zones, every pile
        let overview = Aabb::new(
            Vec3::new(left, self.zones.floor_y, -deepest),
            Vec3::new(right, self.zones.content_top, self.active_z()),
        );

        // Content zone only, around the active pile
        let focus = ctx.active.map(|active| {
            let x = self.pile_x(ctx, active.category);
            let half = half_width * self.options.active_scale;
            Aabb::new(
                Vec3::new(x - half, self.zones.deck_top, self.active_z()),
                Vec3::new(x + half, self.zones.content_top, self.active_z()),
            )
        });

        Framing {
            overview: Some(overview),
            focus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positioner::{ActiveIndices, Viewport};
    use sn_core::{CategorySummary, ItemSlot};

    fn fixture(sizes: &[usize]) -> (Vec<ItemSlot>, Vec<CategorySummary>) {
        let mut slots = Vec::new();
        let mut categories = Vec::new();
        for (c, &len) in sizes.iter().enumerate() {
            categories.push(CategorySummary {
                index: c,
                id: format!("c{}", c),
                title: None,
                start: slots.len(),
                len,
            });
            for i in 0..len {
                slots.push(ItemSlot {
                    category_index: c,
                    item_index: i,
                    global_index: slots.len(),
                });
            }
        }
        (slots, categories)
    }

    #[test]
    fn test_deck_depth_offsets() {
        let (slots, categories) = fixture(&[4]);
        let ctx = LayoutContext {
            slots: &slots,
            categories: &categories,
            active: Some(ActiveIndices { global: 0, category: 0, item: 0 }),
            viewport: Viewport::default(),
        };
        let stack = StackPositioner::default();

        assert!((stack.deck_offset(3) - 0.45).abs() < 1e-6);
        assert!((stack.item_transform(&ctx, 3).position.z + 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_active_item_is_lifted_into_content_zone() {
        let (slots, categories) = fixture(&[2, 3]);
        let ctx = LayoutContext {
            slots: &slots,
            categories: &categories,
            active: Some(ActiveIndices { global: 3, category: 1, item: 1 }),
            viewport: Viewport::default(),
        };
        let stack = StackPositioner::default();
        let zones = stack.zones();

        let active = stack.item_transform(&ctx, 3);
        assert!((active.position.y - (zones.floor_y + zones.active_lift())).abs() < 1e-6);
        assert!((active.position.y - zones.content_center_y()).abs() < 1e-6);
        assert_eq!(active.scale, Scale::Uniform(2.0));

        let idle = stack.item_transform(&ctx, 2);
        assert!(idle.position.y < zones.deck_top);
        assert_eq!(idle.position.x, active.position.x);
    }

    #[test]
    fn test_piles_are_spaced_by_width_and_gap() {
        let (slots, categories) = fixture(&[1, 1, 1]);
        let ctx = LayoutContext {
            slots: &slots,
            categories: &categories,
            active: None,
            viewport: Viewport::new(1000.0, 1000.0),
        };
        let stack = StackPositioner::default();
        let a = stack.item_transform(&ctx, 0).position.x;
        let b = stack.item_transform(&ctx, 1).position.x;
        let c = stack.item_transform(&ctx, 2).position.x;
        assert!((b - a - 1.4).abs() < 1e-5);
        assert!(b.abs() < 1e-6);
        assert!((c - b - 1.4).abs() < 1e-5);
    }

    #[test]
    fn test_framing_spans_both_zones() {
        let (slots, categories) = fixture(&[2, 0, 3]);
        let ctx = LayoutContext {
            slots: &slots,
            categories: &categories,
            active: Some(ActiveIndices { global: 0, category: 0, item: 0 }),
            viewport: Viewport::default(),
        };
        let stack = StackPositioner::default();
        let zones = stack.zones();
        let framing = stack.framing(&ctx);

        let overview = framing.overview.expect("overview volume");
        assert_eq!(overview.min.y, zones.floor_y);
        assert_eq!(overview.max.y, zones.content_top);

        let focus = framing.focus.expect("focus volume");
        assert_eq!(focus.min.y, zones.deck_top);
        assert!(overview.contains(focus.center()));
    }
}
