//! Circular column layout: one angular sector per category, items stacked
//! vertically inside each sector.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use sn_core::{ControlType, NavigationMode, Transform};

use crate::positioner::{AnimationConfig, LayoutContext, Positioner};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PillarOptions {
    /// Card height in world units
    pub item_height: f32,
    /// Vertical distance between consecutive items of a category
    pub item_spacing: f32,
    /// Card aspect is the viewport aspect clamped to this range
    pub min_aspect: f32,
    pub max_aspect: f32,
    pub tension: f32,
    pub friction: f32,
    pub browse_control: ControlType,
}

impl Default for PillarOptions {
    fn default() -> Self {
        Self {
            item_height: 0.85,
            item_spacing: 1.0,
            min_aspect: 0.6,
            max_aspect: 1.6,
            tension: 170.0,
            friction: 26.0,
            browse_control: ControlType::Orbit,
        }
    }
}

pub struct PillarPositioner {
    options: PillarOptions,
}

impl PillarPositioner {
    pub const NAME: &'static str = "pillar";

    pub fn new(options: PillarOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PillarOptions {
        &self.options
    }

    fn item_width(&self, ctx: &LayoutContext) -> f32 {
        let aspect = ctx
            .viewport
            .aspect()
            .clamp(self.options.min_aspect, self.options.max_aspect);
        self.options.item_height * aspect
    }

    /// `halfItemWidth / sin(π / categoryCount)`, with the count floored at 2
    pub fn radius(&self, ctx: &LayoutContext) -> f32 {
        let sectors = ctx.category_count().max(2) as f32;
        (self.item_width(ctx) * 0.5) / (PI / sectors).sin()
    }

    /// Angle of a category's sector around the Y axis
    pub fn sector_angle(&self, ctx: &LayoutContext, category_index: usize) -> f32 {
        let count = ctx.category_count().max(1) as f32;
        category_index as f32 * TAU / count
    }
}

impl Default for PillarPositioner {
    fn default() -> Self {
        Self::new(PillarOptions::default())
    }
}

impl Positioner for PillarPositioner {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn navigation_mode(&self) -> NavigationMode {
        NavigationMode::Grid
    }

    fn browse_control(&self) -> ControlType {
        self.options.browse_control
    }

    fn animation_config(&self) -> AnimationConfig {
        AnimationConfig::Spring {
            tension: self.options.tension,
            friction: self.options.friction,
        }
    }

    fn item_size(&self, ctx: &LayoutContext) -> Vec2 {
        Vec2::new(self.item_width(ctx), self.options.item_height)
    }

    /// Recentres the column vertically around the origin
    fn group_transform(&self, ctx: &LayoutContext) -> Transform {
        let rows = ctx.tallest_category_len().saturating_sub(1) as f32;
        Transform::from_position(Vec3::new(0.0, rows * self.options.item_spacing * 0.5, 0.0))
    }

    fn item_transform(&self, ctx: &LayoutContext, index: usize) -> Transform {
        let Some(slot) = ctx.slots.get(index) else {
            return Transform::IDENTITY;
        };

        let radius = self.radius(ctx);
        let angle = self.sector_angle(ctx, slot.category_index);
        let y = -(slot.item_index as f32) * self.options.item_spacing;

        // Facing outward: local +Z rotated by the sector angle
        Transform::from_position(Vec3::new(radius * angle.sin(), y, radius * angle.cos()))
            .with_rotation(Vec3::new(0.0, angle, 0.0))
    }
}
