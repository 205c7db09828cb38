//! Layout strategies for the spatial navigation engine
//!
//! A [`Positioner`] turns the flattened content, the active item and the
//! viewport into transforms. Strategies are registered by name in a
//! [`PositionerRegistry`] so navigation and camera code never depend on a
//! concrete layout.

mod animation;
mod frame;
mod pillar;
mod positioner;
mod registry;
mod stack;

pub use animation::{AnimationEvent, LayoutAnimator};
pub use frame::{compute_snapshot, LayoutFrame, LayoutSnapshot};
pub use pillar::{PillarOptions, PillarPositioner};
pub use positioner::{
    ActiveIndices, AnimationConfig, Easing, Framing, LayoutContext, Positioner, Viewport,
};
pub use registry::{LayoutEntry, PositionerRegistry};
pub use stack::{DeckZones, StackOptions, StackPositioner};

use thiserror::Error;

/// Errors that can occur when selecting layouts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("No layouts registered")]
    Empty,
}
