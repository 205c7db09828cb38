//! Core functionality for the spatial navigation engine
//!
//! This crate provides the content index, the shared state containers
//! (navigation, browse mode, section exit), the event bus and the geometry
//! types every other crate speaks.

pub mod browse;
pub mod content;
pub mod events;
pub mod geometry;
pub mod navigation;
pub mod section_exit;
pub mod store;

// Re-export commonly used types
pub use browse::{BrowseModeState, ControlType};
pub use content::{
    flatten, find_index, resolve_active, Category, CategorySummary, ContentIndex, ContentItem,
    ContentPayload, ItemSlot,
};
pub use events::EventBus;
pub use geometry::{Aabb, CameraPose, Scale, Transform, WorldPose};
pub use navigation::{Direction, NavigationMode, NavigationState, NavigationSubscriber};
pub use section_exit::{NeighborCategory, SectionExitState, Side};
pub use store::{store, StateSubscriber, StoreReader, StoreWriter};
