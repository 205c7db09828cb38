//! Spatial navigation engine
//!
//! Ties the content index, navigation controllers, layout strategies and
//! camera choreography into one [`SpatialEngine`]. Hosts load content, feed
//! input events, call [`SpatialEngine::tick`] once per frame and render the
//! animated transforms.

mod engine;

pub mod config;
pub mod error;
pub mod scene;

pub use config::EngineConfig;
pub use engine::SpatialEngine;
pub use error::{EngineError, Result};
pub use scene::LayoutScene;
