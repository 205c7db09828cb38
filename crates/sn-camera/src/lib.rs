//! Camera choreography for the spatial navigation engine
//!
//! The choreographer drives any [`CameraRig`] toward framings computed from a
//! [`SceneQuery`]. Browse mode temporarily detaches the camera from the
//! active item and hands it to orbit or free-move controls.

pub mod browse;
pub mod choreographer;
pub mod error;
pub mod free_move;
pub mod orbit;
pub mod rig;

pub use browse::{BrowseMachine, BrowseTransition};
pub use choreographer::{CameraChoreographer, CameraConfig, CameraTransition, FitRequest};
pub use error::CameraError;
pub use free_move::{FreeMoveConfig, FreeMoveControls, MoveIntent};
pub use orbit::{height_range_around, OrbitConfig, OrbitControls};
pub use rig::{CameraRig, SceneQuery, SmoothCamera};
