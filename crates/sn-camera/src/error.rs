use thiserror::Error;

/// Geometry and rig failures. None of these are fatal; the choreographer
/// turns them into fallback framings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Item {index} out of range ({count} items)")]
    ItemOutOfRange { index: usize, count: usize },

    #[error("Geometry unavailable: {0}")]
    GeometryUnavailable(String),

    #[error("Non-finite geometry for item {0}")]
    NonFiniteGeometry(usize),

    #[error("Nothing to frame")]
    NothingToFrame,
}

pub type Result<T> = std::result::Result<T, CameraError>;
