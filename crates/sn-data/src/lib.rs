//! Content manifests for the spatial navigation engine

pub mod manifest;
pub mod sources;

use std::path::PathBuf;

use thiserror::Error;

// Re-exports
pub use manifest::{parse_manifest, Manifest};
pub use sources::{ContentSource, FileSource, MemorySource};

/// Errors that can occur while loading content
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest has no categories")]
    EmptyManifest,
}

pub type Result<T> = std::result::Result<T, DataError>;
