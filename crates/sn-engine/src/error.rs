use std::path::PathBuf;

use sn_layout::LayoutError;
use thiserror::Error;

/// Errors surfaced by the engine facade
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
