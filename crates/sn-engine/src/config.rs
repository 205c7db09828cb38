//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use sn_camera::{CameraConfig, FreeMoveConfig, OrbitConfig};
use sn_input::InputConfig;
use sn_layout::{PillarOptions, PillarPositioner, StackOptions};
use tracing::info;

use crate::error::{EngineError, Result};

/// Everything tunable, each field defaulted so partial files load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub input: InputConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub free_move: FreeMoveConfig,
    pub pillar: PillarOptions,
    pub stack: StackOptions,
    /// Switching into the deck layout enters browse mode
    pub deck_auto_browse: bool,
    pub initial_layout: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            free_move: FreeMoveConfig::default(),
            pillar: PillarOptions::default(),
            stack: StackOptions::default(),
            deck_auto_browse: true,
            initial_layout: PillarPositioner::NAME.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), layout = %config.initial_layout, "Loaded engine config");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
