//! Session configuration
//!
//! Loaded from an optional JSON file; every key may be omitted. Binaries layer
//! command line overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::inputs::{CallMetadata, Inputs};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Starting values for the calculator inputs
    #[serde(default)]
    pub inputs: Inputs,

    /// Starting call metadata (client, rep, date, endpoint)
    #[serde(default)]
    pub call: CallMetadata,

    /// Directory CSV exports are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// How long save statuses stay visible, in milliseconds
    #[serde(default = "default_status_clear_delay_ms")]
    pub status_clear_delay_ms: u64,
}

fn default_export_dir() -> PathBuf { PathBuf::from(".") }
fn default_status_clear_delay_ms() -> u64 { 2000 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inputs: Inputs::default(),
            call: CallMetadata::default(),
            export_dir: default_export_dir(),
            status_clear_delay_ms: default_status_clear_delay_ms(),
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON text. Inputs are clamped into their domains.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: SessionConfig = serde_json::from_str(text)?;
        config.inputs = config.inputs.sanitized();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn status_clear_delay(&self) -> Duration {
        Duration::from_millis(self.status_clear_delay_ms)
    }
}
