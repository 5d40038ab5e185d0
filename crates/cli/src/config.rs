//! Station configuration file
//!
//! `config.json` keeps the capture schedule keys at the top level, the way
//! the station has always written it; analysis thresholds sit under an
//! optional `analysis` object.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use canopy_algorithms::AnalysisConfig;
use canopy_core::schedule::ScheduleConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
}

impl StationConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Load `path`, falling back to defaults when it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Error loading config: {e:#}. Using defaults");
                Self::default()
            }
        }
    }
}
