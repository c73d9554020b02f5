//! Configuration readers
//!
//! Reads simulation settings from YAML or JSON. Missing fields take their
//! defaults, so an empty document describes the stock scene.

use std::fs;
use std::path::Path;

use blobcluster_sim::SimulationConfig;
use tracing::debug;

use crate::io::{IoError, IoResult, Reader};

/// Reader for YAML configuration files
pub struct YamlConfigReader;

impl YamlConfigReader {
    /// Create a new YAML reader
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlConfigReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for YamlConfigReader {
    fn read(&self, input: &Path) -> IoResult<SimulationConfig> {
        let content = fs::read_to_string(input)?;
        // serde_yaml rejects an empty document, which should mean "all defaults"
        if content.trim().is_empty() {
            debug!(path = %input.display(), "empty config, using defaults");
            return Ok(SimulationConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Reader for JSON configuration files
pub struct JsonConfigReader;

impl JsonConfigReader {
    /// Create a new JSON reader
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonConfigReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for JsonConfigReader {
    fn read(&self, input: &Path) -> IoResult<SimulationConfig> {
        let content = fs::read_to_string(input)?;
        serde_json::from_str(&content).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
