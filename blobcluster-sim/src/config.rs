//! Simulation configuration
//!
//! Every field has a default, so an empty YAML or JSON document is a valid
//! configuration that reproduces the stock two-cluster scene.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorScale, Rgb};

/// Errors raised when a configuration cannot drive a simulation
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// At least one cluster is required
    #[error("cluster count must be at least 1")]
    NoClusters,

    /// Every cluster needs at least one node to act as its representative
    #[error("node count {nodes} is smaller than cluster count {clusters}")]
    TooFewNodes { nodes: usize, clusters: usize },

    /// Radii must be positive and ordered
    #[error("invalid radius range: min {min}, max {max}")]
    InvalidRadius { min: f64, max: f64 },

    /// Canvas dimensions must be positive
    #[error("invalid canvas size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    /// Every numeric setting must be a finite number
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    /// A colour string could not be parsed
    #[error("invalid colour: {0}")]
    InvalidColor(String),

    /// The colour range needs exactly two endpoints
    #[error("expected 2 colours, got {0}")]
    ColorCount(usize),
}

/// Configuration for a cluster simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Total number of nodes
    pub nodes: usize,
    /// Number of distinct clusters
    pub clusters: usize,
    /// Separation between same-cluster nodes (negative allows overlap)
    pub padding: f64,
    /// Separation between nodes of different clusters
    pub cluster_padding: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Colour range endpoints for the blend scale
    pub colors: Vec<String>,
    /// Pull toward the canvas centre
    pub gravity: f64,
    /// Velocity retention per integration step
    pub friction: f64,
    /// Attractor strength; the attractor alpha is `attraction * alpha^2`
    pub attraction: f64,
    /// Fixed alpha used by the collision resolver
    pub collision_alpha: f64,
    /// Extra distance past the separation threshold where blending kicks in
    pub blend_band: f64,
    /// Duration of the radius grow-in transition
    pub grow_in_ms: f64,
    /// Per-node delay of the grow-in transition
    pub grow_in_stagger_ms: f64,
    /// Seed for node generation and mark selection; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            nodes: 40,
            clusters: 2,
            padding: -1.0,
            cluster_padding: -11.0,
            min_radius: 15.0,
            max_radius: 20.0,
            colors: vec!["red".to_string(), "blue".to_string()],
            gravity: 0.02,
            friction: 0.9,
            attraction: 10.0,
            collision_alpha: 0.1,
            blend_band: 3.0,
            grow_in_ms: 750.0,
            grow_in_stagger_ms: 5.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Numeric settings by field name
    fn numeric_fields(&self) -> [(&'static str, f64); 13] {
        [
            ("width", self.width),
            ("height", self.height),
            ("padding", self.padding),
            ("cluster_padding", self.cluster_padding),
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("attraction", self.attraction),
            ("collision_alpha", self.collision_alpha),
            ("blend_band", self.blend_band),
            ("grow_in_ms", self.grow_in_ms),
            ("grow_in_stagger_ms", self.grow_in_stagger_ms),
        ]
    }

    /// Check that the configuration can build a simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((field, _)) = self
            .numeric_fields()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(ConfigError::NonFinite { field });
        }
        if self.clusters == 0 {
            return Err(ConfigError::NoClusters);
        }
        if self.nodes < self.clusters {
            return Err(ConfigError::TooFewNodes {
                nodes: self.nodes,
                clusters: self.clusters,
            });
        }
        if !(self.min_radius > 0.0 && self.max_radius >= self.min_radius) {
            return Err(ConfigError::InvalidRadius {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        self.color_scale()?;
        Ok(())
    }

    /// Build the blend colour scale over the domain `[0, 1]`
    pub fn color_scale(&self) -> Result<ColorScale, ConfigError> {
        match self.colors.as_slice() {
            [from, to] => Ok(ColorScale::new(Rgb::parse(from)?, Rgb::parse(to)?)),
            other => Err(ConfigError::ColorCount(other.len())),
        }
    }
}
