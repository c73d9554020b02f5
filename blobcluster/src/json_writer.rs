//! JSON Writer
//!
//! Dumps the simulation state for inspection or diffing between runs.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::io::{IoError, IoResult, Writer};
use crate::session::Session;

/// Output file name inside the target directory
pub const JSON_FILE: &str = "blobcluster.json";

#[derive(Debug, Serialize)]
pub struct NodeSnapshot {
    pub id: usize,
    pub cluster: usize,
    pub blend: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    pub fill: String,
}

#[derive(Debug, Serialize)]
pub struct StateSnapshot {
    pub seed: u64,
    pub ticks: u64,
    pub alpha: f64,
    pub paused: bool,
    pub nodes: Vec<NodeSnapshot>,
}

impl StateSnapshot {
    pub fn capture(session: &Session) -> Self {
        let controller = session.controller();
        let nodes = controller
            .state()
            .nodes
            .iter()
            .zip(session.shapes())
            .map(|(node, shape)| NodeSnapshot {
                id: node.id(),
                cluster: node.cluster(),
                blend: node.blend,
                radius: node.radius(),
                x: node.x,
                y: node.y,
                fill: shape.fill.to_string(),
            })
            .collect();

        Self {
            seed: session.seed(),
            ticks: controller.ticks(),
            alpha: controller.layout().alpha(),
            paused: controller.is_paused(),
            nodes,
        }
    }
}

/// Writer for the JSON state dump
pub struct JsonWriter;

impl JsonWriter {
    /// Create a new JSON writer
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for JsonWriter {
    fn write(&self, session: &Session, output: &Path) -> IoResult<()> {
        fs::create_dir_all(output)?;

        let snapshot = StateSnapshot::capture(session);
        let json =
            serde_json::to_string_pretty(&snapshot).map_err(|e| IoError::Write(e.to_string()))?;
        fs::write(output.join(JSON_FILE), json).map_err(IoError::Io)?;
        Ok(())
    }

    fn format_id(&self) -> &str {
        "json"
    }
}
