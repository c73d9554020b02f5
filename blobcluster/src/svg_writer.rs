//! SVG Writer
//!
//! The retained vector layer rendered to a standalone SVG document: one
//! `<circle>` per node keyed by node id, plus a label for each marked node.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use askama::Template;
use blobcluster_sim::{MARK_CLASS, Rgb, Shape, ShapeSink, draw_shapes};
use tracing::debug;

use crate::io::{IoError, IoResult, Writer};
use crate::session::Session;

/// Output file name inside the target directory
pub const SVG_FILE: &str = "blobcluster.svg";

/// Compact number formatting: at most two decimals, no trailing zeros
fn num(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// One retained element with its numbers already formatted
struct SvgCircle {
    id: usize,
    class: String,
    cx: String,
    cy: String,
    r: String,
    marked: bool,
    label: String,
}

#[derive(Template)]
#[template(path = "snapshot.svg")]
struct SvgTemplate<'a> {
    width: String,
    height: String,
    palette: &'a [Rgb; 2],
    mark_class: &'a str,
    circles: Vec<SvgCircle>,
}

/// In-memory SVG layer
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    /// Fills for the `red` and `blue` marker classes
    palette: [Rgb; 2],
    elements: BTreeMap<usize, Shape>,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64, palette: [Rgb; 2]) -> Self {
        Self {
            width,
            height,
            palette,
            elements: BTreeMap::new(),
        }
    }

    /// Number of retained elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the layer
    pub fn render(&self) -> IoResult<String> {
        let circles = self
            .elements
            .values()
            .map(|shape| SvgCircle {
                id: shape.id,
                class: shape.class_attr(),
                cx: num(shape.cx),
                cy: num(shape.cy),
                r: num(shape.r),
                marked: shape.marked,
                label: shape.label(),
            })
            .collect();
        let template = SvgTemplate {
            width: num(self.width),
            height: num(self.height),
            palette: &self.palette,
            mark_class: MARK_CLASS,
            circles,
        };
        template.render().map_err(|e| IoError::Write(e.to_string()))
    }
}

impl ShapeSink for SvgDocument {
    fn update(&mut self, shape: &Shape) {
        self.elements.insert(shape.id, shape.clone());
    }
}

/// Writer for the SVG snapshot
pub struct SvgWriter;

impl SvgWriter {
    /// Create a new SVG writer
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for SvgWriter {
    fn write(&self, session: &Session, output: &Path) -> IoResult<()> {
        fs::create_dir_all(output)?;

        let config = session.config();
        let scale = config.color_scale()?;
        let mut document = SvgDocument::new(
            config.width,
            config.height,
            [scale.apply(0.0), scale.apply(1.0)],
        );
        draw_shapes(&mut document, &session.shapes());

        let path = output.join(SVG_FILE);
        fs::write(&path, document.render()?).map_err(IoError::Io)?;
        debug!(path = %path.display(), elements = document.len(), "wrote svg");
        Ok(())
    }

    fn format_id(&self) -> &str {
        "svg"
    }
}
