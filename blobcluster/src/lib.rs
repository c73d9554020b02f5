//! blobcluster - animated cluster-force blob visualization.
//!
//! This crate reads simulation configs, runs the simulation headless, and
//! writes snapshots (SVG, PNG, JSON) or the interactive HTML page that hosts
//! the `blobcluster-viz` wasm module.

pub mod config_reader;
pub mod html_writer;
pub mod io;
pub mod json_writer;
pub mod png_writer;
pub mod session;
pub mod svg_writer;
