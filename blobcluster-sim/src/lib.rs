//! blobcluster-sim: cluster-force simulation core
//!
//! Nodes belong to clusters and are drawn as circles. Every tick, each node is
//! pulled toward its cluster's largest node, overlapping nodes are pushed
//! apart, and a per-node blend value drifts between cluster colours depending
//! on who it touches. The crate is renderer-agnostic: frames are captured as
//! [`Shape`]s and pushed into a [`ShapeSink`] and a [`RasterSink`].
//!
//! # Example
//!
//! ```
//! use blobcluster_sim::{Controller, SimulationConfig};
//!
//! let mut controller = Controller::new(&SimulationConfig::default(), 7).unwrap();
//! controller.run(50);
//! assert!(controller.toggle());
//! assert_eq!(controller.playback().marks().len(), 2);
//! ```

pub mod attractor;
pub mod color;
pub mod config;
pub mod controller;
pub mod layout;
pub mod node;
pub mod pack;
pub mod playback;
pub mod quadtree;
pub mod render;
pub mod resolver;
pub mod state;
pub mod transition;

pub use color::{ColorScale, Rgb};
pub use config::{ConfigError, SimulationConfig};
pub use controller::{ClusterForces, Controller};
pub use layout::{ForceLayout, TickEvent, TickObserver};
pub use node::Node;
pub use pack::PackLayout;
pub use playback::{MARK_CLASS, MarkerClass, Playback};
pub use render::{RasterSink, Shape, ShapeSink, draw_raster, draw_shapes};
pub use resolver::CollisionResolver;
pub use state::SimulationState;
pub use transition::GrowIn;
