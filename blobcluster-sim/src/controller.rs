//! Simulation controller
//!
//! Owns the state, the integrator, the cluster forces and playback, and is the
//! only place where a frame advances.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::attractor;
use crate::color::ColorScale;
use crate::config::{ConfigError, SimulationConfig};
use crate::layout::{ForceLayout, TickEvent, TickObserver};
use crate::pack::PackLayout;
use crate::playback::{MarkerClass, Playback};
use crate::render::{RasterSink, Shape, ShapeSink, draw_raster, draw_shapes};
use crate::resolver::CollisionResolver;
use crate::state::SimulationState;
use crate::transition::GrowIn;

/// Cluster attraction followed by collision resolution, run on every tick
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterForces {
    /// Attractor alpha is `attraction * alpha^2`
    pub attraction: f64,
    /// Fixed resolver alpha
    pub collision_alpha: f64,
    pub resolver: CollisionResolver,
}

impl ClusterForces {
    pub fn from_config(config: &SimulationConfig, state: &SimulationState) -> Self {
        Self {
            attraction: config.attraction,
            collision_alpha: config.collision_alpha,
            resolver: CollisionResolver::from_config(config, state),
        }
    }
}

impl TickObserver for ClusterForces {
    fn on_tick(&mut self, state: &mut SimulationState, event: TickEvent) {
        attractor::attract(state, self.attraction * event.alpha * event.alpha);
        self.resolver.resolve(state, self.collision_alpha);
    }
}

/// Drives one simulation session
#[derive(Debug, Clone)]
pub struct Controller {
    state: SimulationState,
    layout: ForceLayout,
    forces: ClusterForces,
    playback: Playback,
    grow: GrowIn,
    colors: ColorScale,
    rng: StdRng,
    ticks: u64,
}

impl Controller {
    /// Generate, pack and start a simulation
    pub fn new(config: &SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = SimulationState::generate(config, &mut rng);
        PackLayout::new(config.width, config.height).apply(&mut state);
        info!(
            nodes = config.nodes,
            clusters = config.clusters,
            seed,
            "simulation created"
        );
        Self::with_state(config, state, rng)
    }

    /// Start a simulation over existing, already placed nodes
    pub fn with_state(
        config: &SimulationConfig,
        mut state: SimulationState,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        let colors = config.color_scale()?;
        let forces = ClusterForces::from_config(config, &state);
        let mut layout = ForceLayout::from_config(config);
        layout.start(&mut state);

        Ok(Self {
            state,
            layout,
            forces,
            playback: Playback::new(),
            grow: GrowIn::from_config(config),
            colors,
            rng,
            ticks: 0,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn layout(&self) -> &ForceLayout {
        &self.layout
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn grow_in(&self) -> &GrowIn {
        &self.grow
    }

    /// Number of ticks emitted so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.playback.is_paused()
    }

    /// Advance one frame. Returns whether anything moved; a paused or cooled
    /// simulation leaves every node untouched.
    pub fn advance(&mut self) -> bool {
        if self.playback.is_paused() {
            return false;
        }
        let ticked = self
            .layout
            .step(&mut self.state, &mut self.forces)
            .is_some();
        if ticked {
            self.ticks += 1;
        }
        ticked
    }

    /// Advance until the layout cools or `max_ticks` frames have run.
    /// Returns the number of ticks emitted.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut ran = 0;
        while ran < max_ticks && self.advance() {
            ran += 1;
        }
        debug!(ticks = ran, alpha = self.layout.alpha(), "run finished");
        ran
    }

    /// Flip play/pause. Returns the new paused flag.
    pub fn toggle(&mut self) -> bool {
        self.playback.toggle(&self.state, &mut self.rng)
    }

    /// Capture the current frame
    pub fn frame(&self, elapsed_ms: f64) -> Vec<Shape> {
        self.state
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| Shape {
                id: node.id(),
                cx: node.x,
                cy: node.y,
                r: self.grow.radius(index, node.radius(), elapsed_ms),
                class: MarkerClass::for_cluster(node.cluster()),
                marked: self.playback.is_marked(index),
                fill: self.colors.apply(node.blend),
            })
            .collect()
    }

    pub fn draw_shapes<S: ShapeSink + ?Sized>(&self, sink: &mut S, elapsed_ms: f64) {
        draw_shapes(sink, &self.frame(elapsed_ms));
    }

    pub fn draw_raster<R: RasterSink + ?Sized>(&self, sink: &mut R, elapsed_ms: f64) {
        draw_raster(sink, &self.frame(elapsed_ms));
    }

    /// Capture the current frame once and push it into both layers
    pub fn draw<S, R>(&self, shapes: &mut S, raster: &mut R, elapsed_ms: f64)
    where
        S: ShapeSink + ?Sized,
        R: RasterSink + ?Sized,
    {
        let frame = self.frame(elapsed_ms);
        draw_shapes(shapes, &frame);
        draw_raster(raster, &frame);
    }

    /// Topmost node under a point
    pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
        self.state.nodes.iter().rposition(|node| node.contains(x, y))
    }

    pub fn drag_start(&mut self, index: usize) {
        if !self.is_paused() {
            self.layout.drag_start(&mut self.state, index);
        }
    }

    pub fn drag_to(&mut self, index: usize, x: f64, y: f64) {
        if !self.is_paused() {
            self.layout.drag_to(&mut self.state, index, x, y);
        }
    }

    pub fn drag_end(&mut self, index: usize) {
        self.layout.drag_end(&mut self.state, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn controller() -> Controller {
        Controller::new(&SimulationConfig::default(), 42).unwrap()
    }

    fn positions(c: &Controller) -> Vec<(f64, f64, f64)> {
        c.state().nodes.iter().map(|n| (n.x, n.y, n.blend)).collect()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SimulationConfig {
            clusters: 0,
            ..Default::default()
        };
        assert!(matches!(
            Controller::new(&config, 1),
            Err(ConfigError::NoClusters)
        ));
    }

    #[test]
    fn rejects_infinite_canvas() {
        let config = SimulationConfig {
            width: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            Controller::new(&config, 1),
            Err(ConfigError::NonFinite { field: "width" })
        ));
    }

    #[test]
    fn positions_stay_finite() {
        let mut c = controller();
        c.run(300);
        assert!(
            c.state()
                .nodes
                .iter()
                .all(|n| n.x.is_finite() && n.y.is_finite() && n.blend.is_finite())
        );
    }

    #[test]
    fn identity_fields_survive_ticks() {
        let mut c = controller();
        let before: Vec<_> = c
            .state()
            .nodes
            .iter()
            .map(|n| (n.id(), n.cluster(), n.radius()))
            .collect();
        let reps = c.state().representatives().to_vec();

        c.run(100);

        let after: Vec<_> = c
            .state()
            .nodes
            .iter()
            .map(|n| (n.id(), n.cluster(), n.radius()))
            .collect();
        assert_eq!(before, after);
        assert_eq!(reps, c.state().representatives());
    }

    #[test]
    fn ticks_move_nodes() {
        let mut c = controller();
        let before = positions(&c);
        assert!(c.advance());
        assert_ne!(before, positions(&c));
        assert_eq!(c.ticks(), 1);
    }

    #[test]
    fn pause_freezes_everything() {
        let mut c = controller();
        c.run(5);

        assert!(c.toggle());
        let frozen = positions(&c);
        let alpha = c.layout().alpha();
        for _ in 0..20 {
            assert!(!c.advance());
        }
        assert_eq!(frozen, positions(&c));
        assert_eq!(alpha, c.layout().alpha());

        let marks = c.playback().marks().clone();
        assert_eq!(marks.len(), 2);
        let clusters: Vec<usize> = marks.iter().map(|&i| c.state().nodes[i].cluster()).collect();
        assert_eq!(clusters, vec![0, 1]);

        assert!(!c.toggle());
        assert!(c.playback().marks().is_empty());
        assert!(c.advance());
        assert_ne!(frozen, positions(&c));
    }

    #[test]
    fn run_stops_when_cooled() {
        let mut c = controller();
        let ran = c.run(10_000);
        assert_eq!(ran, 298);
        assert!(!c.advance());
    }

    #[test]
    fn frame_reflects_state() {
        let mut c = controller();
        c.toggle();
        let frame = c.frame(0.0);
        assert_eq!(frame.len(), 40);
        assert!(frame.iter().all(|s| s.r == 0.0));
        assert_eq!(frame.iter().filter(|s| s.marked).count(), 2);

        let grown = c.frame(c.grow_in().finished_at(40));
        for (shape, node) in grown.iter().zip(&c.state().nodes) {
            assert_eq!(shape.r, node.radius());
            assert_eq!(shape.cx, node.x);
        }
        assert_eq!(grown[0].class, MarkerClass::Red);
        assert_eq!(grown[39].class, MarkerClass::Blue);
    }

    #[test]
    fn fill_follows_blend() {
        let config = SimulationConfig {
            nodes: 2,
            clusters: 2,
            ..Default::default()
        };
        let nodes = vec![
            Node::new(0, 0, 15.0).at(0.0, 0.0),
            Node::new(1, 1, 15.0).at(500.0, 0.0),
        ];
        let state = SimulationState::from_nodes(nodes, 2);
        let c = Controller::with_state(&config, state, StdRng::seed_from_u64(0)).unwrap();
        let frame = c.frame(0.0);
        assert_eq!(frame[0].fill.to_string(), "#ff0000");
        assert_eq!(frame[1].fill.to_string(), "#0000ff");
    }

    #[test]
    fn node_at_prefers_topmost() {
        let config = SimulationConfig {
            nodes: 2,
            clusters: 1,
            ..Default::default()
        };
        let nodes = vec![
            Node::new(0, 0, 15.0).at(0.0, 0.0),
            Node::new(1, 0, 15.0).at(10.0, 0.0),
        ];
        let state = SimulationState::from_nodes(nodes, 1);
        let c = Controller::with_state(&config, state, StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(c.node_at(5.0, 0.0), Some(1));
        assert_eq!(c.node_at(-10.0, 0.0), Some(0));
        assert_eq!(c.node_at(100.0, 100.0), None);
    }

    #[test]
    fn drag_is_ignored_while_paused() {
        let mut c = controller();
        c.toggle();
        c.drag_start(0);
        assert!(!c.state().nodes[0].fixed);
    }
}
