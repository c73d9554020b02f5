//! Position-Verlet force layout with a cooling schedule
//!
//! The layout owns the simulation temperature (`alpha`). Each step cools it,
//! applies gravity toward the canvas centre, integrates positions and then
//! hands a [`TickEvent`] to the registered [`TickObserver`].

use tracing::debug;

use crate::config::SimulationConfig;
use crate::state::SimulationState;

/// Temperature set by `start` and `resume`
const ALPHA_START: f64 = 0.1;
/// Temperature below which the layout stops ticking
const ALPHA_MIN: f64 = 0.005;
/// Per-step cooling factor
const ALPHA_DECAY: f64 = 0.99;

/// Emitted after integration on every step that did not cool the layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    pub alpha: f64,
}

/// Receives tick events from a [`ForceLayout`]
pub trait TickObserver {
    fn on_tick(&mut self, state: &mut SimulationState, event: TickEvent);
}

impl<F> TickObserver for F
where
    F: FnMut(&mut SimulationState, TickEvent),
{
    fn on_tick(&mut self, state: &mut SimulationState, event: TickEvent) {
        self(state, event)
    }
}

/// Verlet integrator with gravity and friction
#[derive(Debug, Clone, PartialEq)]
pub struct ForceLayout {
    pub width: f64,
    pub height: f64,
    pub gravity: f64,
    pub friction: f64,
    alpha: f64,
}

impl ForceLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            gravity: 0.02,
            friction: 0.9,
            alpha: 0.0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            gravity: config.gravity,
            friction: config.friction,
            ..Self::new(config.width, config.height)
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.alpha > 0.0
    }

    /// Heat the layout and seed previous positions from current ones
    pub fn start(&mut self, state: &mut SimulationState) {
        for node in &mut state.nodes {
            node.px = node.x;
            node.py = node.y;
        }
        self.alpha = ALPHA_START;
        debug!(nodes = state.nodes.len(), "force layout started");
    }

    /// Reheat without touching positions
    pub fn resume(&mut self) {
        self.alpha = ALPHA_START;
    }

    /// Advance one step. Returns the emitted event, or `None` once cooled.
    pub fn step<O>(&mut self, state: &mut SimulationState, observer: &mut O) -> Option<TickEvent>
    where
        O: TickObserver + ?Sized,
    {
        if !self.is_running() {
            return None;
        }
        self.alpha *= ALPHA_DECAY;
        if self.alpha < ALPHA_MIN {
            self.alpha = 0.0;
            debug!("force layout cooled");
            return None;
        }

        let k = self.alpha * self.gravity;
        if k != 0.0 {
            let (cx, cy) = (self.width / 2.0, self.height / 2.0);
            for node in &mut state.nodes {
                node.x += (cx - node.x) * k;
                node.y += (cy - node.y) * k;
            }
        }

        for node in &mut state.nodes {
            if node.fixed {
                node.x = node.px;
                node.y = node.py;
            } else {
                let (x, y) = (node.x, node.y);
                node.x -= (node.px - x) * self.friction;
                node.y -= (node.py - y) * self.friction;
                node.px = x;
                node.py = y;
            }
        }

        let event = TickEvent { alpha: self.alpha };
        observer.on_tick(state, event);
        Some(event)
    }

    /// Pin a node under the pointer
    pub fn drag_start(&mut self, state: &mut SimulationState, index: usize) {
        state.nodes[index].fixed = true;
    }

    /// Move a pinned node and reheat
    pub fn drag_to(&mut self, state: &mut SimulationState, index: usize, x: f64, y: f64) {
        let node = &mut state.nodes[index];
        node.px = x;
        node.py = y;
        self.resume();
    }

    pub fn drag_end(&mut self, state: &mut SimulationState, index: usize) {
        state.nodes[index].fixed = false;
    }
}
