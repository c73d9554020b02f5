//! A headless simulation run
//!
//! Pairs a configuration with the controller built from it, and resolves the
//! random seed once so every artifact written from a session agrees.

use blobcluster_sim::{ConfigError, Controller, Shape, SimulationConfig};
use tracing::info;

/// Configuration plus the controller driven from it
pub struct Session {
    config: SimulationConfig,
    controller: Controller,
}

impl Session {
    /// Build a session; a config without a seed gets a random one
    pub fn new(mut config: SimulationConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        config.seed = Some(seed);
        let controller = Controller::new(&config, seed)?;
        Ok(Self { config, controller })
    }

    /// Configuration with the resolved seed
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_default()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// Run up to `ticks` ticks, stopping early if the layout cools
    pub fn run(&mut self, ticks: usize) -> usize {
        let ran = self.controller.run(ticks);
        info!(
            requested = ticks,
            ran,
            alpha = self.controller.layout().alpha(),
            "simulation advanced"
        );
        ran
    }

    /// Current frame with every grow-in transition complete
    pub fn shapes(&self) -> Vec<Shape> {
        let grow = self.controller.grow_in();
        let end = grow.finished_at(self.controller.state().nodes.len());
        self.controller.frame(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_resolved_once() {
        let session = Session::new(SimulationConfig::default()).unwrap();
        assert_eq!(session.config().seed, Some(session.seed()));
    }

    #[test]
    fn same_seed_same_run() {
        let config = SimulationConfig {
            seed: Some(99),
            ..Default::default()
        };
        let mut a = Session::new(config.clone()).unwrap();
        let mut b = Session::new(config).unwrap();
        a.run(30);
        b.run(30);
        assert_eq!(a.shapes(), b.shapes());
    }

    #[test]
    fn shapes_are_full_size() {
        let session = Session::new(SimulationConfig {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        for (shape, node) in session.shapes().iter().zip(&session.controller().state().nodes) {
            assert_eq!(shape.r, node.radius());
        }
    }
}
