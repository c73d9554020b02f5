//! Simulation state: the node set and each cluster's representative

use rand::Rng;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::node::Node;

/// All nodes plus the representative lookup.
///
/// Representatives are indices into `nodes`, so moving a representative
/// through the node slice is what every lookup sees.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub nodes: Vec<Node>,
    representatives: Vec<usize>,
    max_radius: f64,
}

impl SimulationState {
    /// Generate `config.nodes` nodes split into `config.clusters` contiguous
    /// groups. Radii follow an exponential tail that grows with cluster index.
    pub fn generate<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Self {
        let n = config.nodes;
        let m = config.clusters;
        let spread = config.max_radius - config.min_radius;

        let nodes = (0..n)
            .map(|j| {
                let cluster = j * m / n;
                // (0, 1] keeps the logarithm finite
                let u = 1.0 - rng.random::<f64>();
                let scale = ((cluster + 1) as f64 / m as f64 * -u.ln()).sqrt();
                Node::new(j, cluster, config.min_radius + scale * spread)
            })
            .collect();

        let state = Self::from_nodes(nodes, m);
        debug!(
            nodes = n,
            clusters = m,
            max_radius = state.max_radius,
            "generated simulation state"
        );
        state
    }

    /// Build state from existing nodes; the largest node of each cluster
    /// (first one on ties) becomes its representative.
    ///
    /// Every cluster in `0..clusters` must have at least one node.
    pub fn from_nodes(nodes: Vec<Node>, clusters: usize) -> Self {
        let mut best: Vec<Option<usize>> = vec![None; clusters];
        for (index, node) in nodes.iter().enumerate() {
            let replace = match best[node.cluster()] {
                Some(current) => node.radius() > nodes[current].radius(),
                None => true,
            };
            if replace {
                best[node.cluster()] = Some(index);
            }
        }
        let representatives = best
            .into_iter()
            .enumerate()
            .map(|(cluster, index)| {
                index.unwrap_or_else(|| panic!("cluster {cluster} has no nodes"))
            })
            .collect();

        let max_radius = nodes.iter().map(Node::radius).fold(0.0, f64::max);

        Self {
            nodes,
            representatives,
            max_radius,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.representatives.len()
    }

    /// Index of the representative of `cluster`
    pub fn representative(&self, cluster: usize) -> usize {
        self.representatives[cluster]
    }

    pub fn representatives(&self) -> &[usize] {
        &self.representatives
    }

    pub fn is_representative(&self, index: usize) -> bool {
        self.representatives[self.nodes[index].cluster()] == index
    }

    /// Largest radius in the node set
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Indices of the members of `cluster`
    pub fn members(&self, cluster: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.cluster() == cluster)
            .map(|(index, _)| index)
    }
}
