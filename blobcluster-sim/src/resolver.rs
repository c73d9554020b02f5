//! Collision resolution and colour blending
//!
//! Each tick a fresh quadtree is built over the current positions. Every node
//! then relaxes its blend toward its own cluster, picks up colour from close
//! neighbours, and pushes apart from the ones it overlaps.

use crate::config::SimulationConfig;
use crate::node::Node;
use crate::quadtree::QuadTree;
use crate::state::SimulationState;

/// Per-tick relaxation of the blend toward the node's own cluster
const BLEND_RELAX: f64 = 0.1;
/// Step toward the neutral value or a neighbour's blend
const BLEND_NUDGE: f64 = 0.25;
/// Neutral blend between two clusters
const BLEND_NEUTRAL: f64 = 0.5;

/// Pairwise collision and blend resolver
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResolver {
    /// Separation offset for same-cluster pairs
    pub padding: f64,
    /// Separation offset for cross-cluster pairs
    pub cluster_padding: f64,
    /// Upper bound on any node's radius, used for the search box
    pub max_radius: f64,
    /// Extra distance beyond the separation threshold where blending applies
    pub blend_band: f64,
}

impl CollisionResolver {
    pub fn new(padding: f64, cluster_padding: f64, max_radius: f64) -> Self {
        Self {
            padding,
            cluster_padding,
            max_radius,
            blend_band: 3.0,
        }
    }

    /// Resolver for a generated state. The search bound uses the largest
    /// radius actually present, which may exceed the configured maximum.
    pub fn from_config(config: &SimulationConfig, state: &SimulationState) -> Self {
        Self {
            padding: config.padding,
            cluster_padding: config.cluster_padding,
            max_radius: state.max_radius().max(config.max_radius),
            blend_band: config.blend_band,
        }
    }

    /// Resolve every node once against its neighbours
    pub fn resolve(&self, state: &mut SimulationState, alpha: f64) {
        let tree = QuadTree::build(
            state
                .nodes
                .iter()
                .enumerate()
                .map(|(index, node)| (index, node.x, node.y)),
        );
        for index in 0..state.nodes.len() {
            self.resolve_node(&tree, &mut state.nodes, index, alpha);
        }
    }

    fn resolve_node(&self, tree: &QuadTree, nodes: &mut [Node], index: usize, alpha: f64) {
        let d = &mut nodes[index];
        d.blend += BLEND_RELAX * (d.cluster() as f64 - d.blend);

        let r = d.radius() + self.max_radius + self.padding.max(self.cluster_padding);
        let (nx1, nx2, ny1, ny2) = (d.x - r, d.x + r, d.y - r, d.y + r);

        tree.visit(|quad, bounds| {
            if let Some(other) = quad.point {
                if other != index {
                    self.collide(nodes, index, other, alpha);
                }
            }
            bounds.disjoint(nx1, ny1, nx2, ny2)
        });
    }

    /// Apply blending and separation of `d` against `p`. Only `d`'s blend
    /// changes; both positions move on overlap.
    fn collide(&self, nodes: &mut [Node], d: usize, p: usize, alpha: f64) {
        let (node, other) = (&nodes[d], &nodes[p]);
        let mut x = node.x - other.x;
        let mut y = node.y - other.y;
        let l = (x * x + y * y).sqrt();
        let same_cluster = node.cluster() == other.cluster();
        let pad = if same_cluster {
            self.padding
        } else {
            self.cluster_padding
        };
        let r = node.radius() + other.radius() + pad;

        if l < r + self.blend_band {
            if !same_cluster {
                nodes[d].blend += BLEND_NUDGE * (BLEND_NEUTRAL - nodes[d].blend);
            } else if node.blend_offset() < other.blend_offset() {
                let target = other.blend;
                nodes[d].blend += BLEND_NUDGE * (target - nodes[d].blend);
            }
        }

        // Coincident pairs have no separation direction
        if l < r && l > 0.0 {
            let k = (l - r) / l * alpha;
            x *= k;
            y *= k;
            nodes[d].x -= x;
            nodes[d].y -= y;
            nodes[p].x += x;
            nodes[p].y += y;
        }
    }
}
