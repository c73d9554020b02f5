//! Cluster attraction: every node is pulled until it touches its cluster's
//! representative, and the representative is pushed back by the same amount.

use crate::state::SimulationState;

/// Run the attractor over every node
pub fn attract(state: &mut SimulationState, alpha: f64) {
    for index in 0..state.nodes.len() {
        attract_node(state, index, alpha);
    }
}

/// Move one node toward its representative.
///
/// Representatives are skipped by identity. A node sitting exactly on its
/// representative has no direction to move in and is left alone.
pub fn attract_node(state: &mut SimulationState, index: usize, alpha: f64) {
    let rep = state.representative(state.nodes[index].cluster());
    if rep == index {
        return;
    }

    let (d, c) = (&state.nodes[index], &state.nodes[rep]);
    let mut x = d.x - c.x;
    let mut y = d.y - c.y;
    let l = (x * x + y * y).sqrt();
    let r = d.radius() + c.radius();
    if l == r || l == 0.0 {
        return;
    }

    let k = (l - r) / l * alpha;
    x *= k;
    y *= k;
    let d = &mut state.nodes[index];
    d.x -= x;
    d.y -= y;
    let c = &mut state.nodes[rep];
    c.x += x;
    c.y += y;
}
