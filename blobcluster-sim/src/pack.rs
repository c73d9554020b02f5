//! Initial placement by hierarchical circle packing
//!
//! Nodes are grouped by cluster, each group is packed with the front-chain
//! algorithm, the groups are packed the same way, and the result is scaled to
//! fit the canvas. Only node positions are written.

use tracing::debug;

use crate::state::SimulationState;

/// A circle being packed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(r: f64) -> Self {
        Self { x: 0.0, y: 0.0, r }
    }

    /// Overlap test with a small tolerance so tangent circles do not count
    fn intersects(&self, other: &Circle) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dr = self.r + other.r;
        0.999 * dr * dr > dx * dx + dy * dy
    }
}

/// Place `c` tangent to both `a` and `b`
fn place(a: Circle, b: Circle, c: &mut Circle) {
    let mut db = a.r + c.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if db != 0.0 && (dx != 0.0 || dy != 0.0) {
        let mut da = b.r + c.r;
        let dc = dx * dx + dy * dy;
        da *= da;
        db *= db;
        let x = 0.5 + (db - da) / (2.0 * dc);
        let rest = db - dc;
        let y = (2.0 * da * (db + dc) - rest * rest - da * da).max(0.0).sqrt() / (2.0 * dc);
        c.x = a.x + x * dx + y * dy;
        c.y = a.y + x * dy - y * dx;
    } else {
        c.x = a.x + db;
        c.y = a.y;
    }
}

/// Front chain as a circular doubly linked list over circle indices
struct Chain {
    next: Vec<usize>,
    prev: Vec<usize>,
}

impl Chain {
    fn new(n: usize) -> Self {
        Self {
            next: (0..n).collect(),
            prev: (0..n).collect(),
        }
    }

    /// Insert `b` after `a`
    fn insert(&mut self, a: usize, b: usize) {
        let c = self.next[a];
        self.next[a] = b;
        self.prev[b] = a;
        self.next[b] = c;
        self.prev[c] = b;
    }

    /// Drop everything between `a` and `b`
    fn splice(&mut self, a: usize, b: usize) {
        self.next[a] = b;
        self.prev[b] = a;
    }
}

/// Pack sibling circles around the origin and return the enclosing radius.
///
/// Circles keep their radii; positions are centred on the bounding box of the
/// placed circles.
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let mut bound = |c: &Circle| {
        x_min = x_min.min(c.x - c.r);
        x_max = x_max.max(c.x + c.r);
        y_min = y_min.min(c.y - c.r);
        y_max = y_max.max(c.y + c.r);
    };

    let mut chain = Chain::new(n);
    circles[0].x = -circles[0].r;
    circles[0].y = 0.0;
    bound(&circles[0]);

    if n > 1 {
        circles[1].x = circles[1].r;
        circles[1].y = 0.0;
        bound(&circles[1]);

        if n > 2 {
            let (mut a, mut b) = (0, 1);
            let mut c = circles[2];
            place(circles[a], circles[b], &mut c);
            circles[2] = c;
            bound(&circles[2]);
            chain.insert(a, 2);
            chain.prev[a] = 2;
            chain.insert(2, b);
            b = chain.next[a];

            let mut i = 3;
            while i < n {
                let mut c = circles[i];
                place(circles[a], circles[b], &mut c);
                circles[i] = c;

                // Search forward along the front for an intersecting circle
                let mut hit = None;
                let mut s1 = 1;
                let mut j = chain.next[b];
                while j != b {
                    if circles[j].intersects(&circles[i]) {
                        hit = Some(j);
                        break;
                    }
                    j = chain.next[j];
                    s1 += 1;
                }

                if let Some(j) = hit {
                    // And backward, to pick the shorter side to cut
                    let mut s2 = 1;
                    let mut k = chain.prev[a];
                    while k != chain.prev[j] {
                        if circles[k].intersects(&circles[i]) {
                            break;
                        }
                        k = chain.prev[k];
                        s2 += 1;
                    }

                    if s1 < s2 || (s1 == s2 && circles[b].r < circles[a].r) {
                        b = j;
                        chain.splice(a, b);
                    } else {
                        a = k;
                        chain.splice(a, b);
                    }
                    // Retry the same circle against the shortened front
                } else {
                    chain.insert(a, i);
                    b = i;
                    bound(&circles[i]);
                    i += 1;
                }
            }
        }
    }

    let cx = (x_min + x_max) / 2.0;
    let cy = (y_min + y_max) / 2.0;
    let mut enclosing: f64 = 0.0;
    for c in circles.iter_mut() {
        c.x -= cx;
        c.y -= cy;
        enclosing = enclosing.max(c.r + (c.x * c.x + c.y * c.y).sqrt());
    }
    enclosing
}

/// Two-level packing of a simulation state into a canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackLayout {
    pub width: f64,
    pub height: f64,
}

impl PackLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Assign every node a non-overlapping starting position
    pub fn apply(&self, state: &mut SimulationState) {
        let clusters = state.cluster_count();
        let groups: Vec<Vec<usize>> = (0..clusters).map(|c| state.members(c).collect()).collect();

        // Leaf area is proportional to radius squared, so leaves keep the node radius
        let mut leaves: Vec<Vec<Circle>> = groups
            .iter()
            .map(|members| {
                members
                    .iter()
                    .map(|&i| Circle::new(state.nodes[i].radius()))
                    .collect()
            })
            .collect();

        let mut parents: Vec<Circle> = leaves
            .iter_mut()
            .map(|circles| Circle::new(pack_siblings(circles)))
            .collect();
        let root_r = pack_siblings(&mut parents);

        let k = if root_r > 0.0 {
            1.0 / f64::max(2.0 * root_r / self.width, 2.0 * root_r / self.height)
        } else {
            1.0
        };
        let (ox, oy) = (self.width / 2.0, self.height / 2.0);

        for ((members, circles), parent) in groups.iter().zip(&leaves).zip(&parents) {
            let (px, py) = (ox + k * parent.x, oy + k * parent.y);
            for (&index, circle) in members.iter().zip(circles) {
                let node = &mut state.nodes[index];
                node.x = px + k * circle.x;
                node.y = py + k * circle.y;
                node.px = node.x;
                node.py = node.y;
            }
        }

        debug!(clusters, scale = k, "packed initial layout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::node::Node;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_no_overlap(circles: &[Circle]) {
        for (i, a) in circles.iter().enumerate() {
            for b in &circles[i + 1..] {
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(
                    d >= (a.r + b.r) * 0.999,
                    "circles overlap: {a:?} {b:?} at distance {d}"
                );
            }
        }
    }

    #[test]
    fn single_circle_is_centred() {
        let mut circles = vec![Circle::new(5.0)];
        let r = pack_siblings(&mut circles);
        assert_eq!(r, 5.0);
        assert_eq!((circles[0].x, circles[0].y), (0.0, 0.0));
    }

    #[test]
    fn two_circles_touch() {
        let mut circles = vec![Circle::new(3.0), Circle::new(5.0)];
        let r = pack_siblings(&mut circles);
        let d = (circles[1].x - circles[0].x).abs();
        assert!((d - 8.0).abs() < 1e-9);
        assert!((r - 8.0).abs() < 1e-9);
    }

    #[test]
    fn three_circles_are_mutually_tangent() {
        let mut circles = vec![Circle::new(1.0), Circle::new(1.0), Circle::new(1.0)];
        pack_siblings(&mut circles);
        for (i, j) in [(0, 1), (1, 2), (0, 2)] {
            let d = ((circles[i].x - circles[j].x).powi(2)
                + (circles[i].y - circles[j].y).powi(2))
            .sqrt();
            assert!((d - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn many_circles_do_not_overlap() {
        let mut circles: Vec<Circle> = (0..8)
            .map(|i| Circle::new(10.0 + (i * 7 % 11) as f64))
            .collect();
        let r = pack_siblings(&mut circles);
        assert_no_overlap(&circles);
        for c in &circles {
            assert!((c.x * c.x + c.y * c.y).sqrt() + c.r <= r + 1e-9);
        }
    }

    #[test]
    fn empty_input_packs_to_nothing() {
        assert_eq!(pack_siblings(&mut []), 0.0);
    }

    #[test]
    fn layout_fits_canvas_and_separates_nodes() {
        let config = SimulationConfig::default();
        let mut state = SimulationState::generate(&config, &mut StdRng::seed_from_u64(3));
        PackLayout::new(config.width, config.height).apply(&mut state);

        for node in &state.nodes {
            assert!(node.x >= 0.0 && node.x <= config.width);
            assert!(node.y >= 0.0 && node.y <= config.height);
            assert_eq!((node.px, node.py), (node.x, node.y));
        }

        for (i, a) in state.nodes.iter().enumerate() {
            for b in &state.nodes[i + 1..] {
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(d > 0.0);
            }
        }
    }

    #[test]
    fn layout_keeps_radii() {
        let nodes = vec![Node::new(0, 0, 20.0), Node::new(1, 1, 15.0)];
        let mut state = SimulationState::from_nodes(nodes, 2);
        PackLayout::new(100.0, 100.0).apply(&mut state);
        assert_eq!(state.nodes[0].radius(), 20.0);
        assert_eq!(state.nodes[1].radius(), 15.0);
        assert_ne!(state.nodes[0].x, state.nodes[1].x);
    }
}
