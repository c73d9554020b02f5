//! Simulated particles

/// One blob in the simulation.
///
/// Identity, cluster membership and radius are fixed at creation and only
/// readable afterwards; position and blend are mutated every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: usize,
    cluster: usize,
    radius: f64,
    /// Continuous colour position, starts at `cluster`
    pub blend: f64,
    pub x: f64,
    pub y: f64,
    /// Previous position, used by the Verlet integrator
    pub px: f64,
    pub py: f64,
    /// Pinned by a drag gesture
    pub fixed: bool,
}

impl Node {
    /// Create a node at the origin
    pub fn new(id: usize, cluster: usize, radius: f64) -> Self {
        Self {
            id,
            cluster,
            radius,
            blend: cluster as f64,
            x: 0.0,
            y: 0.0,
            px: 0.0,
            py: 0.0,
            fixed: false,
        }
    }

    /// Builder: place the node (previous position follows)
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self.px = x;
        self.py = y;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn cluster(&self) -> usize {
        self.cluster
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Distance from the blend value to the node's own cluster value
    pub fn blend_offset(&self) -> f64 {
        (self.blend - self.cluster as f64).abs()
    }

    /// Whether a point lies inside the node's circle
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_starts_at_cluster() {
        let node = Node::new(3, 1, 17.5);
        assert_eq!(node.blend, 1.0);
        assert_eq!(node.blend_offset(), 0.0);
    }

    #[test]
    fn at_sets_previous_position() {
        let node = Node::new(0, 0, 10.0).at(4.0, -2.0);
        assert_eq!((node.x, node.y), (4.0, -2.0));
        assert_eq!((node.px, node.py), (4.0, -2.0));
    }

    #[test]
    fn contains_checks_radius() {
        let node = Node::new(0, 0, 5.0).at(10.0, 10.0);
        assert!(node.contains(13.0, 14.0));
        assert!(!node.contains(16.0, 10.0));
    }
}
