//! Point quadtree used to prune collision candidates
//!
//! The tree stores node indices, not nodes, so a visitor can mutate the node
//! slice while walking it. Quad bounds are fixed at build time.

/// Axis-aligned bounds of a quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    /// Whether these bounds miss the box `[x1, x2] × [y1, y2]` entirely
    pub fn disjoint(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        self.x1 > x2 || self.x2 < x1 || self.y1 > y2 || self.y2 < y1
    }
}

/// A quad may hold one point and up to four children
#[derive(Debug, Clone, Default)]
pub struct Quad {
    /// Index of the point stored at this quad
    pub point: Option<usize>,
    /// Insertion-time coordinates of `point`
    x: f64,
    y: f64,
    children: [Option<usize>; 4],
    leaf: bool,
}

impl Quad {
    fn new() -> Self {
        Self {
            leaf: true,
            ..Default::default()
        }
    }
}

/// Quadtree over a set of points
#[derive(Debug, Clone)]
pub struct QuadTree {
    quads: Vec<Quad>,
    bounds: Bounds,
}

impl QuadTree {
    /// Build a tree over `(index, x, y)` points. The extent is the bounding
    /// box of the points, squared off along its longer side.
    pub fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64, f64)>,
    {
        let points: Vec<(usize, f64, f64)> = points
            .into_iter()
            .filter(|(_, x, y)| !x.is_nan() && !y.is_nan())
            .collect();

        let (mut x1, mut y1) = (f64::INFINITY, f64::INFINITY);
        let (mut x2, mut y2) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(_, x, y) in &points {
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x);
            y2 = y2.max(y);
        }
        if points.is_empty() {
            (x1, y1, x2, y2) = (0.0, 0.0, 0.0, 0.0);
        }
        let (dx, dy) = (x2 - x1, y2 - y1);
        if dx > dy {
            y2 = y1 + dx;
        } else {
            x2 = x1 + dy;
        }

        let mut tree = Self {
            quads: vec![Quad::new()],
            bounds: Bounds { x1, y1, x2, y2 },
        };
        let root = tree.bounds;
        for (index, x, y) in points {
            tree.insert(0, index, x, y, root);
        }
        tree
    }

    fn insert(&mut self, quad: usize, index: usize, x: f64, y: f64, b: Bounds) {
        if !self.quads[quad].leaf {
            self.insert_child(quad, index, x, y, b);
            return;
        }
        match self.quads[quad].point {
            None => {
                let q = &mut self.quads[quad];
                q.point = Some(index);
                q.x = x;
                q.y = y;
            }
            Some(existing) => {
                let (nx, ny) = (self.quads[quad].x, self.quads[quad].y);
                if (nx - x).abs() + (ny - y).abs() < 0.01 {
                    // Coincident points stack into a child instead of splitting forever
                    self.insert_child(quad, index, x, y, b);
                } else {
                    self.quads[quad].point = None;
                    self.insert_child(quad, existing, nx, ny, b);
                    self.insert_child(quad, index, x, y, b);
                }
            }
        }
    }

    fn insert_child(&mut self, quad: usize, index: usize, x: f64, y: f64, b: Bounds) {
        let xm = (b.x1 + b.x2) * 0.5;
        let ym = (b.y1 + b.y2) * 0.5;
        let right = x >= xm;
        let below = y >= ym;
        let slot = ((below as usize) << 1) | right as usize;

        self.quads[quad].leaf = false;
        let child = match self.quads[quad].children[slot] {
            Some(child) => child,
            None => {
                self.quads.push(Quad::new());
                let child = self.quads.len() - 1;
                self.quads[quad].children[slot] = Some(child);
                child
            }
        };

        let child_bounds = Bounds {
            x1: if right { xm } else { b.x1 },
            x2: if right { b.x2 } else { xm },
            y1: if below { ym } else { b.y1 },
            y2: if below { b.y2 } else { ym },
        };
        self.insert(child, index, x, y, child_bounds);
    }

    /// Root extent
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of quads, including empty internal ones
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads[0].point.is_none() && self.quads[0].leaf
    }

    /// Pre-order walk. The visitor returns `true` to skip a quad's children.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&Quad, Bounds) -> bool,
    {
        let mut stack = vec![(0usize, self.bounds)];
        while let Some((quad, b)) = stack.pop() {
            let node = &self.quads[quad];
            if visitor(node, b) {
                continue;
            }
            let xm = (b.x1 + b.x2) * 0.5;
            let ym = (b.y1 + b.y2) * 0.5;
            // Reverse push keeps children in slot order 0..4
            for slot in (0..4).rev() {
                if let Some(child) = node.children[slot] {
                    let right = slot & 1 == 1;
                    let below = slot & 2 == 2;
                    let child_bounds = Bounds {
                        x1: if right { xm } else { b.x1 },
                        x2: if right { b.x2 } else { xm },
                        y1: if below { ym } else { b.y1 },
                        y2: if below { b.y2 } else { ym },
                    };
                    stack.push((child, child_bounds));
                }
            }
        }
    }
}
