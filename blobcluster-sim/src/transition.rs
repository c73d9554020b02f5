//! Radius grow-in transition for newly created shapes

use crate::config::SimulationConfig;

/// Cubic ease-in-out on `[0, 1]`
pub fn cubic_in_out(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let t2 = t * t;
    let t3 = t2 * t;
    4.0 * if t < 0.5 { t3 } else { 3.0 * (t - t2) + t3 - 0.75 }
}

/// Animates each shape's radius from 0 to full, staggered by node index.
/// Only the drawn radius changes; the physics radius is fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowIn {
    pub duration_ms: f64,
    pub stagger_ms: f64,
}

impl Default for GrowIn {
    fn default() -> Self {
        Self {
            duration_ms: 750.0,
            stagger_ms: 5.0,
        }
    }
}

impl GrowIn {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            duration_ms: config.grow_in_ms,
            stagger_ms: config.grow_in_stagger_ms,
        }
    }

    /// Eased progress of the node at `index` after `elapsed_ms`
    pub fn progress(&self, index: usize, elapsed_ms: f64) -> f64 {
        let local = elapsed_ms - index as f64 * self.stagger_ms;
        if self.duration_ms <= 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        cubic_in_out(local / self.duration_ms)
    }

    /// Drawn radius of a node
    pub fn radius(&self, index: usize, radius: f64, elapsed_ms: f64) -> f64 {
        radius * self.progress(index, elapsed_ms)
    }

    /// Time after which every one of `count` shapes is at full size
    pub fn finished_at(&self, count: usize) -> f64 {
        self.duration_ms + count.saturating_sub(1) as f64 * self.stagger_ms
    }
}
