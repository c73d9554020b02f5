//! Play/pause state and the per-cluster marks revealed while paused

use std::collections::BTreeSet;

use rand::Rng;
use tracing::info;

use crate::state::SimulationState;

/// Two-valued visual class of a node's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerClass {
    Red,
    Blue,
}

impl MarkerClass {
    /// Cluster 0 is red, every other cluster blue
    pub fn for_cluster(cluster: usize) -> Self {
        if cluster == 0 {
            MarkerClass::Red
        } else {
            MarkerClass::Blue
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerClass::Red => "red",
            MarkerClass::Blue => "blue",
        }
    }
}

/// Class added to marked shapes
pub const MARK_CLASS: &str = "show-when-paused";

/// Playback state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    paused: bool,
    marks: BTreeSet<usize>,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Node indices currently marked
    pub fn marks(&self) -> &BTreeSet<usize> {
        &self.marks
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marks.contains(&index)
    }

    /// Flip between playing and paused. Pausing marks one random member of
    /// every cluster; resuming clears all marks. Returns the new paused flag.
    pub fn toggle<R: Rng>(&mut self, state: &SimulationState, rng: &mut R) -> bool {
        info!(paused = self.paused, "toggling playback");
        if self.paused {
            self.marks.clear();
        } else {
            for cluster in 0..state.cluster_count() {
                let members: Vec<usize> = state.members(cluster).collect();
                if !members.is_empty() {
                    self.marks.insert(members[rng.random_range(0..members.len())]);
                }
            }
        }
        self.paused = !self.paused;
        self.paused
    }

    /// Class on the document root
    pub fn root_class(&self) -> &'static str {
        if self.paused { "pause-sim" } else { "play-sim" }
    }

    /// Icon class on the toggle button: the action a click will take
    pub fn icon_class(&self) -> &'static str {
        if self.paused { "fa-play" } else { "fa-pause" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state(nodes: usize, clusters: usize) -> SimulationState {
        let config = SimulationConfig {
            nodes,
            clusters,
            ..Default::default()
        };
        SimulationState::generate(&config, &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn marker_class_is_two_valued() {
        assert_eq!(MarkerClass::for_cluster(0), MarkerClass::Red);
        assert_eq!(MarkerClass::for_cluster(1), MarkerClass::Blue);
        assert_eq!(MarkerClass::for_cluster(4).as_str(), "blue");
    }

    #[test]
    fn pausing_marks_one_node_per_cluster() {
        let state = state(30, 3);
        let mut playback = Playback::new();
        let mut rng = StdRng::seed_from_u64(9);

        assert!(playback.toggle(&state, &mut rng));
        assert_eq!(playback.marks().len(), 3);
        for cluster in 0..3 {
            let marked = playback
                .marks()
                .iter()
                .filter(|&&i| state.nodes[i].cluster() == cluster)
                .count();
            assert_eq!(marked, 1);
        }
    }

    #[test]
    fn resuming_clears_marks() {
        let state = state(10, 2);
        let mut playback = Playback::new();
        let mut rng = StdRng::seed_from_u64(9);

        playback.toggle(&state, &mut rng);
        assert!(!playback.toggle(&state, &mut rng));
        assert!(playback.marks().is_empty());
        assert!(!playback.is_paused());
    }

    #[test]
    fn classes_follow_state() {
        let state = state(4, 2);
        let mut playback = Playback::new();
        assert_eq!(playback.root_class(), "play-sim");
        assert_eq!(playback.icon_class(), "fa-pause");

        playback.toggle(&state, &mut StdRng::seed_from_u64(1));
        assert_eq!(playback.root_class(), "pause-sim");
        assert_eq!(playback.icon_class(), "fa-play");
    }
}
