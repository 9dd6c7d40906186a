//! Swap-or-bridge routing with windowed lookahead.

use skein_ir::StandardGate;
use tracing::trace;

use crate::connectivity::ConnectivityGraph;
use crate::error::{RouteError, RouteResult};
use crate::placement::PlacementMap;
use crate::routing::{BoundaryWindow, Resolution, RoutingMethod};

/// The default routing method: one swap (or one bridge) per call,
/// chosen by scoring against a decaying window of upcoming
/// interactions.
///
/// Candidate swaps are restricted to moves that strictly shorten the
/// front pair's separation, which bounds the swaps per blocked
/// operation by the graph diameter. The lookahead only decides which
/// shortening move (or the bridge) serves the rest of the window best.
#[derive(Debug, Clone)]
pub struct LookaheadSwap {
    lookahead: usize,
    decay: f64,
    bridge_bias: f64,
}

impl Default for LookaheadSwap {
    fn default() -> Self {
        Self {
            lookahead: 10,
            decay: 0.5,
            // Tuned so a bridge beats any swap whose lookahead benefit
            // is marginal, but loses to one that helps the next
            // interaction outright.
            bridge_bias: 0.45,
        }
    }
}

impl LookaheadSwap {
    /// Create the method with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of window pairs considered when scoring.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set the per-position geometric decay of window pair weights.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Set the additive score bonus for the bridge construction.
    pub fn with_bridge_bias(mut self, bridge_bias: f64) -> Self {
        self.bridge_bias = bridge_bias;
        self
    }

    /// Weighted lookahead score of a placement state: for window pair
    /// `i`, `decay^i` times its effective distance (distance minus the
    /// one step adjacency grants). Lower is better; scores of
    /// candidate moves are compared as reductions of this sum.
    fn window_cost(
        &self,
        window: &BoundaryWindow,
        placement: &PlacementMap,
        graph: &ConnectivityGraph,
    ) -> f64 {
        let mut cost = 0.0;
        for (i, &[a, b]) in window.pairs.iter().take(self.lookahead).enumerate() {
            let (Some(pa), Some(pb)) = (placement.physical(a), placement.physical(b)) else {
                // Not yet allocated; its future site is unknown.
                continue;
            };
            let Some(d) = graph.distance(pa, pb) else {
                continue;
            };
            cost += self.decay.powi(i as i32) * f64::from(d.saturating_sub(1));
        }
        cost
    }
}

impl RoutingMethod for LookaheadSwap {
    fn name(&self) -> &str {
        "lookahead-swap"
    }

    fn can_resolve(
        &self,
        _window: &BoundaryWindow,
        _placement: &PlacementMap,
        _graph: &ConnectivityGraph,
    ) -> bool {
        // General-purpose: accepts every window. Disconnected operand
        // pairs surface as an error from resolve.
        true
    }

    fn resolve(
        &self,
        window: &BoundaryWindow,
        placement: &PlacementMap,
        graph: &ConnectivityGraph,
    ) -> RouteResult<Resolution> {
        let [f1, f2] = window.front();
        let (Some(p1), Some(p2)) = (placement.physical(f1), placement.physical(f2)) else {
            return Err(RouteError::TrackerDiverged(format!(
                "front pair ({f1}, {f2}) not placed"
            )));
        };
        let Some(front_distance) = graph.distance(p1, p2) else {
            return Err(RouteError::DisconnectedGraph(p1, p2));
        };

        let base_cost = self.window_cost(window, placement, graph);

        // Swaps that strictly shorten the front separation: move f1
        // one site towards f2, or f2 one site towards f1.
        let mut candidates: Vec<(u32, u32)> = Vec::new();
        for &next in graph.neighbours(p1) {
            if graph.distance(next, p2).is_some_and(|d| d < front_distance) {
                candidates.push(ordered(p1, next));
            }
        }
        for &next in graph.neighbours(p2) {
            if graph.distance(p1, next).is_some_and(|d| d < front_distance) {
                candidates.push(ordered(p2, next));
            }
        }
        candidates.sort_unstable();
        candidates.dedup();

        let mut best: Option<(f64, Resolution)> = None;
        for &(a, b) in &candidates {
            let mut trial = placement.clone();
            trial.swap_physical(a, b);
            let gain = base_cost - self.window_cost(window, &trial, graph);
            trace!(swap = ?(a, b), gain, "swap candidate");
            if best.as_ref().is_none_or(|(s, _)| gain > *s) {
                best = Some((gain, Resolution::Swaps(vec![(a, b)])));
            }
        }

        // The bridge construction applies to a CX at distance exactly
        // two with a unique shared neighbour. It resolves the front
        // pair in place, so its gain is the front pair's weight, plus
        // the configured bias. On ties the bridge wins: not moving
        // anything is the safer default.
        if window.front_gate == StandardGate::CX && front_distance == 2 {
            let shared = graph.common_neighbours(p1, p2);
            if let [via] = shared.as_slice() {
                let gain = f64::from(front_distance - 1) + self.bridge_bias;
                if best.as_ref().is_none_or(|(s, _)| gain >= *s) {
                    best = Some((gain, Resolution::Bridge { via: *via }));
                }
            }
        }

        match best {
            Some((gain, resolution)) => {
                trace!(?resolution, gain, "resolution chosen");
                Ok(resolution)
            }
            // No neighbour shortens the separation: impossible on a
            // connected component, since the first hop of a shortest
            // path always qualifies.
            None => Err(RouteError::DisconnectedGraph(p1, p2)),
        }
    }
}

#[inline]
fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ir::QubitId;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn window(gate: StandardGate, pairs: &[[u32; 2]]) -> BoundaryWindow {
        BoundaryWindow {
            front_gate: gate,
            pairs: pairs.iter().map(|&[a, b]| [q(a), q(b)]).collect(),
        }
    }

    #[test]
    fn test_bridge_preferred_without_lookahead_benefit() {
        // Lone CX at distance two with a unique shared neighbour.
        let graph = ConnectivityGraph::linear(3);
        let placement = PlacementMap::identity(3);
        let w = window(StandardGate::CX, &[[0, 2]]);

        let resolution = LookaheadSwap::new()
            .resolve(&w, &placement, &graph)
            .unwrap();
        assert_eq!(resolution, Resolution::Bridge { via: 1 });
    }

    #[test]
    fn test_swap_preferred_when_later_pair_benefits() {
        // Moving qubit 0 towards 2 also carries it towards 3, so the
        // swap outscores the bridge.
        let graph = ConnectivityGraph::linear(4);
        let placement = PlacementMap::identity(4);
        let w = window(StandardGate::CX, &[[0, 2], [0, 3]]);

        let resolution = LookaheadSwap::new()
            .resolve(&w, &placement, &graph)
            .unwrap();
        assert_eq!(resolution, Resolution::Swaps(vec![(0, 1)]));
    }

    #[test]
    fn test_no_bridge_for_non_cx() {
        let graph = ConnectivityGraph::linear(3);
        let placement = PlacementMap::identity(3);
        let w = window(StandardGate::CZ, &[[0, 2]]);

        let resolution = LookaheadSwap::new()
            .resolve(&w, &placement, &graph)
            .unwrap();
        assert!(matches!(resolution, Resolution::Swaps(_)));
    }

    #[test]
    fn test_no_bridge_with_multiple_shared_neighbours() {
        // On a 4-ring, opposite corners share two neighbours; the
        // bridge construction requires exactly one.
        let graph = ConnectivityGraph::ring(4);
        let placement = PlacementMap::identity(4);
        let w = window(StandardGate::CX, &[[0, 2]]);

        let resolution = LookaheadSwap::new()
            .resolve(&w, &placement, &graph)
            .unwrap();
        assert!(matches!(resolution, Resolution::Swaps(_)));
    }

    #[test]
    fn test_swap_strictly_shortens_front_distance() {
        let graph = ConnectivityGraph::linear(6);
        let placement = PlacementMap::identity(6);
        let w = window(StandardGate::CX, &[[0, 5]]);

        let Resolution::Swaps(swaps) = LookaheadSwap::new()
            .resolve(&w, &placement, &graph)
            .unwrap()
        else {
            panic!("expected swaps at distance five");
        };
        let mut trial = placement.clone();
        for (a, b) in swaps {
            trial.swap_physical(a, b);
        }
        let d = graph
            .distance(trial.physical(q(0)).unwrap(), trial.physical(q(5)).unwrap())
            .unwrap();
        assert!(d < 5);
    }

    #[test]
    fn test_disconnected_pair_is_an_error() {
        let graph = ConnectivityGraph::from_edges(4, [(0, 1), (2, 3)]).unwrap();
        let placement = PlacementMap::identity(4);
        let w = window(StandardGate::CX, &[[0, 2]]);

        let result = LookaheadSwap::new().resolve(&w, &placement, &graph);
        assert!(matches!(result, Err(RouteError::DisconnectedGraph(0, 2))));
    }

    #[test]
    fn test_swap_into_free_site() {
        // Qubit 1 is unplaced; the swap moves qubit 0 into the empty
        // middle site.
        let graph = ConnectivityGraph::linear(3);
        let mut placement = PlacementMap::new();
        placement.assign(q(0), 0).unwrap();
        placement.assign(q(2), 2).unwrap();
        let w = window(StandardGate::CZ, &[[0, 2]]);

        let resolution = LookaheadSwap::new()
            .resolve(&w, &placement, &graph)
            .unwrap();
        assert!(matches!(resolution, Resolution::Swaps(_)));
    }
}
