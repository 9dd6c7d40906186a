//! Subgraph-matching placement.

use rustc_hash::FxHashSet;
use skein_ir::{CircuitDag, QubitId};
use tracing::debug;

use crate::connectivity::ConnectivityGraph;
use crate::error::RouteResult;
use crate::interaction::{InteractionBounds, InteractionGraph};
use crate::noise::NoiseProfile;
use crate::placement::{Placement, PlacementMap, check_capacity};

/// Tuning knobs for [`GraphPlacement`] and
/// [`NoiseAwarePlacement`](crate::placement::NoiseAwarePlacement).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphPlacementConfig {
    /// Gate-layer depth of the interaction graph fed to the search.
    pub lookahead_layers: usize,
    /// Maximum number of search-tree expansions before the best
    /// placement found so far is returned.
    pub search_budget: usize,
    /// Geometric decay applied to interaction weights per scan position.
    pub decay: f64,
    /// Two placements whose scores differ by at most this much are
    /// considered structurally equivalent.
    pub tie_tolerance: f64,
}

impl Default for GraphPlacementConfig {
    fn default() -> Self {
        Self {
            lookahead_layers: 5,
            search_budget: 10_000,
            decay: 0.9,
            tie_tolerance: 1e-9,
        }
    }
}

/// Placement by bounded search for a maximum common subgraph between
/// the circuit's interaction graph and the device connectivity.
///
/// The search is exact on small inputs and degrades gracefully under
/// the expansion budget: it always returns the best complete
/// assignment found, which may leave rarely-interacting qubits
/// unplaced. Non-adjacent interactions earn partial credit inversely
/// proportional to their distance, so near-misses beat far-misses.
#[derive(Debug, Clone, Default)]
pub struct GraphPlacement {
    config: GraphPlacementConfig,
}

impl GraphPlacement {
    /// Create the strategy with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the strategy with an explicit configuration.
    pub fn with_config(config: GraphPlacementConfig) -> Self {
        Self { config }
    }

    /// Adjust the configuration in place.
    pub fn modify_config(&mut self, f: impl FnOnce(&mut GraphPlacementConfig)) {
        f(&mut self.config);
    }

    /// Current configuration.
    pub fn config(&self) -> &GraphPlacementConfig {
        &self.config
    }
}

impl Placement for GraphPlacement {
    fn name(&self) -> &str {
        "graph"
    }

    fn place(&self, dag: &CircuitDag, graph: &ConnectivityGraph) -> RouteResult<PlacementMap> {
        check_capacity(dag, graph)?;
        let interactions = InteractionGraph::extract(
            dag,
            InteractionBounds::layers(self.config.lookahead_layers),
            self.config.decay,
        );
        search_common_subgraph(&interactions, graph, &self.config, None)
    }
}

/// Branch-and-bound search for the best-scoring assignment of
/// interacting logical qubits onto physical sites.
///
/// Logical qubits are tried in order of descending interaction
/// strength; every free site plus an explicit "leave unplaced" option
/// is a branch. A suffix bound on the remaining achievable score
/// prunes the tree. The stack is explicit, so pathological interaction
/// graphs cannot overflow the call stack. With a noise profile, ties
/// within `tie_tolerance` are broken towards the lowest estimated
/// error cost.
pub(crate) fn search_common_subgraph(
    interactions: &InteractionGraph,
    graph: &ConnectivityGraph,
    config: &GraphPlacementConfig,
    noise: Option<&NoiseProfile>,
) -> RouteResult<PlacementMap> {
    let order = search_order(interactions);
    let m = order.len();
    if m == 0 {
        return Ok(PlacementMap::new());
    }

    // suffix[i]: maximum score still attainable from frame i onward,
    // assuming every remaining interaction lands on an edge. Each
    // interaction is scored at the later of its two frames.
    let mut suffix = vec![0.0f64; m + 1];
    for i in (0..m).rev() {
        let gain: f64 = (0..i)
            .map(|j| interactions.weight(order[j], order[i]))
            .sum();
        suffix[i] = suffix[i + 1] + gain;
    }

    struct Frame {
        candidates: Vec<Option<u32>>,
        next: usize,
        committed: Option<(Option<u32>, f64)>,
    }

    let make_frame = |used: &FxHashSet<u32>| {
        let mut candidates: Vec<Option<u32>> = graph
            .nodes()
            .filter(|p| !used.contains(p))
            .map(Some)
            .collect();
        candidates.push(None);
        Frame {
            candidates,
            next: 0,
            committed: None,
        }
    };

    let mut assigned: Vec<Option<u32>> = vec![None; m];
    let mut used: FxHashSet<u32> = FxHashSet::default();
    let mut score = 0.0f64;
    let mut expansions = 0usize;

    let mut best_score = f64::NEG_INFINITY;
    // Structurally tied complete assignments, in discovery order.
    let mut pool: Vec<Vec<Option<u32>>> = Vec::new();
    const POOL_CAP: usize = 16;

    let mut stack = vec![make_frame(&used)];
    while !stack.is_empty() {
        let depth = stack.len() - 1;
        let Some(frame) = stack.last_mut() else { break };

        if let Some((candidate, delta)) = frame.committed.take() {
            if let Some(p) = candidate {
                used.remove(&p);
                assigned[depth] = None;
            }
            score -= delta;
        }

        let out_of_budget = expansions >= config.search_budget && !pool.is_empty();
        let exhausted = frame.next >= frame.candidates.len();
        let hopeless = score + suffix[depth] < best_score - config.tie_tolerance;
        if out_of_budget || exhausted || hopeless {
            stack.pop();
            continue;
        }

        let candidate = frame.candidates[frame.next];
        frame.next += 1;
        expansions += 1;

        let delta = match candidate {
            Some(p) => assignment_score(interactions, graph, &order, &assigned, depth, p),
            None => 0.0,
        };
        frame.committed = Some((candidate, delta));
        if let Some(p) = candidate {
            used.insert(p);
            assigned[depth] = Some(p);
        }
        score += delta;

        if depth + 1 == m {
            if score > best_score + config.tie_tolerance {
                best_score = score;
                pool.clear();
                pool.push(assigned.clone());
            } else if score >= best_score - config.tie_tolerance && pool.len() < POOL_CAP {
                pool.push(assigned.clone());
            }
        } else {
            stack.push(make_frame(&used));
        }
    }

    let winner = match noise {
        Some(profile) if pool.len() > 1 => pool
            .iter()
            .min_by(|x, y| {
                let cx = noise_cost(interactions, graph, profile, &order, x);
                let cy = noise_cost(interactions, graph, profile, &order, y);
                cx.partial_cmp(&cy).unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned(),
        _ => pool.first().cloned(),
    };

    let mut map = PlacementMap::new();
    if let Some(assignment) = winner {
        for (i, slot) in assignment.iter().enumerate() {
            if let Some(p) = slot {
                map.assign(order[i], *p)?;
            }
        }
    }
    debug!(
        placed = map.len(),
        expansions,
        score = best_score,
        "subgraph placement"
    );
    Ok(map)
}

/// Logical qubits ordered by descending total interaction weight,
/// ties broken by ascending id.
fn search_order(interactions: &InteractionGraph) -> Vec<QubitId> {
    let mut order = interactions.qubits();
    let strength = |q: QubitId| -> f64 {
        interactions
            .neighbours(q)
            .iter()
            .map(|&u| interactions.weight(q, u))
            .sum()
    };
    order.sort_by(|&a, &b| {
        strength(b)
            .partial_cmp(&strength(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

/// Score of placing `order[depth]` on site `p` given the earlier
/// assignments: full credit for interactions landing on an edge,
/// distance-discounted credit otherwise.
fn assignment_score(
    interactions: &InteractionGraph,
    graph: &ConnectivityGraph,
    order: &[QubitId],
    assigned: &[Option<u32>],
    depth: usize,
    p: u32,
) -> f64 {
    let mut total = 0.0;
    for j in 0..depth {
        let Some(pu) = assigned[j] else { continue };
        let weight = interactions.weight(order[depth], order[j]);
        if weight == 0.0 {
            continue;
        }
        let credit = if graph.contains_edge(p, pu) {
            1.0
        } else {
            match graph.distance(p, pu) {
                Some(d) if d > 0 => 0.5 / d as f64,
                _ => 0.0,
            }
        };
        total += weight * credit;
    }
    total
}

/// Estimated error cost of a complete assignment: per-interaction gate
/// error summed along the connecting path, weighted by interaction
/// strength, plus readout error at every occupied site.
fn noise_cost(
    interactions: &InteractionGraph,
    graph: &ConnectivityGraph,
    profile: &NoiseProfile,
    order: &[QubitId],
    assigned: &[Option<u32>],
) -> f64 {
    let mut cost = 0.0;
    for (a, b, weight) in interactions.edges() {
        let (Some(i), Some(j)) = (
            order.iter().position(|&q| q == a),
            order.iter().position(|&q| q == b),
        ) else {
            continue;
        };
        let (Some(pa), Some(pb)) = (assigned[i], assigned[j]) else {
            continue;
        };
        if let Some(path) = graph.shortest_path(pa, pb) {
            let path_error: f64 = path
                .windows(2)
                .map(|w| profile.edge_error(w[0], w[1]))
                .sum();
            cost += weight * path_error;
        }
    }
    for slot in assigned.iter().flatten() {
        cost += profile.readout(*slot);
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ir::Circuit;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_exact_match_on_line() {
        // 0-1, 1-2 chain matches a linear device exactly.
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.cx(q(0), q(1)).unwrap();
        circuit.cx(q(1), q(2)).unwrap();

        let graph = ConnectivityGraph::linear(3);
        let map = GraphPlacement::new().place(circuit.dag(), &graph).unwrap();

        assert_eq!(map.len(), 3);
        let p0 = map.physical(q(0)).unwrap();
        let p1 = map.physical(q(1)).unwrap();
        let p2 = map.physical(q(2)).unwrap();
        assert!(graph.contains_edge(p0, p1));
        assert!(graph.contains_edge(p1, p2));
    }

    #[test]
    fn test_star_interaction_on_star_device() {
        // Qubit 0 talks to everyone; it must land on the hub.
        let mut circuit = Circuit::with_size("t", 4, 0);
        circuit.cx(q(0), q(1)).unwrap();
        circuit.cx(q(0), q(2)).unwrap();
        circuit.cx(q(0), q(3)).unwrap();

        let graph = ConnectivityGraph::star(4);
        let map = GraphPlacement::new().place(circuit.dag(), &graph).unwrap();
        assert_eq!(map.physical(q(0)), Some(0));
    }

    #[test]
    fn test_deterministic() {
        let circuit = Circuit::qft(4).unwrap();
        let graph = ConnectivityGraph::grid(2, 3);
        let strategy = GraphPlacement::new();
        let first = strategy.place(circuit.dag(), &graph).unwrap();
        let second = strategy.place(circuit.dag(), &graph).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_circuit_places_nothing() {
        let circuit = Circuit::with_size("t", 3, 0);
        let graph = ConnectivityGraph::linear(4);
        let map = GraphPlacement::new().place(circuit.dag(), &graph).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_budget_still_returns_complete_search() {
        let mut strategy = GraphPlacement::new();
        strategy.modify_config(|c| c.search_budget = 8);
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.cx(q(0), q(1)).unwrap();
        circuit.cx(q(1), q(2)).unwrap();
        let graph = ConnectivityGraph::linear(5);
        // Budget exhaustion returns the best found, never an error.
        let map = strategy.place(circuit.dag(), &graph).unwrap();
        assert!(map.len() <= 3);
    }
}
