//! Chain-matching placement.

use rustc_hash::FxHashSet;
use skein_ir::{CircuitDag, QubitId};
use tracing::debug;

use crate::connectivity::ConnectivityGraph;
use crate::error::RouteResult;
use crate::interaction::{InteractionBounds, InteractionGraph};
use crate::placement::{Placement, PlacementMap, check_capacity};

/// Placement for circuits whose interactions form chains.
///
/// Covers the interaction graph with heavy paths (greedily, heaviest
/// edge first, extending both ends), then lays each path onto a free
/// simple path in the connectivity graph, longest first. Qubits that
/// interact with nobody, or that do not fit any hardware path, are
/// left unplaced.
#[derive(Debug, Clone)]
pub struct LinePlacement {
    decay: f64,
    /// DFS expansion budget for the hardware path search.
    path_budget: usize,
}

impl Default for LinePlacement {
    fn default() -> Self {
        Self {
            decay: 0.9,
            path_budget: 50_000,
        }
    }
}

impl LinePlacement {
    /// Create the strategy with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Greedy maximum-weight path cover of the interaction graph.
    fn logical_paths(interactions: &InteractionGraph) -> Vec<Vec<QubitId>> {
        let mut used: FxHashSet<QubitId> = FxHashSet::default();
        let mut paths = Vec::new();

        for (a, b, _) in interactions.edges() {
            if used.contains(&a) || used.contains(&b) {
                continue;
            }
            let mut path = vec![a, b];
            used.insert(a);
            used.insert(b);
            // Extend both ends with the heaviest available edge.
            loop {
                let mut grew = false;
                for end in [true, false] {
                    let tip = if end {
                        path[path.len() - 1]
                    } else {
                        path[0]
                    };
                    let best = interactions
                        .neighbours(tip)
                        .iter()
                        .copied()
                        .filter(|n| !used.contains(n))
                        .max_by(|&x, &y| {
                            interactions
                                .weight(tip, x)
                                .partial_cmp(&interactions.weight(tip, y))
                                .unwrap_or(std::cmp::Ordering::Equal)
                                .then(y.cmp(&x))
                        });
                    if let Some(next) = best {
                        if end {
                            path.push(next);
                        } else {
                            path.insert(0, next);
                        }
                        used.insert(next);
                        grew = true;
                    }
                }
                if !grew {
                    break;
                }
            }
            paths.push(path);
        }
        paths.sort_by_key(|p| std::cmp::Reverse(p.len()));
        paths
    }
}

impl Placement for LinePlacement {
    fn name(&self) -> &str {
        "line"
    }

    fn place(&self, dag: &CircuitDag, graph: &ConnectivityGraph) -> RouteResult<PlacementMap> {
        check_capacity(dag, graph)?;
        let interactions =
            InteractionGraph::extract(dag, InteractionBounds::unbounded(), self.decay);

        let mut map = PlacementMap::new();
        let mut occupied: FxHashSet<u32> = FxHashSet::default();
        for chain in Self::logical_paths(&interactions) {
            let hardware =
                longest_free_path(graph, &occupied, chain.len(), self.path_budget);
            for (&logical, &site) in chain.iter().zip(hardware.iter()) {
                map.assign(logical, site)?;
                occupied.insert(site);
            }
        }
        debug!(placed = map.len(), "line placement");
        Ok(map)
    }
}

/// Find a simple path of up to `target` unoccupied sites.
///
/// Depth-first from every free site in ascending order, neighbours
/// ascending, so the result is deterministic. Stops early on an exact
/// hit or when the expansion budget runs out; otherwise returns the
/// longest path seen.
fn longest_free_path(
    graph: &ConnectivityGraph,
    occupied: &FxHashSet<u32>,
    target: usize,
    budget: usize,
) -> Vec<u32> {
    let mut best: Vec<u32> = Vec::new();
    let mut remaining = budget;

    let mut visited: FxHashSet<u32> = FxHashSet::default();
    let mut path: Vec<u32> = Vec::new();
    for start in graph.nodes().filter(|s| !occupied.contains(s)) {
        path.clear();
        visited.clear();
        path.push(start);
        visited.insert(start);
        extend(
            graph, occupied, target, &mut remaining, &mut visited, &mut path, &mut best,
        );
        if best.len() >= target || remaining == 0 {
            break;
        }
    }
    best
}

fn extend(
    graph: &ConnectivityGraph,
    occupied: &FxHashSet<u32>,
    target: usize,
    remaining: &mut usize,
    visited: &mut FxHashSet<u32>,
    path: &mut Vec<u32>,
    best: &mut Vec<u32>,
) {
    if path.len() > best.len() {
        *best = path.clone();
    }
    if path.len() >= target || *remaining == 0 {
        return;
    }
    let Some(&tip) = path.last() else { return };
    for &next in graph.neighbours(tip) {
        if occupied.contains(&next) || visited.contains(&next) {
            continue;
        }
        *remaining = remaining.saturating_sub(1);
        path.push(next);
        visited.insert(next);
        extend(graph, occupied, target, remaining, visited, path, best);
        visited.remove(&next);
        path.pop();
        if best.len() >= target || *remaining == 0 {
            return;
        }
    }
}
