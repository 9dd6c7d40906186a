//! Interaction graph extraction.
//!
//! Scans a circuit's operations in order and records which logical
//! qubit pairs interact, weighted by how soon the interaction occurs.
//! Placement strategies match this graph against the device
//! connectivity; the mapping manager extracts narrow windows of it to
//! score candidate swaps. Extraction is a pure read of the circuit.

use rustc_hash::FxHashMap;
use skein_ir::{CircuitDag, QubitId};

/// Bounds on how far an extraction scans into the circuit.
///
/// Both bounds default to 1, the narrowest per-partition lookahead.
/// Placement strategies widen them (or use
/// [`unbounded`](Self::unbounded) for whole-circuit extraction).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionBounds {
    /// Maximum number of multi-qubit operations to include.
    pub max_gates: usize,
    /// Maximum gate-layer depth to include.
    pub max_layers: usize,
}

impl Default for InteractionBounds {
    fn default() -> Self {
        Self {
            max_gates: 1,
            max_layers: 1,
        }
    }
}

impl InteractionBounds {
    /// No bound: scan the whole circuit.
    pub fn unbounded() -> Self {
        Self {
            max_gates: usize::MAX,
            max_layers: usize::MAX,
        }
    }

    /// Bound by operation count only.
    pub fn gates(max_gates: usize) -> Self {
        Self {
            max_gates,
            max_layers: usize::MAX,
        }
    }

    /// Bound by gate-layer depth only.
    pub fn layers(max_layers: usize) -> Self {
        Self {
            max_gates: usize::MAX,
            max_layers,
        }
    }
}

/// Weighted graph of logical-qubit interactions.
///
/// Edge weights decay geometrically with scan position so that
/// earlier interactions dominate placement decisions; repeated
/// interactions accumulate.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    weights: FxHashMap<(QubitId, QubitId), f64>,
}

impl InteractionGraph {
    /// Extract the interaction graph of a circuit.
    ///
    /// Multi-qubit operations are decomposed into all qubit pairs.
    /// Each included operation contributes `decay^i` to its pairs,
    /// where `i` is the operation's position among included
    /// operations. Operations beyond the layer bound are skipped;
    /// scanning stops once the gate bound is reached.
    pub fn extract(dag: &CircuitDag, bounds: InteractionBounds, decay: f64) -> Self {
        let mut graph = Self::default();
        let mut layers: FxHashMap<QubitId, usize> = FxHashMap::default();
        let mut included = 0usize;

        for (_, inst) in dag.topological_ops() {
            if included >= bounds.max_gates {
                break;
            }
            let layer = inst
                .qubits
                .iter()
                .map(|q| layers.get(q).copied().unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 1;
            for &q in &inst.qubits {
                layers.insert(q, layer);
            }
            if !inst.is_gate() || inst.qubits.len() < 2 || layer > bounds.max_layers {
                continue;
            }
            let weight = decay.powi(included as i32);
            for i in 0..inst.qubits.len() {
                for j in (i + 1)..inst.qubits.len() {
                    graph.add_weight(inst.qubits[i], inst.qubits[j], weight);
                }
            }
            included += 1;
        }
        graph
    }

    /// Build an interaction graph from an explicit pair sequence,
    /// weighting pair `i` by `decay^i`.
    pub fn from_pairs(pairs: &[[QubitId; 2]], decay: f64) -> Self {
        let mut graph = Self::default();
        for (i, &[a, b]) in pairs.iter().enumerate() {
            graph.add_weight(a, b, decay.powi(i as i32));
        }
        graph
    }

    fn add_weight(&mut self, a: QubitId, b: QubitId, weight: f64) {
        if a == b {
            return;
        }
        *self.weights.entry(ordered(a, b)).or_insert(0.0) += weight;
    }

    /// Accumulated weight of an interaction pair (zero if absent).
    pub fn weight(&self, a: QubitId, b: QubitId) -> f64 {
        self.weights.get(&ordered(a, b)).copied().unwrap_or(0.0)
    }

    /// Check whether two qubits interact anywhere in the scan.
    pub fn contains(&self, a: QubitId, b: QubitId) -> bool {
        self.weights.contains_key(&ordered(a, b))
    }

    /// Edges sorted by descending weight, then ascending ids.
    ///
    /// The ordering is total, so iteration is deterministic.
    pub fn edges(&self) -> Vec<(QubitId, QubitId, f64)> {
        let mut edges: Vec<_> = self
            .weights
            .iter()
            .map(|(&(a, b), &w)| (a, b, w))
            .collect();
        edges.sort_by(|x, y| {
            y.2.partial_cmp(&x.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (x.0, x.1).cmp(&(y.0, y.1)))
        });
        edges
    }

    /// Interaction partners of a qubit, ascending.
    pub fn neighbours(&self, q: QubitId) -> Vec<QubitId> {
        let mut out: Vec<_> = self
            .weights
            .keys()
            .filter_map(|&(a, b)| {
                if a == q {
                    Some(b)
                } else if b == q {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of distinct interacting pairs.
    pub fn num_edges(&self) -> usize {
        self.weights.len()
    }

    /// Number of distinct qubits that interact.
    pub fn degree(&self, q: QubitId) -> usize {
        self.neighbours(q).len()
    }

    /// All qubits that appear in some interaction, ascending.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut out: Vec<_> = self
            .weights
            .keys()
            .flat_map(|&(a, b)| [a, b])
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

#[inline]
fn ordered(a: QubitId, b: QubitId) -> (QubitId, QubitId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ir::{Circuit, QubitId};

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_extract_ghz() {
        let circuit = Circuit::ghz(4).unwrap();
        let graph =
            InteractionGraph::extract(circuit.dag(), InteractionBounds::unbounded(), 0.5);

        assert_eq!(graph.num_edges(), 3);
        assert!(graph.contains(q(0), q(1)));
        assert!(graph.contains(q(2), q(3)));
        assert!(!graph.contains(q(0), q(3)));
        // First interaction carries the largest weight.
        assert!(graph.weight(q(0), q(1)) > graph.weight(q(2), q(3)));
    }

    #[test]
    fn test_gate_bound() {
        let circuit = Circuit::ghz(5).unwrap();
        let graph = InteractionGraph::extract(circuit.dag(), InteractionBounds::gates(2), 0.5);
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_layer_bound() {
        let mut circuit = Circuit::with_size("t", 4, 0);
        circuit.cx(q(0), q(1)).unwrap(); // layer 1
        circuit.cx(q(2), q(3)).unwrap(); // layer 1
        circuit.cx(q(1), q(2)).unwrap(); // layer 2

        let graph = InteractionGraph::extract(circuit.dag(), InteractionBounds::layers(1), 0.5);
        assert_eq!(graph.num_edges(), 2);
        assert!(!graph.contains(q(1), q(2)));
    }

    #[test]
    fn test_repeat_accumulates() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.cx(q(0), q(1)).unwrap();
        circuit.cx(q(0), q(1)).unwrap();
        let graph =
            InteractionGraph::extract(circuit.dag(), InteractionBounds::unbounded(), 0.5);
        assert_eq!(graph.num_edges(), 1);
        assert!((graph.weight(q(0), q(1)) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_three_qubit_decomposed_pairwise() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.ccx(q(0), q(1), q(2)).unwrap();
        let graph =
            InteractionGraph::extract(circuit.dag(), InteractionBounds::unbounded(), 0.5);
        assert_eq!(graph.num_edges(), 3);
    }

    #[test]
    fn test_from_pairs_deterministic_edges() {
        let pairs = [[q(0), q(1)], [q(1), q(2)], [q(0), q(1)]];
        let graph = InteractionGraph::from_pairs(&pairs, 0.5);
        let edges = graph.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].0, edges[0].1), (q(0), q(1)));
        assert!((edges[0].2 - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_single_qubit_ops_ignored() {
        let mut circuit = Circuit::with_size("t", 2, 2);
        circuit.h(q(0)).unwrap();
        circuit.measure_all().unwrap();
        let graph =
            InteractionGraph::extract(circuit.dag(), InteractionBounds::unbounded(), 0.5);
        assert_eq!(graph.num_edges(), 0);
    }
}
