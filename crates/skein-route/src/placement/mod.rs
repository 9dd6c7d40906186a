//! Placement strategies.
//!
//! A placement strategy chooses an initial assignment of logical
//! qubits to physical sites before routing begins. Strategies are
//! allowed to return a partial map; the mapping manager allocates the
//! remainder on demand. Every strategy is deterministic for a given
//! circuit and connectivity graph.

mod graph;
mod line;
mod map;
mod noise_aware;

pub use graph::{GraphPlacement, GraphPlacementConfig};
pub use line::LinePlacement;
pub use map::PlacementMap;
pub use noise_aware::NoiseAwarePlacement;

use skein_ir::CircuitDag;
use tracing::debug;

use crate::connectivity::ConnectivityGraph;
use crate::error::{RouteError, RouteResult};

/// An initial-placement strategy.
pub trait Placement {
    /// Strategy name, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Compute a placement for `dag` on `graph`.
    ///
    /// The returned map may be partial. Fails with
    /// [`RouteError::UnplaceableCircuit`] when the circuit declares
    /// more qubits than the graph has.
    fn place(&self, dag: &CircuitDag, graph: &ConnectivityGraph) -> RouteResult<PlacementMap>;
}

/// The identity placement: each declared qubit `q` sits on physical
/// site `q`.
///
/// The baseline every other strategy is measured against. Useful on
/// its own when the circuit was authored with the device topology in
/// mind. The map is keyed on the circuit's actual qubit ids, so
/// renamed or non-dense ids never produce phantom entries; an id with
/// no matching site fails as unplaceable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrivialPlacement;

impl TrivialPlacement {
    /// Create the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl Placement for TrivialPlacement {
    fn name(&self) -> &str {
        "trivial"
    }

    fn place(&self, dag: &CircuitDag, graph: &ConnectivityGraph) -> RouteResult<PlacementMap> {
        check_capacity(dag, graph)?;
        let mut map = PlacementMap::new();
        for qubit in dag.qubits() {
            if qubit.0 >= graph.num_nodes() {
                return Err(RouteError::UnplaceableCircuit {
                    required: qubit.0 as usize + 1,
                    available: graph.num_nodes(),
                });
            }
            map.assign(qubit, qubit.0)?;
        }
        debug!(qubits = map.len(), "trivial placement");
        Ok(map)
    }
}

pub(crate) fn check_capacity(dag: &CircuitDag, graph: &ConnectivityGraph) -> RouteResult<()> {
    let required = dag.num_qubits();
    if required > graph.num_nodes() as usize {
        return Err(RouteError::UnplaceableCircuit {
            required,
            available: graph.num_nodes(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ir::{Circuit, QubitId};

    #[test]
    fn test_trivial_keys_on_declared_ids() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(2));
        dag.add_qubit(QubitId(5));
        let graph = ConnectivityGraph::linear(6);

        let map = TrivialPlacement::new().place(&dag, &graph).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.physical(QubitId(2)), Some(2));
        assert_eq!(map.physical(QubitId(5)), Some(5));
        assert!(map.is_free(0));
    }

    #[test]
    fn test_trivial_rejects_id_past_the_device() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(7));
        let graph = ConnectivityGraph::linear(3);
        assert!(matches!(
            TrivialPlacement::new().place(&dag, &graph),
            Err(RouteError::UnplaceableCircuit { .. })
        ));
    }

    #[test]
    fn test_trivial_identity() {
        let circuit = Circuit::ghz(3).unwrap();
        let graph = ConnectivityGraph::linear(5);
        let map = TrivialPlacement::new()
            .place(circuit.dag(), &graph)
            .unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.physical(QubitId(2)), Some(2));
    }

    #[test]
    fn test_trivial_rejects_oversized_circuit() {
        let circuit = Circuit::ghz(5).unwrap();
        let graph = ConnectivityGraph::linear(3);
        let result = TrivialPlacement::new().place(circuit.dag(), &graph);
        assert!(matches!(
            result,
            Err(RouteError::UnplaceableCircuit {
                required: 5,
                available: 3
            })
        ));
    }
}
