//! End-to-end placement and routing tests.

use proptest::prelude::*;
use skein_ir::{Circuit, CircuitDag, CircuitLevel, QubitId};
use skein_route::{
    ConnectivityGraph, GraphPlacement, LinePlacement, MappingManager, Placement, PlacementMap,
    TrivialPlacement, verify_routed,
};

fn q(i: u32) -> QubitId {
    QubitId(i)
}

fn cx_circuit(num_qubits: u32, pairs: &[(u32, u32)]) -> Circuit {
    let mut circuit = Circuit::with_size("test", num_qubits, 0);
    for &(a, b) in pairs {
        circuit.cx(q(a), q(b)).unwrap();
    }
    circuit
}

fn op_sequence(dag: &CircuitDag) -> Vec<(String, Vec<QubitId>)> {
    dag.topological_ops()
        .map(|(_, inst)| (inst.name().to_string(), inst.qubits.clone()))
        .collect()
}

#[test]
fn routed_circuits_respect_connectivity() {
    let graphs = [
        ConnectivityGraph::linear(6),
        ConnectivityGraph::ring(6),
        ConnectivityGraph::star(6),
        ConnectivityGraph::grid(2, 3),
    ];
    let circuits = [Circuit::ghz(5).unwrap(), Circuit::qft(5).unwrap()];

    for graph in &graphs {
        for circuit in &circuits {
            let strategies: [&dyn Placement; 3] = [
                &TrivialPlacement::new(),
                &LinePlacement::new(),
                &GraphPlacement::new(),
            ];
            for strategy in strategies {
                let mut dag = circuit.dag().clone();
                let placement = strategy.place(&dag, graph).unwrap();
                let outcome = MappingManager::new()
                    .route(graph, &mut dag, placement)
                    .unwrap();
                verify_routed(&dag, graph, &outcome).unwrap();
                assert_eq!(dag.level(), CircuitLevel::Physical);
            }
        }
    }
}

#[test]
fn routing_is_deterministic() {
    let graph = ConnectivityGraph::grid(2, 3);
    let circuit = Circuit::qft(5).unwrap();

    let run = || {
        let mut dag = circuit.dag().clone();
        let placement = GraphPlacement::new().place(&dag, &graph).unwrap();
        let outcome = MappingManager::new()
            .route(&graph, &mut dag, placement)
            .unwrap();
        (op_sequence(&dag), outcome)
    };
    let (ops_a, outcome_a) = run();
    let (ops_b, outcome_b) = run();
    assert_eq!(ops_a, ops_b);
    assert_eq!(outcome_a, outcome_b);
}

#[test]
fn valid_circuit_is_untouched() {
    let graph = ConnectivityGraph::linear(4);
    let circuit = Circuit::ghz(4).unwrap();

    let mut dag = circuit.dag().clone();
    let before = op_sequence(&dag);
    let outcome = MappingManager::new()
        .route(&graph, &mut dag, PlacementMap::identity(4))
        .unwrap();

    assert_eq!(outcome.swap_count, 0);
    assert_eq!(outcome.bridge_count, 0);
    assert_eq!(op_sequence(&dag), before);
    assert_eq!(outcome.initial_map, outcome.final_map);
}

#[test]
fn rerouting_a_routed_circuit_is_a_noop() {
    let graph = ConnectivityGraph::linear(5);
    let mut dag = Circuit::qft(5).unwrap().into_dag();

    let placement = GraphPlacement::new().place(&dag, &graph).unwrap();
    let first = MappingManager::new()
        .route(&graph, &mut dag, placement)
        .unwrap();
    verify_routed(&dag, &graph, &first).unwrap();
    let routed_ops = op_sequence(&dag);

    // Routed wires are sites, so the identity over them re-routes the
    // circuit in place.
    let mut identity = PlacementMap::new();
    for qb in dag.qubits() {
        identity.assign(qb, qb.0).unwrap();
    }
    let second = MappingManager::new()
        .route(&graph, &mut dag, identity)
        .unwrap();

    assert_eq!(second.swap_count, 0);
    assert_eq!(second.bridge_count, 0);
    assert_eq!(op_sequence(&dag), routed_ops);
    assert_eq!(second.initial_map, second.final_map);
}

// Placement finds the embedded chain, and the remaining non-adjacent
// interactions are absorbed by one swap plus bridges.
#[test]
fn dense_tail_on_a_line_needs_one_swap() {
    let circuit = cx_circuit(
        4,
        &[(0, 1), (1, 2), (0, 2), (0, 3), (2, 3), (1, 3), (0, 1)],
    );
    let graph = ConnectivityGraph::linear(4);

    let mut dag = circuit.into_dag();
    let placement = GraphPlacement::new().place(&dag, &graph).unwrap();
    let outcome = MappingManager::new()
        .route(&graph, &mut dag, placement)
        .unwrap();

    verify_routed(&dag, &graph, &outcome).unwrap();
    assert_eq!(outcome.swap_count, 1);
    assert_eq!(dag.count_ops("swap"), 1);
}

#[test]
fn lone_distance_two_cx_becomes_a_bridge() {
    let circuit = cx_circuit(3, &[(0, 2)]);
    let graph = ConnectivityGraph::linear(3);

    let mut dag = circuit.into_dag();
    let outcome = MappingManager::new()
        .route(&graph, &mut dag, PlacementMap::identity(3))
        .unwrap();

    assert_eq!(outcome.bridge_count, 1);
    assert_eq!(outcome.swap_count, 0);
    assert_eq!(dag.count_ops("cx"), 4);
    assert_eq!(outcome.initial_map, outcome.final_map);
    verify_routed(&dag, &graph, &outcome).unwrap();
}

#[test]
fn movement_through_empty_sites_stays_on_device_wires() {
    let circuit = cx_circuit(2, &[(0, 1)]);
    let graph = ConnectivityGraph::linear(6);

    let mut placement = PlacementMap::new();
    placement.assign(q(0), 0).unwrap();
    placement.assign(q(1), 5).unwrap();

    let mut dag = circuit.into_dag();
    let outcome = MappingManager::new()
        .route(&graph, &mut dag, placement)
        .unwrap();

    // Qubit 0 travels through unoccupied sites; each swap instruction
    // acts on the site wires it passes over.
    assert!(dag.num_qubits() > 2);
    assert!(dag.qubits().all(|w| w.0 < 6));
    assert!(outcome.swap_count > 0);
    verify_routed(&dag, &graph, &outcome).unwrap();
}

// Routed circuits carry physical wires: operands read as sites form
// edges directly, swap instructions included.
#[test]
fn routed_operands_read_as_sites_form_edges() {
    let circuit = cx_circuit(2, &[(0, 1)]);
    let graph = ConnectivityGraph::linear(5);

    let mut placement = PlacementMap::new();
    placement.assign(q(0), 0).unwrap();
    placement.assign(q(1), 4).unwrap();

    let mut dag = circuit.into_dag();
    let outcome = MappingManager::new()
        .route(&graph, &mut dag, placement)
        .unwrap();

    for (name, qubits) in op_sequence(&dag) {
        if qubits.len() == 2 {
            assert!(
                graph.contains_edge(qubits[0].0, qubits[1].0),
                "'{name}' operands ({}, {}) are not an edge",
                qubits[0],
                qubits[1]
            );
        }
    }
    verify_routed(&dag, &graph, &outcome).unwrap();
}

#[test]
fn swap_count_stays_within_the_diameter_bound() {
    let graph = ConnectivityGraph::ring(8);
    let circuit = Circuit::qft(8).unwrap();
    let two_qubit_gates = circuit.dag().two_qubit_interactions().len();

    let mut dag = circuit.into_dag();
    let outcome = MappingManager::new()
        .route(&graph, &mut dag, PlacementMap::identity(8))
        .unwrap();

    let bound = two_qubit_gates * graph.diameter() as usize;
    assert!(
        outcome.swap_count <= bound,
        "{} swaps exceeds bound {bound}",
        outcome.swap_count
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_circuits_route_validly(
        num_qubits in 2u32..6,
        extra_sites in 0u32..3,
        pair_seeds in prop::collection::vec((0u32..6, 0u32..6), 1..16),
    ) {
        let pairs: Vec<(u32, u32)> = pair_seeds
            .into_iter()
            .map(|(a, b)| (a % num_qubits, b % num_qubits))
            .filter(|(a, b)| a != b)
            .collect();
        prop_assume!(!pairs.is_empty());

        let circuit = cx_circuit(num_qubits, &pairs);
        let graph = ConnectivityGraph::linear(num_qubits + extra_sites);

        let mut dag = circuit.into_dag();
        let placement = LinePlacement::new().place(&dag, &graph).unwrap();
        let outcome = MappingManager::new()
            .route(&graph, &mut dag, placement)
            .unwrap();

        verify_routed(&dag, &graph, &outcome).unwrap();
        let bound = pairs.len() * graph.diameter() as usize;
        prop_assert!(outcome.swap_count <= bound);
    }

    #[test]
    fn random_routing_is_deterministic(
        num_qubits in 2u32..5,
        pair_seeds in prop::collection::vec((0u32..5, 0u32..5), 1..10),
    ) {
        let pairs: Vec<(u32, u32)> = pair_seeds
            .into_iter()
            .map(|(a, b)| (a % num_qubits, b % num_qubits))
            .filter(|(a, b)| a != b)
            .collect();
        prop_assume!(!pairs.is_empty());

        let circuit = cx_circuit(num_qubits, &pairs);
        let graph = ConnectivityGraph::ring(num_qubits + 1);

        let run = || {
            let mut dag = circuit.dag().clone();
            let placement = GraphPlacement::new().place(&dag, &graph).unwrap();
            let outcome = MappingManager::new()
                .route(&graph, &mut dag, placement)
                .unwrap();
            (op_sequence(&dag), outcome)
        };
        prop_assert_eq!(run(), run());
    }
}
