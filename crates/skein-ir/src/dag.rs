//! DAG-based circuit representation.
//!
//! Operations are nodes in a petgraph [`DiGraph`]; edges record the
//! data dependency between consecutive operations on the same wire.
//! Unlike representations that materialise explicit input/output
//! nodes per wire, this keeps the graph an arena of operation records
//! with a per-wire tail index, which makes appending O(1) per operand
//! and makes rebuilding (the routing engine's splice) a plain
//! drain-and-reapply.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// The abstraction level of a circuit in the compilation pipeline.
///
/// Circuits start at the `Logical` level and are lowered to the
/// `Physical` level once placement and routing have pinned every
/// two-qubit operation onto a device edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitLevel {
    /// Logical level: qubits are abstract, no physical mapping applied.
    #[default]
    Logical,
    /// Physical level: qubits are mapped to physical device positions.
    Physical,
}

/// DAG-based circuit representation.
///
/// Every node is an operation; wire order is implied by the edges,
/// which carry the [`WireId`] they represent. Qubits and classical
/// bits are declared up front and kept in declaration order so that
/// iteration is deterministic.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// Operation nodes connected by wire-dependency edges.
    graph: DiGraph<Instruction, WireId, u32>,
    /// Declared qubits, in declaration order.
    qubits: Vec<QubitId>,
    /// Declared classical bits, in declaration order.
    clbits: Vec<ClbitId>,
    /// Last operation on each wire, if any.
    wire_tail: FxHashMap<WireId, NodeIndex>,
    /// Abstraction level of the circuit.
    level: CircuitLevel,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            qubits: vec![],
            clbits: vec![],
            wire_tail: FxHashMap::default(),
            level: CircuitLevel::Logical,
        }
    }

    /// Declare a qubit. Redeclaring an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if !self.qubits.contains(&qubit) {
            self.qubits.push(qubit);
        }
    }

    /// Declare a classical bit. Redeclaring is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if !self.clbits.contains(&clbit) {
            self.clbits.push(clbit);
        }
    }

    /// Check whether a qubit has been declared.
    #[inline]
    pub fn contains_qubit(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }

    /// Append an instruction to the end of the circuit.
    ///
    /// Validates operand arity against the gate definition, operand
    /// existence and operand uniqueness before touching the graph.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.qubits.contains(&qubit) {
                return Err(IrError::QubitNotFound(qubit));
            }
        }
        for &clbit in &instruction.clbits {
            if !self.clbits.contains(&clbit) {
                return Err(IrError::ClbitNotFound(clbit));
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit(qubit));
            }
        }

        let wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let node = self.graph.add_node(instruction);
        for wire in wires {
            if let Some(&tail) = self.wire_tail.get(&wire) {
                self.graph.add_edge(tail, node, wire);
            }
            self.wire_tail.insert(wire, node);
        }
        Ok(node)
    }

    /// Iterate over operations in a deterministic topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("append-only circuit graph cannot contain a cycle")
            .into_iter()
            .map(|idx| (idx, &self.graph[idx]))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Drain all operations in topological order, leaving the wire
    /// declarations in place.
    ///
    /// This is the first half of a splice: callers rebuild the
    /// operation sequence with [`apply`](Self::apply).
    pub fn take_ops(&mut self) -> Vec<Instruction> {
        let ops: Vec<Instruction> = self
            .topological_ops()
            .map(|(_, inst)| inst.clone())
            .collect();
        self.graph.clear();
        self.wire_tail.clear();
        ops
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node)
    }

    /// Replace the declared qubit set.
    ///
    /// The second half of a splice that changes wire identity: after
    /// [`take_ops`](Self::take_ops), callers may re-declare the wires
    /// before reapplying. Fails while the circuit still has
    /// operations. Classical bits are untouched.
    pub fn set_qubits(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<()> {
        if self.num_ops() != 0 {
            return Err(IrError::InvalidDag(
                "cannot replace the qubits of a circuit with operations".into(),
            ));
        }
        self.qubits.clear();
        for qubit in qubits {
            self.add_qubit(qubit);
        }
        Ok(())
    }

    /// Rename a qubit identifier throughout the circuit.
    ///
    /// Every operand reference and the wire bookkeeping are updated
    /// consistently. The new identifier must not already be declared.
    pub fn rename_qubit(&mut self, old: QubitId, new: QubitId) -> IrResult<()> {
        if old == new {
            return Ok(());
        }
        if self.qubits.contains(&new) {
            return Err(IrError::QubitExists(new));
        }
        let Some(slot) = self.qubits.iter().position(|&q| q == old) else {
            return Err(IrError::QubitNotFound(old));
        };
        self.qubits[slot] = new;

        for inst in self.graph.node_weights_mut() {
            inst.rename_qubit(old, new);
        }
        let old_wire = WireId::Qubit(old);
        let new_wire = WireId::Qubit(new);
        for edge in self.graph.edge_weights_mut() {
            if *edge == old_wire {
                *edge = new_wire;
            }
        }
        if let Some(tail) = self.wire_tail.remove(&old_wire) {
            self.wire_tail.insert(new_wire, tail);
        }
        Ok(())
    }

    /// Get the number of declared qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of declared classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count()
    }

    /// Count operations with the given name.
    pub fn count_ops(&self, name: &str) -> usize {
        self.graph
            .node_weights()
            .filter(|inst| inst.name() == name)
            .count()
    }

    /// Calculate the circuit depth (longest operation chain).
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for (node, _) in self.topological_ops() {
            let node_depth = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|pred| depths.get(&pred).copied().unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 1;
            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }
        max_depth
    }

    /// Iterate over declared qubits in declaration order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Iterate over declared classical bits in declaration order.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }

    /// Iterate over two-qubit gate operand pairs in topological order.
    pub fn two_qubit_interactions(&self) -> Vec<[QubitId; 2]> {
        self.topological_ops()
            .filter(|(_, inst)| inst.is_two_qubit_gate())
            .map(|(_, inst)| [inst.qubits[0], inst.qubits[1]])
            .collect()
    }

    /// Get the abstraction level of this circuit.
    pub fn level(&self) -> CircuitLevel {
        self.level
    }

    /// Set the abstraction level of this circuit.
    pub fn set_level(&mut self, level: CircuitLevel) {
        self.level = level;
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<Instruction, WireId, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks acyclicity and that every operand of every operation
    /// refers to a declared wire.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }
        for inst in self.graph.node_weights() {
            for &qubit in &inst.qubits {
                if !self.qubits.contains(&qubit) {
                    return Err(IrError::InvalidDag(format!(
                        "Operation references undeclared qubit {qubit}"
                    )));
                }
            }
            for &clbit in &inst.clbits {
                if !self.clbits.contains(&clbit) {
                    return Err(IrError::InvalidDag(format!(
                        "Operation references undeclared clbit {clbit}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}
