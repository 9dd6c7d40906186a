//! Error types for the routing engine.
//!
//! There is no transient or retryable class here: the engine performs
//! no I/O, and every failure propagates synchronously to the caller
//! of `place`/`route`. A reported error means "this circuit cannot be
//! routed under the given configuration".

use skein_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors that can occur during placement and routing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouteError {
    /// Connectivity description contains a self-loop edge.
    #[error("Connectivity edge ({0}, {0}) is a self-loop")]
    SelfLoopEdge(u32),

    /// Connectivity description contains a duplicate edge.
    #[error("Duplicate connectivity edge ({0}, {1})")]
    DuplicateEdge(u32, u32),

    /// Connectivity edge references a node outside the declared range.
    #[error("Connectivity edge ({a}, {b}) references a node >= {num_nodes}")]
    EdgeOutOfRange {
        /// First endpoint.
        a: u32,
        /// Second endpoint.
        b: u32,
        /// Declared node count.
        num_nodes: u32,
    },

    /// The mapping manager was configured with no routing methods.
    #[error("Routing method list is empty")]
    EmptyMethodList,

    /// No registered routing method could resolve a boundary window.
    #[error(
        "No routing method can resolve interaction ({q1}, {q2}); \
         the configured method list is insufficiently general"
    )]
    NoApplicableMethod {
        /// First logical qubit of the blocked interaction.
        q1: QubitId,
        /// Second logical qubit of the blocked interaction.
        q2: QubitId,
    },

    /// Two placed qubits have no connecting path in the graph.
    #[error("Physical qubits {0} and {1} are in disconnected components")]
    DisconnectedGraph(u32, u32),

    /// Circuit requires more physical qubits than the graph provides.
    #[error("Circuit requires {required} qubits but the device has {available}")]
    UnplaceableCircuit {
        /// Number of logical qubits in the circuit.
        required: usize,
        /// Number of physical qubits available.
        available: u32,
    },

    /// Error probability outside [0, 1].
    #[error("Error rate {0} is not a probability in [0, 1]")]
    InvalidErrorRate(f64),

    /// Operation the router cannot handle (e.g. a 3-qubit gate).
    #[error("Cannot route '{name}' acting on {num_qubits} qubits; decompose it first")]
    UnsupportedOperation {
        /// Instruction name.
        name: String,
        /// Operand count.
        num_qubits: usize,
    },

    /// Placement map would become non-injective. Internal invariant
    /// violation: indicates a bug, not a user error.
    #[error("Placement conflict: qubit {logical} and physical site {physical} already mapped")]
    PlacementConflict {
        /// Logical qubit being assigned.
        logical: QubitId,
        /// Physical site involved in the conflict.
        physical: u32,
    },

    /// Permutation tracker diverged from circuit qubit usage. Internal
    /// invariant violation: indicates a bug, not a user error.
    #[error("Permutation tracker diverged: {0}")]
    TrackerDiverged(String),

    /// A routed circuit failed post-hoc verification.
    #[error("Routed circuit failed verification: {0}")]
    ValidityViolation(String),

    /// Underlying IR error while rewriting the circuit.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
