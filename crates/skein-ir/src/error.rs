//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {0} not found in circuit")]
    QubitNotFound(QubitId),

    /// Classical bit not found in circuit.
    #[error("Classical bit {0} not found in circuit")]
    ClbitNotFound(ClbitId),

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit operand in a single operation.
    #[error("Duplicate qubit {0} in operation")]
    DuplicateQubit(QubitId),

    /// Qubit identifier already declared.
    #[error("Qubit {0} already exists in circuit")]
    QubitExists(QubitId),

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
