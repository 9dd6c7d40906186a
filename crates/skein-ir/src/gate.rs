//! Standard gate definitions.

use serde::{Deserialize, Serialize};

/// A standard quantum gate with concrete (bound) rotation angles.
///
/// Angles are plain `f64` radians; symbolic parameters are out of
/// scope for this IR, which exists to feed the placement and routing
/// engine rather than variational workflows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate.
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// X rotation.
    Rx(f64),
    /// Y rotation.
    Ry(f64),
    /// Z rotation.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Controlled-NOT.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// Controlled-phase.
    CP(f64),
    /// Controlled X rotation.
    CRx(f64),
    /// Controlled Y rotation.
    CRy(f64),
    /// Controlled Z rotation.
    CRz(f64),
    /// ZZ interaction rotation.
    RZZ(f64),
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Toffoli (CCNOT) gate.
    CCX,
    /// Fredkin (controlled-SWAP) gate.
    CSwap,
}

impl StandardGate {
    /// Get the canonical lowercase name of the gate.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::CP(_) => "cp",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Number of qubits this gate acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_) => 1,
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::CP(_)
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::RZZ(_)
            | StandardGate::Swap
            | StandardGate::ISwap => 2,
            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Check if this gate acts on exactly two qubits.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.num_qubits() == 2
    }

    /// Check if this gate is symmetric under operand exchange.
    ///
    /// Routing uses this to know when control/target order is free.
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            StandardGate::CZ
                | StandardGate::CP(_)
                | StandardGate::RZZ(_)
                | StandardGate::Swap
                | StandardGate::ISwap
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_names() {
        assert_eq!(StandardGate::H.name(), "h");
        assert_eq!(StandardGate::CX.name(), "cx");
        assert_eq!(StandardGate::Rz(0.5).name(), "rz");
        assert_eq!(StandardGate::Swap.name(), "swap");
    }

    #[test]
    fn test_gate_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert!(StandardGate::CZ.is_two_qubit());
        assert!(!StandardGate::X.is_two_qubit());
    }

    #[test]
    fn test_symmetry() {
        assert!(StandardGate::CZ.is_symmetric());
        assert!(StandardGate::Swap.is_symmetric());
        assert!(!StandardGate::CX.is_symmetric());
    }
}
