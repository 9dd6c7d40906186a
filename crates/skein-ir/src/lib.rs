//! Skein Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing
//! quantum circuits in Skein. It is the substrate the placement and
//! routing engine ([`skein-route`]) operates on.
//!
//! # Overview
//!
//! The circuit IR uses a DAG representation internally: operations
//! are nodes, and edges record the data dependency between
//! consecutive operations on the same qubit or classical wire. The
//! high-level [`Circuit`] API provides a convenient builder pattern.
//!
//! # Core Components
//!
//! - **Qubits and classical bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] with bound `f64` angles
//! - **Instructions**: [`Instruction`] combining gates with operands
//! - **DAG**: [`CircuitDag`] internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use skein_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! [`skein-route`]: https://docs.rs/skein-route

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, CircuitLevel, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
