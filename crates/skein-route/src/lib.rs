//! Qubit placement and routing for [`skein_ir`] circuits.
//!
//! Devices restrict which physical qubit pairs can interact; circuits
//! do not. This crate closes the gap in two steps: a [`Placement`]
//! strategy picks an initial assignment of logical qubits to physical
//! sites by matching the circuit's [`InteractionGraph`] against the
//! device [`ConnectivityGraph`], then the [`MappingManager`] relabels
//! the circuit onto physical wires and resolves every non-adjacent
//! two-qubit operation through its registered [`RoutingMethod`]s,
//! inserting swap instructions (or the four-CX bridge) as it goes.
//! After routing every operand names a device site and every
//! two-qubit operation acts on a connectivity edge; the
//! [`RoutingOutcome`] reports the initial and final maps so callers
//! can undo the permutation.
//!
//! ```
//! use skein_ir::Circuit;
//! use skein_route::{
//!     ConnectivityGraph, GraphPlacement, MappingManager, Placement, verify_routed,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ConnectivityGraph::grid(2, 3);
//! let mut dag = Circuit::qft(5)?.into_dag();
//!
//! let placement = GraphPlacement::new().place(&dag, &graph)?;
//! let outcome = MappingManager::new().route(&graph, &mut dag, placement)?;
//!
//! verify_routed(&dag, &graph, &outcome)?;
//! println!("routed with {} swaps", outcome.swap_count);
//! # Ok(())
//! # }
//! ```

pub mod connectivity;
pub mod error;
pub mod interaction;
pub mod manager;
pub mod noise;
pub mod permutation;
pub mod placement;
pub mod routing;

pub use connectivity::ConnectivityGraph;
pub use error::{RouteError, RouteResult};
pub use interaction::{InteractionBounds, InteractionGraph};
pub use manager::{MappingConfig, MappingManager, RoutingOutcome, verify_routed};
pub use noise::NoiseProfile;
pub use permutation::PermutationTracker;
pub use placement::{
    GraphPlacement, GraphPlacementConfig, LinePlacement, NoiseAwarePlacement, Placement,
    PlacementMap, TrivialPlacement,
};
pub use routing::{BoundaryWindow, LookaheadSwap, Resolution, RoutingMethod};
