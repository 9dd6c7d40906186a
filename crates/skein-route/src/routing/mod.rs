//! Routing methods.
//!
//! A routing method is consulted when the mapping manager hits a
//! two-qubit operation whose operands are not adjacent on the device.
//! It inspects a window of upcoming interactions and proposes a
//! resolution; the manager applies it, so methods never mutate the
//! placement themselves. Methods are tried in registration order and
//! the first one whose [`can_resolve`](RoutingMethod::can_resolve)
//! accepts the window wins.

mod lookahead;

pub use lookahead::LookaheadSwap;

use skein_ir::{QubitId, StandardGate};

use crate::connectivity::ConnectivityGraph;
use crate::error::RouteResult;
use crate::placement::PlacementMap;

/// The blocked operation plus the upcoming two-qubit interactions
/// behind it, in program order.
#[derive(Debug, Clone)]
pub struct BoundaryWindow {
    /// Gate of the blocked operation.
    pub front_gate: StandardGate,
    /// Interaction pairs; `pairs[0]` is the blocked operation itself.
    pub pairs: Vec<[QubitId; 2]>,
}

impl BoundaryWindow {
    /// The blocked interaction at the front of the window.
    pub fn front(&self) -> [QubitId; 2] {
        self.pairs[0]
    }
}

/// A proposed fix for a blocked two-qubit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Insert swaps on the given physical site pairs, in order. The
    /// blocked operation is retried afterwards.
    Swaps(Vec<(u32, u32)>),
    /// Replace the blocked CX with the four-CX bridge construction
    /// through the shared neighbour `via`. Consumes the operation
    /// without moving any qubit.
    Bridge {
        /// Physical site adjacent to both operands.
        via: u32,
    },
}

/// A strategy for resolving blocked two-qubit operations.
pub trait RoutingMethod {
    /// Method name, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Check whether this method can make progress on the window.
    ///
    /// A method list must end with a method that always accepts;
    /// otherwise routing fails with
    /// [`RouteError::NoApplicableMethod`](crate::RouteError::NoApplicableMethod).
    fn can_resolve(
        &self,
        window: &BoundaryWindow,
        placement: &PlacementMap,
        graph: &ConnectivityGraph,
    ) -> bool;

    /// Propose a resolution. Every proposed swap must strictly reduce
    /// the distance between the front pair's sites, so repeated
    /// application terminates.
    fn resolve(
        &self,
        window: &BoundaryWindow,
        placement: &PlacementMap,
        graph: &ConnectivityGraph,
    ) -> RouteResult<Resolution>;
}
