//! Partial injective mapping from logical to physical qubits.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use skein_ir::QubitId;

use crate::error::{RouteError, RouteResult};

/// A partial injective function from logical qubits to physical
/// qubit indices.
///
/// Both directions are indexed. Injectivity is enforced on every
/// [`assign`](Self::assign): mapping two logical qubits onto one
/// physical site is an internal invariant violation, never silently
/// resolved. The map may be partial during placement; the mapping
/// manager completes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementMap {
    /// Map from logical qubit to physical index.
    logical_to_physical: FxHashMap<QubitId, u32>,
    /// Map from physical index to logical qubit.
    physical_to_logical: FxHashMap<u32, QubitId>,
}

impl PlacementMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the identity map over `n` qubits (logical i → physical i).
    pub fn identity(n: u32) -> Self {
        let mut map = Self::new();
        for i in 0..n {
            map.logical_to_physical.insert(QubitId(i), i);
            map.physical_to_logical.insert(i, QubitId(i));
        }
        map
    }

    /// Assign a logical qubit to a physical site.
    ///
    /// Reassigning the identical pair is a no-op; any conflicting
    /// assignment is rejected.
    pub fn assign(&mut self, logical: QubitId, physical: u32) -> RouteResult<()> {
        match self.logical_to_physical.get(&logical) {
            Some(&p) if p == physical => return Ok(()),
            Some(_) => return Err(RouteError::PlacementConflict { logical, physical }),
            None => {}
        }
        if self.physical_to_logical.contains_key(&physical) {
            return Err(RouteError::PlacementConflict { logical, physical });
        }
        self.logical_to_physical.insert(logical, physical);
        self.physical_to_logical.insert(physical, logical);
        Ok(())
    }

    /// Get the physical site holding a logical qubit.
    pub fn physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Get the logical qubit held at a physical site.
    pub fn logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Check if a logical qubit has been placed.
    pub fn contains_logical(&self, logical: QubitId) -> bool {
        self.logical_to_physical.contains_key(&logical)
    }

    /// Check if a physical site is unoccupied.
    pub fn is_free(&self, physical: u32) -> bool {
        !self.physical_to_logical.contains_key(&physical)
    }

    /// Exchange the occupants of two physical sites.
    ///
    /// Either site may be empty; its occupant (if any) moves across.
    pub fn swap_physical(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.remove(&p1);
        let l2 = self.physical_to_logical.remove(&p2);
        if let Some(l) = l1 {
            self.physical_to_logical.insert(p2, l);
            self.logical_to_physical.insert(l, p2);
        }
        if let Some(l) = l2 {
            self.physical_to_logical.insert(p1, l);
            self.logical_to_physical.insert(l, p1);
        }
    }

    /// Number of placed logical qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// Check if every qubit in `qubits` has been placed.
    pub fn is_total_for(&self, qubits: impl IntoIterator<Item = QubitId>) -> bool {
        qubits.into_iter().all(|q| self.contains_logical(q))
    }

    /// Iterate over (logical, physical) pairs, sorted by logical id.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        let mut pairs: Vec<_> = self
            .logical_to_physical
            .iter()
            .map(|(&l, &p)| (l, p))
            .collect();
        pairs.sort_unstable();
        pairs.into_iter()
    }

    /// Physical sites with no occupant, ascending, within `0..num_nodes`.
    pub fn free_sites(&self, num_nodes: u32) -> Vec<u32> {
        (0..num_nodes).filter(|p| self.is_free(*p)).collect()
    }
}
