//! Permutation tracking across routing.

use skein_ir::QubitId;

use crate::error::{RouteError, RouteResult};
use crate::placement::PlacementMap;

/// Tracks how the logical-to-physical assignment evolves as swaps are
/// inserted.
///
/// The tracker holds the initial map, the current map, and the swap
/// log connecting them. A swap may carry a qubit into an unoccupied
/// site, and a qubit allocated after swaps have run is entered into
/// the initial map at the site the swap log moves to its current one.
/// Either way the invariant "initial composed with the swap log
/// equals current" holds by construction; [`verify`](Self::verify)
/// re-derives it as a bug check.
#[derive(Debug, Clone, Default)]
pub struct PermutationTracker {
    initial: PlacementMap,
    current: PlacementMap,
    swaps: Vec<(u32, u32)>,
}

impl PermutationTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tracker from a placement. Fails if the placement
    /// conflicts with earlier assignments.
    pub fn seed(placement: &PlacementMap) -> RouteResult<Self> {
        let mut tracker = Self::new();
        for (logical, physical) in placement.iter() {
            tracker.assign(logical, physical)?;
        }
        Ok(tracker)
    }

    /// Record a qubit allocation at a currently free site.
    ///
    /// The initial map receives the site the swap log would have
    /// carried to `physical`, so replaying the log reproduces the
    /// current map regardless of when the qubit was allocated.
    pub fn assign(&mut self, logical: QubitId, physical: u32) -> RouteResult<()> {
        if !self.current.is_free(physical) || self.current.contains_logical(logical) {
            return Err(RouteError::PlacementConflict { logical, physical });
        }
        let origin = self.origin_of(physical);
        self.initial.assign(logical, origin)?;
        self.current.assign(logical, physical)
    }

    /// The site whose contents the swap log moves to `physical`.
    fn origin_of(&self, physical: u32) -> u32 {
        let mut site = physical;
        for &(p1, p2) in self.swaps.iter().rev() {
            if site == p1 {
                site = p2;
            } else if site == p2 {
                site = p1;
            }
        }
        site
    }

    /// Record an inserted swap; only the current map moves.
    ///
    /// One side may be unoccupied, in which case the other occupant
    /// simply moves across. A swap of two unoccupied sites does
    /// nothing and is reported as a bug.
    pub fn apply_swap(&mut self, p1: u32, p2: u32) -> RouteResult<()> {
        if self.current.is_free(p1) && self.current.is_free(p2) {
            return Err(RouteError::TrackerDiverged(format!(
                "swap ({p1}, {p2}) touches two unoccupied sites"
            )));
        }
        self.current.swap_physical(p1, p2);
        self.swaps.push((p1, p2));
        Ok(())
    }

    /// The map as it was before any swap.
    pub fn initial_map(&self) -> &PlacementMap {
        &self.initial
    }

    /// The map after all recorded swaps.
    pub fn final_map(&self) -> &PlacementMap {
        &self.current
    }

    /// Inserted swaps in insertion order, as physical site pairs.
    pub fn swaps(&self) -> &[(u32, u32)] {
        &self.swaps
    }

    /// Current site of a logical qubit.
    pub fn site_of(&self, logical: QubitId) -> Option<u32> {
        self.current.physical(logical)
    }

    /// Current occupant of a physical site.
    pub fn occupant(&self, physical: u32) -> Option<QubitId> {
        self.current.logical(physical)
    }

    /// Re-derive the current map from the initial map and the swap
    /// log, and compare. A mismatch is an internal bug.
    pub fn verify(&self) -> RouteResult<()> {
        let mut replayed = self.initial.clone();
        for &(p1, p2) in &self.swaps {
            replayed.swap_physical(p1, p2);
        }
        if replayed != self.current {
            return Err(RouteError::TrackerDiverged(format!(
                "replay of {} swaps does not reproduce the final map",
                self.swaps.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_initial_untouched_by_swaps() {
        let mut tracker = PermutationTracker::new();
        tracker.assign(q(0), 0).unwrap();
        tracker.assign(q(1), 1).unwrap();
        tracker.apply_swap(0, 1).unwrap();

        assert_eq!(tracker.initial_map().physical(q(0)), Some(0));
        assert_eq!(tracker.final_map().physical(q(0)), Some(1));
        tracker.verify().unwrap();
    }

    #[test]
    fn test_late_allocation_lands_in_both_maps() {
        let mut tracker = PermutationTracker::new();
        tracker.assign(q(0), 0).unwrap();
        tracker.assign(q(1), 1).unwrap();
        tracker.apply_swap(0, 1).unwrap();
        tracker.assign(q(2), 2).unwrap();

        assert_eq!(tracker.initial_map().physical(q(2)), Some(2));
        assert_eq!(tracker.final_map().physical(q(2)), Some(2));
        tracker.verify().unwrap();
    }

    #[test]
    fn test_late_allocation_threads_through_the_swap_log() {
        let mut tracker = PermutationTracker::new();
        tracker.assign(q(0), 0).unwrap();
        tracker.apply_swap(0, 1).unwrap();
        tracker.apply_swap(1, 2).unwrap();

        // Site 0 is free now, but replaying the log moves site 1's
        // contents there; the initial map must say so.
        tracker.assign(q(1), 0).unwrap();
        assert_eq!(tracker.initial_map().physical(q(1)), Some(1));
        assert_eq!(tracker.final_map().physical(q(1)), Some(0));
        tracker.verify().unwrap();
    }

    #[test]
    fn test_seed_from_placement() {
        let placement = PlacementMap::identity(3);
        let tracker = PermutationTracker::seed(&placement).unwrap();
        assert_eq!(tracker.final_map(), &placement);
        assert_eq!(tracker.swaps().len(), 0);
    }

    #[test]
    fn test_conflicting_assign_rejected() {
        let mut tracker = PermutationTracker::new();
        tracker.assign(q(0), 0).unwrap();
        assert!(tracker.assign(q(1), 0).is_err());
        assert!(tracker.assign(q(0), 1).is_err());
    }

    #[test]
    fn test_swap_into_free_site_moves_the_occupant() {
        let mut tracker = PermutationTracker::new();
        tracker.assign(q(0), 0).unwrap();
        tracker.apply_swap(0, 1).unwrap();

        assert_eq!(tracker.site_of(q(0)), Some(1));
        assert_eq!(tracker.occupant(0), None);
        assert_eq!(tracker.initial_map().physical(q(0)), Some(0));
        tracker.verify().unwrap();
    }

    #[test]
    fn test_swap_of_two_free_sites_rejected() {
        let mut tracker = PermutationTracker::new();
        tracker.assign(q(0), 0).unwrap();
        assert!(matches!(
            tracker.apply_swap(1, 2),
            Err(RouteError::TrackerDiverged(_))
        ));
    }

    #[test]
    fn test_swap_chain() {
        let mut tracker = PermutationTracker::new();
        for i in 0..3 {
            tracker.assign(q(i), i).unwrap();
        }
        tracker.apply_swap(0, 1).unwrap();
        tracker.apply_swap(1, 2).unwrap();
        assert_eq!(tracker.site_of(q(0)), Some(2));
        assert_eq!(tracker.occupant(0), Some(q(1)));
        tracker.verify().unwrap();
    }
}
