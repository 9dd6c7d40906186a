//! The mapping manager.
//!
//! Walks a circuit in topological order, keeps a running
//! logical-to-physical map, and consults the registered routing
//! methods whenever a two-qubit operation lands on non-adjacent
//! sites. The circuit is rebuilt on physical wires: after routing,
//! every qubit operand names the device site where the operation
//! executes, and the [`RoutingOutcome`] reports where the logical
//! qubits sit at entry and exit.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use skein_ir::{CircuitDag, CircuitLevel, Instruction, QubitId, StandardGate};
use tracing::{debug, info, instrument};

use crate::connectivity::ConnectivityGraph;
use crate::error::{RouteError, RouteResult};
use crate::permutation::PermutationTracker;
use crate::placement::PlacementMap;
use crate::routing::{BoundaryWindow, LookaheadSwap, Resolution, RoutingMethod};

/// Mapping manager configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingConfig {
    /// Number of upcoming two-qubit interactions exposed to routing
    /// methods in the boundary window (including the blocked one).
    pub window: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self { window: 20 }
    }
}

/// What routing did to a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingOutcome {
    /// Logical-to-physical map before the first instruction.
    pub initial_map: PlacementMap,
    /// Logical-to-physical map after the last instruction.
    pub final_map: PlacementMap,
    /// Number of swap instructions inserted.
    pub swap_count: usize,
    /// Number of blocked operations replaced by the bridge
    /// construction.
    pub bridge_count: usize,
}

/// Drives placement-aware rewriting of a circuit against a device.
///
/// Methods are consulted in registration order; the default
/// configuration registers [`LookaheadSwap`] alone. The manager owns
/// all mutation: methods only propose, which keeps the placement map
/// and the permutation tracker in one pair of hands.
pub struct MappingManager {
    methods: Vec<Box<dyn RoutingMethod>>,
    config: MappingConfig,
}

impl Default for MappingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingManager {
    /// Create a manager with the default method list.
    pub fn new() -> Self {
        Self {
            methods: vec![Box::new(LookaheadSwap::new())],
            config: MappingConfig::default(),
        }
    }

    /// Create a manager with an explicit method list, consulted in
    /// order.
    pub fn with_methods(methods: Vec<Box<dyn RoutingMethod>>) -> Self {
        Self {
            methods,
            config: MappingConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: MappingConfig) -> Self {
        self.config = config;
        self
    }

    /// Route `dag` onto `graph`, starting from `placement`.
    ///
    /// The circuit is rewritten in place onto physical wires: every
    /// qubit operand is relabelled to the site where the operation
    /// executes, with swap instructions inserted where qubits must
    /// move, so every two-qubit operation in the output acts on a
    /// connectivity edge. Qubits the placement left out are allocated
    /// on first use, next to their interaction partner when one is
    /// already placed. On success the circuit is marked
    /// [`CircuitLevel::Physical`].
    ///
    /// Swap gates in a logical-level input are elided: their wire
    /// exchange is folded into the remaining instructions, so every
    /// swap instruction in the output is one routing inserted. In a
    /// physical-level input the qubit ids already name sites; its swap
    /// instructions are kept as ordinary gates and do not move the
    /// tracker, which makes re-routing a routed circuit onto the same
    /// graph a pass-through.
    #[instrument(skip_all, fields(ops = dag.num_ops(), qubits = dag.num_qubits()))]
    pub fn route(
        &self,
        graph: &ConnectivityGraph,
        dag: &mut CircuitDag,
        placement: PlacementMap,
    ) -> RouteResult<RoutingOutcome> {
        if self.methods.is_empty() {
            return Err(RouteError::EmptyMethodList);
        }
        let required = dag.num_qubits();
        if required > graph.num_nodes() as usize {
            return Err(RouteError::UnplaceableCircuit {
                required,
                available: graph.num_nodes(),
            });
        }

        let physical_input = dag.level() == CircuitLevel::Physical;
        let mut tracker = PermutationTracker::seed(&placement)?;
        let mut elisions: FxHashMap<QubitId, QubitId> = FxHashMap::default();
        let mut pending: VecDeque<Instruction> = dag.take_ops().into();
        let declared: Vec<QubitId> = dag.qubits().collect();
        let mut routed: Vec<Instruction> = Vec::with_capacity(pending.len());
        let mut swap_count = 0usize;
        let mut bridge_count = 0usize;
        // Strictly-shortening swaps reach adjacency within diameter
        // steps; anything past this limit is a method bug.
        let attempt_limit = graph.diameter() as usize * 2 + 4;

        while let Some(mut inst) = pending.pop_front() {
            for q in &mut inst.qubits {
                if let Some(&r) = elisions.get(q) {
                    *q = r;
                }
            }

            if !physical_input && is_swap(&inst) {
                compose_swap(&mut elisions, inst.qubits[0], inst.qubits[1]);
                continue;
            }
            if inst.is_gate() && inst.qubits.len() > 2 {
                return Err(RouteError::UnsupportedOperation {
                    name: inst.name().to_string(),
                    num_qubits: inst.qubits.len(),
                });
            }

            for i in 0..inst.qubits.len() {
                if tracker.site_of(inst.qubits[i]).is_none() {
                    let hint = if inst.is_two_qubit_gate() {
                        tracker.site_of(inst.qubits[1 - i])
                    } else {
                        None
                    };
                    allocate(graph, &mut tracker, required, inst.qubits[i], hint)?;
                }
            }

            if !inst.is_two_qubit_gate() {
                routed.push(sited(&tracker, &inst)?);
                continue;
            }

            let (q1, q2) = (inst.qubits[0], inst.qubits[1]);
            let mut attempts = 0usize;
            loop {
                let (p1, p2) = (site(&tracker, q1)?, site(&tracker, q2)?);
                if graph.contains_edge(p1, p2) {
                    // A swap gate in physical input is an ordinary
                    // gate between two sites; the tracker must not
                    // move.
                    routed.push(sited(&tracker, &inst)?);
                    break;
                }

                attempts += 1;
                if attempts > attempt_limit {
                    return Err(RouteError::TrackerDiverged(format!(
                        "no progress routing ({q1}, {q2}) after {attempts} resolutions"
                    )));
                }

                let window = self.window(&inst, &pending, &elisions, physical_input)?;
                let method = self
                    .methods
                    .iter()
                    .find(|m| m.can_resolve(&window, tracker.final_map(), graph))
                    .ok_or(RouteError::NoApplicableMethod { q1, q2 })?;

                match method.resolve(&window, tracker.final_map(), graph)? {
                    Resolution::Swaps(swaps) => {
                        for (a, b) in swaps {
                            routed.push(Instruction::two_qubit_gate(
                                StandardGate::Swap,
                                QubitId(a),
                                QubitId(b),
                            ));
                            tracker.apply_swap(a, b)?;
                            swap_count += 1;
                            debug!(a, b, "swap inserted");
                        }
                    }
                    Resolution::Bridge { via } => {
                        for (a, b) in [(p1, via), (via, p2), (p1, via), (via, p2)] {
                            routed.push(Instruction::two_qubit_gate(
                                StandardGate::CX,
                                QubitId(a),
                                QubitId(b),
                            ));
                        }
                        bridge_count += 1;
                        debug!(via, "bridge inserted");
                        break;
                    }
                }
            }
        }

        // Declared qubits no instruction touched still get a site, so
        // the reported maps are total.
        for qubit in declared {
            if tracker.site_of(qubit).is_none() {
                allocate(graph, &mut tracker, required, qubit, None)?;
            }
        }
        tracker.verify()?;

        // Re-declare the wires as the device sites the rewritten
        // instructions and the final occupancy touch, then splice the
        // instruction sequence back in.
        let mut sites: Vec<u32> = routed
            .iter()
            .flat_map(|inst| inst.qubits.iter().map(|q| q.0))
            .chain(tracker.final_map().iter().map(|(_, p)| p))
            .collect();
        sites.sort_unstable();
        sites.dedup();
        dag.set_qubits(sites.into_iter().map(QubitId))?;
        for inst in routed {
            dag.apply(inst)?;
        }
        dag.set_level(CircuitLevel::Physical);

        info!(swap_count, bridge_count, "routing complete");
        Ok(RoutingOutcome {
            initial_map: tracker.initial_map().clone(),
            final_map: tracker.final_map().clone(),
            swap_count,
            bridge_count,
        })
    }

    /// Boundary window: the blocked pair first, then upcoming
    /// two-qubit interactions in program order.
    fn window(
        &self,
        front: &Instruction,
        pending: &VecDeque<Instruction>,
        elisions: &FxHashMap<QubitId, QubitId>,
        physical_input: bool,
    ) -> RouteResult<BoundaryWindow> {
        let front_gate = *front
            .as_gate()
            .ok_or_else(|| RouteError::UnsupportedOperation {
                name: front.name().to_string(),
                num_qubits: front.qubits.len(),
            })?;
        let resolve = |q: QubitId| elisions.get(&q).copied().unwrap_or(q);
        let mut pairs = vec![[front.qubits[0], front.qubits[1]]];
        pairs.extend(
            pending
                .iter()
                .filter(|i| i.is_two_qubit_gate())
                // Swaps about to be elided never need adjacency.
                .filter(|i| physical_input || !is_swap(i))
                .take(self.config.window.saturating_sub(1))
                .map(|i| [resolve(i.qubits[0]), resolve(i.qubits[1])]),
        );
        Ok(BoundaryWindow { front_gate, pairs })
    }
}

/// Check that a routed circuit respects the connectivity graph and
/// that the reported maps are consistent with its swap instructions.
///
/// Routed circuits carry physical wires, so every qubit operand is
/// read as a device site: two-qubit operands must form edges, and
/// composing the circuit's swap instructions onto
/// `outcome.initial_map` must reproduce `outcome.final_map`. Valid
/// for circuits produced by [`MappingManager::route`] from logical
/// input, where every swap instruction is routing inserted.
pub fn verify_routed(
    dag: &CircuitDag,
    graph: &ConnectivityGraph,
    outcome: &RoutingOutcome,
) -> RouteResult<()> {
    let mut permuted = outcome.initial_map.clone();
    for (_, inst) in dag.topological_ops() {
        for &q in &inst.qubits {
            if q.0 >= graph.num_nodes() {
                return Err(RouteError::ValidityViolation(format!(
                    "'{}' operand {q} names no device site",
                    inst.name()
                )));
            }
        }
        if !inst.is_two_qubit_gate() {
            continue;
        }
        let (a, b) = (inst.qubits[0].0, inst.qubits[1].0);
        if !graph.contains_edge(a, b) {
            return Err(RouteError::ValidityViolation(format!(
                "'{}' acts on non-adjacent sites {a} and {b}",
                inst.name()
            )));
        }
        if is_swap(inst) {
            permuted.swap_physical(a, b);
        }
    }
    if permuted != outcome.final_map {
        return Err(RouteError::ValidityViolation(
            "replayed swaps do not reproduce the final map".into(),
        ));
    }
    Ok(())
}

fn is_swap(inst: &Instruction) -> bool {
    matches!(inst.as_gate(), Some(StandardGate::Swap))
}

/// Fold a wire exchange into the elision substitution.
fn compose_swap(elisions: &mut FxHashMap<QubitId, QubitId>, a: QubitId, b: QubitId) {
    elisions.entry(a).or_insert(a);
    elisions.entry(b).or_insert(b);
    for target in elisions.values_mut() {
        if *target == a {
            *target = b;
        } else if *target == b {
            *target = a;
        }
    }
}

/// Allocate a site for a qubit the placement left out: the free site
/// nearest the hint, or the lowest free site without one.
fn allocate(
    graph: &ConnectivityGraph,
    tracker: &mut PermutationTracker,
    required: usize,
    qubit: QubitId,
    hint: Option<u32>,
) -> RouteResult<u32> {
    let free = graph.nodes().filter(|p| tracker.occupant(*p).is_none());
    let site = match hint {
        Some(h) => free.min_by_key(|&s| (graph.distance(h, s).unwrap_or(u32::MAX), s)),
        None => free.min(),
    };
    let Some(site) = site else {
        return Err(RouteError::UnplaceableCircuit {
            required,
            available: graph.num_nodes(),
        });
    };
    tracker.assign(qubit, site)?;
    debug!(%qubit, site, "qubit allocated");
    Ok(site)
}

fn site(tracker: &PermutationTracker, qubit: QubitId) -> RouteResult<u32> {
    tracker
        .site_of(qubit)
        .ok_or_else(|| RouteError::TrackerDiverged(format!("qubit {qubit} lost its site")))
}

/// Clone an instruction with its qubit operands relabelled to their
/// current sites.
fn sited(tracker: &PermutationTracker, inst: &Instruction) -> RouteResult<Instruction> {
    let mut out = inst.clone();
    for q in &mut out.qubits {
        *q = QubitId(site(tracker, *q)?);
    }
    Ok(out)
}
