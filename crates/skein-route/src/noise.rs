//! Device characterisation record.
//!
//! Producing this data is out of scope for the engine; it is consumed
//! read-only by [`NoiseAwarePlacement`](crate::placement::NoiseAwarePlacement)
//! as a tie-break between structurally equivalent placements.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{RouteError, RouteResult};

/// Per-device error rates: two-qubit gate error per coupling edge and
/// readout error per physical qubit.
///
/// Lookups on undirected edges are symmetric. Missing entries fall
/// back to zero, so a partial record biases only where it has data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoiseProfile {
    /// Two-qubit gate error probability per edge.
    ///
    /// Serialized as a list of `(a, b, rate)` triples; tuple map keys
    /// do not survive JSON.
    #[serde(with = "edge_rates")]
    two_qubit_error: FxHashMap<(u32, u32), f64>,
    /// Readout error probability per physical qubit.
    readout_error: FxHashMap<u32, f64>,
}

mod edge_rates {
    use rustc_hash::FxHashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &FxHashMap<(u32, u32), f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut triples: Vec<(u32, u32, f64)> =
            map.iter().map(|(&(a, b), &rate)| (a, b, rate)).collect();
        triples.sort_by_key(|&(a, b, _)| (a, b));
        triples.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FxHashMap<(u32, u32), f64>, D::Error> {
        let triples = Vec::<(u32, u32, f64)>::deserialize(deserializer)?;
        Ok(triples.into_iter().map(|(a, b, r)| ((a, b), r)).collect())
    }
}

impl NoiseProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the two-qubit gate error rate for an edge.
    pub fn set_edge_error(&mut self, a: u32, b: u32, rate: f64) -> RouteResult<()> {
        validate_probability(rate)?;
        self.two_qubit_error.insert(ordered(a, b), rate);
        Ok(())
    }

    /// Record the readout error rate for a physical qubit.
    pub fn set_readout_error(&mut self, node: u32, rate: f64) -> RouteResult<()> {
        validate_probability(rate)?;
        self.readout_error.insert(node, rate);
        Ok(())
    }

    /// Two-qubit gate error rate for an edge (either orientation).
    pub fn edge_error(&self, a: u32, b: u32) -> f64 {
        self.two_qubit_error
            .get(&ordered(a, b))
            .copied()
            .unwrap_or(0.0)
    }

    /// Readout error rate for a physical qubit.
    pub fn readout(&self, node: u32) -> f64 {
        self.readout_error.get(&node).copied().unwrap_or(0.0)
    }

    /// Check if the profile has no data at all.
    pub fn is_empty(&self) -> bool {
        self.two_qubit_error.is_empty() && self.readout_error.is_empty()
    }
}

#[inline]
fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}

fn validate_probability(rate: f64) -> RouteResult<()> {
    if !(0.0..=1.0).contains(&rate) || rate.is_nan() {
        return Err(RouteError::InvalidErrorRate(rate));
    }
    Ok(())
}
