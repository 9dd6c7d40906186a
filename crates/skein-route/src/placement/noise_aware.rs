//! Noise-aware subgraph placement.

use skein_ir::CircuitDag;

use crate::connectivity::ConnectivityGraph;
use crate::error::RouteResult;
use crate::interaction::{InteractionBounds, InteractionGraph};
use crate::noise::NoiseProfile;
use crate::placement::graph::{GraphPlacementConfig, search_common_subgraph};
use crate::placement::{Placement, PlacementMap, check_capacity};

/// [`GraphPlacement`](crate::placement::GraphPlacement) with a device
/// noise profile as tie-break.
///
/// The structural score always dominates: the noise profile only
/// decides between placements whose scores are within the configured
/// tie tolerance, steering ties away from error-prone edges and
/// poorly-reading qubits.
#[derive(Debug, Clone)]
pub struct NoiseAwarePlacement {
    config: GraphPlacementConfig,
    profile: NoiseProfile,
}

impl NoiseAwarePlacement {
    /// Create the strategy around a device noise profile.
    pub fn new(profile: NoiseProfile) -> Self {
        Self {
            config: GraphPlacementConfig::default(),
            profile,
        }
    }

    /// Create the strategy with an explicit configuration.
    pub fn with_config(profile: NoiseProfile, config: GraphPlacementConfig) -> Self {
        Self { config, profile }
    }

    /// Adjust the configuration in place.
    pub fn modify_config(&mut self, f: impl FnOnce(&mut GraphPlacementConfig)) {
        f(&mut self.config);
    }
}

impl Placement for NoiseAwarePlacement {
    fn name(&self) -> &str {
        "noise-aware"
    }

    fn place(&self, dag: &CircuitDag, graph: &ConnectivityGraph) -> RouteResult<PlacementMap> {
        check_capacity(dag, graph)?;
        let interactions = InteractionGraph::extract(
            dag,
            InteractionBounds::layers(self.config.lookahead_layers),
            self.config.decay,
        );
        search_common_subgraph(&interactions, graph, &self.config, Some(&self.profile))
    }
}
