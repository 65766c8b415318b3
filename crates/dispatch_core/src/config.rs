//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Default snapping threshold in kilometres.
const DEFAULT_SNAP_MAX_KM: f64 = 100.0;

/// Which edge cost source backs path computation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub enum CostSourceKind {
    /// Base graph weights only.
    #[default]
    Static,
    /// Base weights blended with the live traffic signal, when one is
    /// installed on the dispatcher.
    TrafficAugmented,
}

/// Tunables for one dispatcher instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Max distance between a free coordinate and a graph node for snapping.
    pub snap_max_km: f64,
    pub cost_source: CostSourceKind,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            snap_max_km: DEFAULT_SNAP_MAX_KM,
            cost_source: CostSourceKind::default(),
        }
    }
}

impl DispatchConfig {
    pub fn with_snap_max_km(mut self, snap_max_km: f64) -> Self {
        self.snap_max_km = snap_max_km;
        self
    }

    pub fn with_cost_source(mut self, cost_source: CostSourceKind) -> Self {
        self.cost_source = cost_source;
        self
    }
}
