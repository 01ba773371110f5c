//! Search request parameters.

use serde::{Deserialize, Serialize};

use d2d_graph::{RideshareModel, TransferConfig};

/// Tunable parameters of one search request.
///
/// `Default` carries the engine defaults; `#[serde(default)]` lets request
/// payloads override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Expansion budget: states popped before giving up.
    pub max_expansions: u64,
    /// Wall-clock budget in milliseconds.
    pub timeout_ms: u64,
    /// Value of travel time, currency units per hour.
    pub time_value_per_hour: f64,
    /// Flat penalty per transfer leg, currency units.
    pub transfer_penalty: f64,
    /// Prune paths whose traversed distance exceeds this multiple of the
    /// origin→destination straight line.
    pub max_detour_factor: f64,
    /// Flat per-leg risk penalty, currency units.
    pub risk_penalty: f64,
    /// Maximum node separation for synthesized transfers, km.
    pub transfer_radius_km: f64,
    /// Overrides of the rideshare fare model.
    pub rideshare: RideshareModel,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_expansions: 100_000,
            timeout_ms: 5_000,
            time_value_per_hour: 20.0,
            transfer_penalty: 6.0,
            max_detour_factor: 2.2,
            risk_penalty: 0.0,
            transfer_radius_km: 3.0,
            rideshare: RideshareModel::default(),
        }
    }
}

impl SearchParams {
    /// Transfer synthesis configuration for the graph assembler.
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig {
            radius_km: self.transfer_radius_km,
            rideshare: self.rideshare.clone(),
            ..TransferConfig::default()
        }
    }
}
