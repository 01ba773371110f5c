//! Generalized-cost evaluation, the admissible lower bound, and pruning.
//!
//! The evaluator computes a candidate leg's cost **once**; the engine then
//! applies the prune predicates and the dominance check, in that order, on
//! the already-computed numbers.

use d2d_core::geo::GeoPoint;
use d2d_graph::TimedArc;

use crate::params::SearchParams;

/// Speed assumed by the lower bound, km/h.  Valid globally while flight is
/// the fastest mode in scope; tighten per-corridor before adding anything
/// faster.
pub const LB_SPEED_KMH: f64 = 700.0;

/// Result of evaluating one candidate leg on top of a partial path.
#[derive(Debug, Clone, Copy)]
pub struct LegCost {
    pub gen_cost: f64,
    pub transfers: u32,
    pub duration_min: i64,
}

/// The scoring side of a search: objective weights and prune thresholds.
#[derive(Debug, Clone)]
pub struct CostModel {
    pub time_value_per_hour: f64,
    pub transfer_penalty: f64,
    pub risk_penalty: f64,
    pub max_detour_factor: f64,
}

impl CostModel {
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            time_value_per_hour: params.time_value_per_hour,
            transfer_penalty: params.transfer_penalty,
            risk_penalty: params.risk_penalty,
            max_detour_factor: params.max_detour_factor,
        }
    }

    /// Cost of extending a partial path by `arc`.
    ///
    /// `gen_cost` is monotonically non-decreasing along any path as long as
    /// prices, durations, and penalties are non-negative — which record
    /// validation guarantees.
    pub fn leg_cost(&self, gen_cost_so_far: f64, transfers_so_far: u32, arc: &TimedArc) -> LegCost {
        let duration_min = arc.offer.duration_min();
        let cash = arc.offer.price_or_zero();
        let transfer_cost = if arc.edge.is_transfer {
            self.transfer_penalty
        } else {
            0.0
        };

        LegCost {
            gen_cost: gen_cost_so_far
                + cash
                + self.time_value_per_hour * (duration_min as f64 / 60.0)
                + transfer_cost
                + self.risk_penalty,
            transfers: transfers_so_far + u32::from(arc.edge.is_transfer),
            duration_min,
        }
    }

    /// Admissible estimate of the remaining cost from `from` to the nearest
    /// destination candidate: time value over the straight line at
    /// [`LB_SPEED_KMH`].  Zero when there are no destination coordinates.
    pub fn lower_bound(&self, from: GeoPoint, dests: &[GeoPoint]) -> f64 {
        let nearest = dests
            .iter()
            .map(|d| from.approx_km(*d))
            .fold(f64::INFINITY, f64::min);
        if nearest.is_finite() {
            self.time_value_per_hour * nearest / LB_SPEED_KMH
        } else {
            0.0
        }
    }

    /// The prune predicate: any of
    ///
    /// 1. the successor already costs at least the incumbent;
    /// 2. successor + lower bound cannot beat the incumbent;
    /// 3. the traversed distance exceeds the detour cap.
    pub fn should_prune(
        &self,
        new_gen_cost: f64,
        lb_from_next: f64,
        best_cost: Option<f64>,
        dist_so_far_km: f64,
        direct_km: f64,
    ) -> bool {
        if let Some(best) = best_cost {
            if new_gen_cost >= best {
                return true;
            }
            if new_gen_cost + lb_from_next >= best {
                return true;
            }
        }
        dist_so_far_km > self.max_detour_factor * direct_km
    }
}
