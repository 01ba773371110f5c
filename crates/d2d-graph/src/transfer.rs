//! First/last-mile transfer synthesis.
//!
//! Produces `(EdgeLeg, Offer)` pairs between proximate nodes from
//! deterministic cost/time models.  Synthesized records carry per-search
//! negative ids and are never persisted; a pair that cannot be priced
//! (non-finite coordinates) simply does not exist.
//!
//! | Mode      | Speed    | Price                                 | Offer      |
//! |-----------|----------|---------------------------------------|------------|
//! | Walk      | 5 km/h   | free                                  | static     |
//! | Rideshare | 35 km/h  | `(base + per_km·d + per_min·t)·surge` | 1 h TTL    |
//! | Shuttle   | 25 km/h  | flat                                  | static 24h |

use chrono::{DateTime, Duration, Utc};

use d2d_core::ids::SyntheticIds;
use d2d_core::mode::{EdgeStructure, OfferSource, TravelMode};
use d2d_core::{EdgeLeg, LocationNode, Offer};

// ── Configuration ────────────────────────────────────────────────────────────

/// Deterministic rideshare fare model.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RideshareModel {
    pub base_fare: f64,
    pub per_km: f64,
    pub per_min: f64,
    pub avg_speed_kmh: f64,
    pub surge_coeff: f64,
}

impl Default for RideshareModel {
    fn default() -> Self {
        Self {
            base_fare: 3.00,
            per_km: 1.25,
            per_min: 0.25,
            avg_speed_kmh: 35.0,
            surge_coeff: 1.0,
        }
    }
}

/// Transfer synthesis and injection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferConfig {
    /// Maximum node separation for injecting transfers (adjacency fan-out cap).
    pub radius_km: f64,
    pub shuttle_price: f64,
    pub rideshare: RideshareModel,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            radius_km: 3.0,
            shuttle_price: 12.0,
            rideshare: RideshareModel::default(),
        }
    }
}

/// Nodes closer than this count as the same place.
pub const CO_LOCATED_KM: f64 = 0.3;

/// Validity window standing in for "never expires" on walk transfers.
pub const UNBOUNDED_VALIDITY_HRS: i64 = 1_000_000;

// ── Synthesis ────────────────────────────────────────────────────────────────

/// Synthesize one transfer of `mode` from `a` to `b`, or `None` when the
/// pair cannot be priced or `mode` is not a transfer mode.
///
/// The offer's timestamps anchor at `now`; the search binds the effective
/// departure to the frontier arrival at the boarding node.
pub fn synthesize(
    a: &LocationNode,
    b: &LocationNode,
    mode: TravelMode,
    now: DateTime<Utc>,
    cfg: &TransferConfig,
    ids: &mut SyntheticIds,
) -> Option<(EdgeLeg, Offer)> {
    let distance_km = a.pos.haversine_km(b.pos);
    if !distance_km.is_finite() {
        return None;
    }

    let (duration_min, price, source, is_static, validity_hrs, ttl_hrs) = match mode {
        TravelMode::Walk => (
            (distance_km / 5.0 * 60.0).round().max(3.0) as u32,
            0.0,
            OfferSource::ManualStatic,
            true,
            UNBOUNDED_VALIDITY_HRS,
            UNBOUNDED_VALIDITY_HRS,
        ),
        TravelMode::Rideshare => {
            let m = &cfg.rideshare;
            let minutes = (distance_km / m.avg_speed_kmh * 60.0).round().max(5.0);
            let fare = (m.base_fare + m.per_km * distance_km + m.per_min * minutes)
                * m.surge_coeff;
            (
                minutes as u32,
                round_cents(fare),
                OfferSource::EstimatedModel,
                false,
                1,
                1,
            )
        }
        TravelMode::Shuttle => (
            (distance_km / 25.0 * 60.0).round() as u32,
            cfg.shuttle_price,
            OfferSource::ManualStatic,
            true,
            24,
            24,
        ),
        _ => return None,
    };

    let edge = EdgeLeg {
        id: ids.next_id(),
        from_node: a.id,
        to_node: b.id,
        mode,
        is_transfer: true,
        carrier_code: None,
        service_code: None,
        distance_km: Some(distance_km),
        duration_min,
        mct_override_min: None,
        co_located: mode == TravelMode::Walk && distance_km < CO_LOCATED_KM,
        structure: EdgeStructure::DynamicTemplate,
    };

    let offer = Offer {
        id: ids.next_id(),
        edge_id: edge.id,
        departure_utc: now,
        arrival_utc: now + Duration::minutes(i64::from(duration_min.max(1))),
        price_total: Some(price),
        currency: "USD".to_owned(),
        source,
        provider: "synthesized".to_owned(),
        provider_ref: None,
        cache_ref: None,
        is_static,
        retrieved_at_utc: now,
        validity_window_hrs: validity_hrs,
        effective_from_utc: None,
        last_verified_utc: None,
        ttl_hrs,
        is_active: true,
        reliability: None,
        meta_json: None,
    };

    Some((edge, offer))
}

/// Round a fare to whole cents.
#[inline]
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
