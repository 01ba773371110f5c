//! Structural edges and the timed offers that make them searchable.
//!
//! An [`EdgeLeg`] is the route shape (from, to, mode, nominal duration)
//! independent of any departure.  An [`Offer`] is one priced, timed instance
//! of traversing it.  The pair forms a searchable arc; the graph assembler
//! does the joining.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::mode::{EdgeStructure, OfferSource, TravelMode};
use crate::time::minutes_between;

// ── EdgeLeg ──────────────────────────────────────────────────────────────────

/// A directed structural leg between two location nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLeg {
    pub id: i64,
    pub from_node: i64,
    pub to_node: i64,
    pub mode: TravelMode,
    /// First/last-mile or inter-mode connection leg; carries the transfer
    /// penalty in the objective.
    pub is_transfer: bool,
    pub carrier_code: Option<String>,
    pub service_code: Option<String>,
    pub distance_km: Option<f64>,
    /// Nominal traversal time in minutes.
    pub duration_min: u32,
    /// Per-edge override of the node-level minimum connect time.
    pub mct_override_min: Option<u32>,
    /// Endpoints close enough to count as the same place (< 0.3 km).
    pub co_located: bool,
    pub structure: EdgeStructure,
}

impl EdgeLeg {
    pub fn validate(&self) -> CoreResult<()> {
        if self.from_node == self.to_node {
            return Err(CoreError::invariant(
                "edge_leg",
                format!("from and to are both node {}", self.from_node),
            ));
        }
        Ok(())
    }
}

// ── Offer ────────────────────────────────────────────────────────────────────

/// A priced, timed instance of traversing an [`EdgeLeg`].
///
/// Offers are short-lived and owned by their edge (cascade on edge
/// deletion).  Static offers (`is_static`) are usable at any departure
/// time — their timestamps are anchor placeholders, and the search binds
/// their effective departure to the frontier arrival at the boarding node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub edge_id: i64,
    pub departure_utc: DateTime<Utc>,
    pub arrival_utc: DateTime<Utc>,
    /// Cash price; `None` prices as zero in the objective.
    pub price_total: Option<f64>,
    pub currency: String,
    pub source: OfferSource,
    pub provider: String,
    pub provider_ref: Option<String>,
    pub cache_ref: Option<String>,
    pub is_static: bool,
    pub retrieved_at_utc: DateTime<Utc>,
    pub validity_window_hrs: i64,
    pub effective_from_utc: Option<DateTime<Utc>>,
    pub last_verified_utc: Option<DateTime<Utc>>,
    pub ttl_hrs: i64,
    pub is_active: bool,
    pub reliability: Option<f64>,
    pub meta_json: Option<serde_json::Value>,
}

impl Offer {
    pub fn validate(&self) -> CoreResult<()> {
        if self.arrival_utc <= self.departure_utc {
            return Err(CoreError::invariant(
                "offer",
                format!(
                    "arrival {} not after departure {}",
                    self.arrival_utc, self.departure_utc
                ),
            ));
        }
        if let Some(price) = self.price_total {
            if !(price >= 0.0) {
                return Err(CoreError::invariant(
                    "offer",
                    format!("price_total {price} must be non-negative"),
                ));
            }
        }
        Ok(())
    }

    /// Traversal time in whole minutes (always positive for a valid offer).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        minutes_between(self.departure_utc, self.arrival_utc)
    }

    /// Cash price with `None` treated as zero.
    #[inline]
    pub fn price_or_zero(&self) -> f64 {
        self.price_total.unwrap_or(0.0)
    }

    /// `true` when the offer boards at the frontier arrival time rather
    /// than at its own `departure_utc`: static offers and synthesized
    /// model estimates.  Scheduled offers keep their absolute timestamps.
    #[inline]
    pub fn boards_on_arrival(&self) -> bool {
        self.is_static || self.source == OfferSource::EstimatedModel
    }
}
