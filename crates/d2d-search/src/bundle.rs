//! Itinerary bundle: the user-visible result of one search.
//!
//! A bundle copies scalar fields out of the graph snapshot — none of its
//! legs reference graph arenas, so it safely outlives the snapshot that
//! produced it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use d2d_core::geo::GeoPoint;
use d2d_core::mode::{SearchStatus, TravelMode};
use d2d_core::time::format_stamp;
use d2d_graph::TimedGraph;
use d2d_store::BundleRow;

use crate::engine::{ItineraryPath, SearchOutcome};

// ── Legs ─────────────────────────────────────────────────────────────────────

/// One traveled leg, flattened to scalars.
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryLeg {
    pub edge_id: i64,
    pub offer_id: i64,
    pub from_node_id: i64,
    pub to_node_id: i64,
    pub from_pos: GeoPoint,
    pub to_pos: GeoPoint,
    pub mode: TravelMode,
    pub is_transfer: bool,
    /// ISO-8601 UTC, `YYYY-MM-DDTHH:MM:SSZ`.
    pub departure_utc: String,
    pub arrival_utc: String,
    pub duration_min: i64,
    pub price: f64,
}

// ── Bundle ───────────────────────────────────────────────────────────────────

/// The search result returned to callers (and persisted via
/// [`BundleRow`]).
#[derive(Debug, Clone)]
pub struct ItineraryBundle {
    pub origin_node_id: Option<i64>,
    pub dest_node_id: Option<i64>,
    pub origin_spec_raw: String,
    pub dest_spec_raw: String,
    pub legs: Vec<ItineraryLeg>,
    pub price_total: f64,
    pub duration_min: i64,
    pub num_transfers: u32,
    /// Mode carrying the most traveled minutes, if any leg was traveled.
    pub main_mode: Option<TravelMode>,
    pub time_value_per_hour: f64,
    pub transfer_penalty: f64,
    pub risk_penalty: f64,
    pub generalized_cost: Option<f64>,
    pub status: SearchStatus,
    pub search_params_json: String,
    pub started_at_utc: DateTime<Utc>,
    pub finished_at_utc: DateTime<Utc>,
}

impl ItineraryBundle {
    /// Flatten for persistence.
    pub fn to_row(&self) -> BundleRow {
        BundleRow {
            origin_node_id: self.origin_node_id,
            dest_node_id: self.dest_node_id,
            origin_spec_raw: self.origin_spec_raw.clone(),
            dest_spec_raw: self.dest_spec_raw.clone(),
            legs_json: serde_json::to_string(&self.legs).unwrap_or_else(|_| "[]".to_owned()),
            price_total: self.price_total,
            duration_min: self.duration_min,
            num_transfers: i64::from(self.num_transfers),
            main_mode: self.main_mode.map(|m| m.as_str().to_owned()),
            generalized_cost: self.generalized_cost,
            search_status: self.status.as_str().to_owned(),
            search_params_json: self.search_params_json.clone(),
            started_at_utc: format_stamp(self.started_at_utc),
            finished_at_utc: format_stamp(self.finished_at_utc),
        }
    }
}

// ── Assembly from a search outcome ───────────────────────────────────────────

/// Scoring inputs and raw specs carried alongside the outcome.
pub(crate) struct BundleContext {
    pub origin_spec_raw: String,
    pub dest_spec_raw: String,
    pub time_value_per_hour: f64,
    pub transfer_penalty: f64,
    pub risk_penalty: f64,
    pub search_params_json: String,
    pub started_at_utc: DateTime<Utc>,
    pub finished_at_utc: DateTime<Utc>,
}

/// Copy the best path (if any) out of the graph into a bundle.
pub(crate) fn build_bundle(
    graph: &TimedGraph,
    outcome: &SearchOutcome,
    ctx: BundleContext,
) -> ItineraryBundle {
    let legs: Vec<ItineraryLeg> = outcome
        .best
        .as_ref()
        .map(|path| legs_of(graph, path))
        .unwrap_or_default();

    let price_total = legs.iter().map(|l| l.price).sum();
    let duration_min = legs.iter().map(|l| l.duration_min).sum();
    let main_mode = dominant_mode(&legs);

    let (origin_node_id, dest_node_id) = match (&outcome.best, legs.first(), legs.last()) {
        (Some(path), Some(first), Some(last)) => {
            debug_assert_eq!(last.to_node_id, graph.node(path.end_node).id);
            (Some(first.from_node_id), Some(last.to_node_id))
        }
        // Zero-leg success: the origin itself satisfied the predicate.
        (Some(path), None, None) => {
            let id = graph.node(path.end_node).id;
            (Some(id), Some(id))
        }
        _ => (None, None),
    };

    ItineraryBundle {
        origin_node_id,
        dest_node_id,
        origin_spec_raw: ctx.origin_spec_raw,
        dest_spec_raw: ctx.dest_spec_raw,
        legs,
        price_total,
        duration_min,
        num_transfers: outcome.best.as_ref().map(|p| p.transfers).unwrap_or(0),
        main_mode,
        time_value_per_hour: ctx.time_value_per_hour,
        transfer_penalty: ctx.transfer_penalty,
        risk_penalty: ctx.risk_penalty,
        generalized_cost: outcome.best.as_ref().map(|p| p.gen_cost),
        status: outcome.status,
        search_params_json: ctx.search_params_json,
        started_at_utc: ctx.started_at_utc,
        finished_at_utc: ctx.finished_at_utc,
    }
}

fn legs_of(graph: &TimedGraph, path: &ItineraryPath) -> Vec<ItineraryLeg> {
    path.arcs
        .iter()
        .map(|&arc_idx| {
            let arc = graph.arc(arc_idx);
            ItineraryLeg {
                edge_id: arc.edge.id,
                offer_id: arc.offer.id,
                from_node_id: graph.node(arc.from).id,
                to_node_id: graph.node(arc.to).id,
                from_pos: graph.node(arc.from).pos,
                to_pos: graph.node(arc.to).pos,
                mode: arc.edge.mode,
                is_transfer: arc.edge.is_transfer,
                departure_utc: format_stamp(arc.offer.departure_utc),
                arrival_utc: format_stamp(arc.offer.arrival_utc),
                duration_min: arc.offer.duration_min(),
                price: arc.offer.price_or_zero(),
            }
        })
        .collect()
}

/// The mode with the most traveled minutes; first seen wins ties.
fn dominant_mode(legs: &[ItineraryLeg]) -> Option<TravelMode> {
    let mut minutes_by_mode: Vec<(TravelMode, i64)> = Vec::new();
    for leg in legs {
        match minutes_by_mode.iter_mut().find(|(m, _)| *m == leg.mode) {
            Some((_, minutes)) => *minutes += leg.duration_min,
            None => minutes_by_mode.push((leg.mode, leg.duration_min)),
        }
    }
    let mut winner: Option<(TravelMode, i64)> = None;
    for (mode, minutes) in minutes_by_mode {
        if winner.map_or(true, |(_, best)| minutes > best) {
            winner = Some((mode, minutes));
        }
    }
    winner.map(|(mode, _)| mode)
}
