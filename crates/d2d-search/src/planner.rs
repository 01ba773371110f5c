//! End-to-end planning: normalize → assemble → search → bundle.
//!
//! The pipeline is strictly phased, each phase handing immutable data to
//! the next:
//!
//! 1. **Normalize** both endpoint strings (fatal `PlaceError` short-circuits
//!    before any graph load).
//! 2. **Assemble** the timed graph from the store plus any synthetic
//!    address nodes (fatal `StoreError` aborts the search).
//! 3. **Search** — single-threaded branch-and-bound; the only blocking
//!    operations of a plan are the store reads in phases 1–2.
//! 4. **Bundle** the outcome with scalar copies and the effective
//!    parameters (including area-ambiguity annotations).

use chrono::{DateTime, Utc};
use serde_json::json;

use d2d_core::NodeIdx;
use d2d_core::ids::SyntheticIds;
use d2d_places::{Geocoder, Normalizer, PlaceSpec, Resolution};
use d2d_store::Store;

use crate::bundle::{BundleContext, ItineraryBundle, build_bundle};
use crate::engine::search;
use crate::error::SearchResult;
use crate::params::SearchParams;

/// Ties a store and a geocoder together for repeated planning calls.
pub struct Planner<'a, G: Geocoder> {
    store: &'a Store,
    geocoder: &'a G,
}

impl<'a, G: Geocoder> Planner<'a, G> {
    pub fn new(store: &'a Store, geocoder: &'a G) -> Self {
        Self { store, geocoder }
    }

    /// Plan one itinerary departing now.
    pub fn plan(
        &self,
        origin_raw: &str,
        dest_raw: &str,
        params: &SearchParams,
    ) -> SearchResult<ItineraryBundle> {
        self.plan_at(origin_raw, dest_raw, params, Utc::now())
    }

    /// Plan with an explicit departure instant.  Re-running with the same
    /// store contents, parameters, and `now` yields an identical bundle
    /// (modulo the started/finished wall stamps).
    pub fn plan_at(
        &self,
        origin_raw: &str,
        dest_raw: &str,
        params: &SearchParams,
        now: DateTime<Utc>,
    ) -> SearchResult<ItineraryBundle> {
        let started_at = Utc::now();
        let mut ids = SyntheticIds::new();

        // ── Normalize ─────────────────────────────────────────────────────
        let normalizer = Normalizer::new(self.store, self.geocoder);
        let origin = normalizer.resolve(origin_raw, &mut ids)?;
        let dest = normalizer.resolve(dest_raw, &mut ids)?;

        // ── Assemble ──────────────────────────────────────────────────────
        let mut extra_nodes = Vec::new();
        for resolution in [&origin, &dest] {
            if matches!(resolution.spec, PlaceSpec::Address { .. }) {
                extra_nodes.extend(resolution.nodes.iter().cloned());
            }
        }
        let graph = d2d_graph::assemble(
            self.store,
            &extra_nodes,
            &params.transfer_config(),
            now,
            &mut ids,
        )?;

        // ── Search ────────────────────────────────────────────────────────
        let origins: Vec<NodeIdx> = origin
            .nodes
            .iter()
            .filter_map(|n| graph.node_idx(n.id))
            .collect();
        let matcher = dest.matcher();
        let outcome = search(&graph, &origins, &matcher, params, now);
        log::info!(
            "plan `{origin_raw}` → `{dest_raw}`: {} after {} expansions",
            outcome.status,
            outcome.expansions
        );

        // ── Bundle ────────────────────────────────────────────────────────
        let ctx = BundleContext {
            origin_spec_raw: origin_raw.to_owned(),
            dest_spec_raw: dest_raw.to_owned(),
            time_value_per_hour: params.time_value_per_hour,
            transfer_penalty: params.transfer_penalty,
            risk_penalty: params.risk_penalty,
            search_params_json: params_json(params, &origin, &dest, now),
            started_at_utc: started_at,
            finished_at_utc: Utc::now(),
        };
        Ok(build_bundle(&graph, &outcome, ctx))
    }

    /// Like [`plan_at`](Self::plan_at), also persisting the bundle.
    /// Returns the bundle and its row id.
    pub fn plan_persisted(
        &self,
        origin_raw: &str,
        dest_raw: &str,
        params: &SearchParams,
        now: DateTime<Utc>,
    ) -> SearchResult<(ItineraryBundle, i64)> {
        let bundle = self.plan_at(origin_raw, dest_raw, params, now)?;
        let row_id = self.store.put_bundle(&bundle.to_row())?;
        Ok((bundle, row_id))
    }
}

/// The effective parameters plus how each endpoint resolved — including
/// the tie-break surfacing for ambiguous area lookups.
fn params_json(
    params: &SearchParams,
    origin: &Resolution,
    dest: &Resolution,
    now: DateTime<Utc>,
) -> String {
    let endpoint = |r: &Resolution| {
        json!({
            "raw": r.raw,
            "resolved_as": r.spec.tag(),
            "candidate_nodes": r.nodes.len(),
            "ambiguous": r.is_ambiguous(),
            "area_candidates": r.candidates.iter().map(|a| a.id).collect::<Vec<_>>(),
        })
    };
    json!({
        "params": params,
        "departure_utc": d2d_core::time::format_stamp(now),
        "origin": endpoint(origin),
        "dest": endpoint(dest),
    })
    .to_string()
}
