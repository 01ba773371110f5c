//! Unit tests for d2d-search.
//!
//! Engine tests run over hand-built graphs (no store); the planner tests
//! drive the full pipeline against an in-memory store.

#[cfg(test)]
mod helpers {
    use chrono::{DateTime, Utc};

    use d2d_core::geo::GeoPoint;
    use d2d_core::mode::{EdgeStructure, NodeKind, OfferSource, TravelMode};
    use d2d_core::time::parse_stamp;
    use d2d_core::{EdgeLeg, LocationNode, Offer};
    use d2d_graph::{TimedGraph, TimedGraphBuilder};

    pub fn stamp(s: &str) -> DateTime<Utc> {
        parse_stamp(s).unwrap()
    }

    /// Search departure instant used across the engine tests.
    pub fn now() -> DateTime<Utc> {
        stamp("2025-11-15T07:00:00Z")
    }

    pub fn node_at(id: i64, lat: f64, lon: f64) -> LocationNode {
        LocationNode {
            id,
            external_ref: None,
            name: format!("node {id}"),
            kind: NodeKind::Station,
            area_id: None,
            pos: GeoPoint::new(lat, lon),
            is_hub: false,
            mct_air_ground_min: 0,
            mct_ground_air_min: 0,
            mct_any_min: 0,
            country: None,
            timezone: None,
        }
    }

    pub fn edge(
        id: i64,
        from: i64,
        to: i64,
        mode: TravelMode,
        duration_min: u32,
        is_transfer: bool,
    ) -> EdgeLeg {
        EdgeLeg {
            id,
            from_node: from,
            to_node: to,
            mode,
            is_transfer,
            carrier_code: None,
            service_code: None,
            distance_km: None,
            duration_min,
            mct_override_min: None,
            co_located: false,
            structure: EdgeStructure::Static,
        }
    }

    pub fn offer(id: i64, edge_id: i64, dep: &str, arr: &str, price: f64) -> Offer {
        Offer {
            id,
            edge_id,
            departure_utc: stamp(dep),
            arrival_utc: stamp(arr),
            price_total: Some(price),
            currency: "USD".to_owned(),
            source: OfferSource::ManualStatic,
            provider: "seed".to_owned(),
            provider_ref: None,
            cache_ref: None,
            is_static: false,
            retrieved_at_utc: stamp("2025-11-01T00:00:00Z"),
            validity_window_hrs: 720,
            effective_from_utc: None,
            last_verified_utc: None,
            ttl_hrs: 6,
            is_active: true,
            reliability: None,
            meta_json: None,
        }
    }

    /// A/B 1° of longitude apart with the given arcs.
    pub fn two_node_graph(arcs: Vec<(EdgeLeg, Offer)>) -> TimedGraph {
        let mut b = TimedGraphBuilder::new();
        b.add_node(node_at(1, 0.0, 0.0));
        b.add_node(node_at(2, 0.0, 1.0));
        for (edge, offer) in arcs {
            assert!(b.add_arc(edge, offer));
        }
        b.build()
    }
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cost {
    use d2d_core::geo::GeoPoint;
    use d2d_graph::TimedArc;
    use d2d_core::NodeIdx;

    use super::helpers::*;
    use crate::cost::{CostModel, LB_SPEED_KMH};
    use crate::params::SearchParams;
    use d2d_core::mode::TravelMode;

    fn model() -> CostModel {
        CostModel::from_params(&SearchParams::default())
    }

    fn arc(price: f64, minutes: i64, is_transfer: bool) -> TimedArc {
        let dep = "2025-11-15T08:00:00Z";
        let arr = stamp(dep) + chrono::Duration::minutes(minutes);
        let mut o = offer(1, 1, dep, "2025-11-15T08:01:00Z", price);
        o.arrival_utc = arr;
        TimedArc {
            from: NodeIdx(0),
            to: NodeIdx(1),
            edge: edge(1, 1, 2, TravelMode::Flight, minutes as u32, is_transfer),
            offer: o,
        }
    }

    #[test]
    fn leg_cost_components() {
        let m = model();
        // 75 min flight at $118: 118 + 20·(75/60) = 143.
        let leg = m.leg_cost(0.0, 0, &arc(118.0, 75, false));
        assert!((leg.gen_cost - 143.0).abs() < 1e-9);
        assert_eq!(leg.transfers, 0);
        assert_eq!(leg.duration_min, 75);

        // Transfers add the flat penalty and count.
        let leg = m.leg_cost(100.0, 0, &arc(20.0, 120, true));
        assert!((leg.gen_cost - 166.0).abs() < 1e-9);
        assert_eq!(leg.transfers, 1);
    }

    #[test]
    fn null_price_is_zero() {
        let m = model();
        let mut a = arc(0.0, 60, false);
        a.offer.price_total = None;
        let leg = m.leg_cost(0.0, 0, &a);
        assert!((leg.gen_cost - 20.0).abs() < 1e-9);
    }

    #[test]
    fn risk_penalty_applies_per_leg() {
        let mut params = SearchParams::default();
        params.risk_penalty = 2.5;
        let m = CostModel::from_params(&params);
        let leg = m.leg_cost(0.0, 0, &arc(10.0, 60, false));
        assert!((leg.gen_cost - 32.5).abs() < 1e-9);
    }

    #[test]
    fn lower_bound_uses_nearest_destination() {
        let m = model();
        let from = GeoPoint::new(0.0, 0.0);
        let near = GeoPoint::new(0.0, 1.0); // 111 km
        let far = GeoPoint::new(0.0, 5.0);
        let lb = m.lower_bound(from, &[far, near]);
        assert!((lb - 20.0 * 111.0 / LB_SPEED_KMH).abs() < 1e-9);
        // No destinations → no information → zero.
        assert_eq!(m.lower_bound(from, &[]), 0.0);
        // At a destination the bound vanishes.
        assert!(m.lower_bound(near, &[near, far]) < 1e-12);
    }

    #[test]
    fn lower_bound_is_admissible_on_a_solved_instance() {
        // Optimal A→B is the 143.0 direct flight (see the scenario tests);
        // the bound from the origin must sit below it, and so must the
        // bound from every intermediate position on the way.
        let m = model();
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let optimal = 143.0;
        assert!(m.lower_bound(a, &[b]) <= optimal);
        let midway = GeoPoint::new(0.0, 0.5);
        assert!(m.lower_bound(midway, &[b]) <= m.lower_bound(a, &[b]));
    }

    #[test]
    fn prune_predicates() {
        let m = model();
        // 1: at or above the incumbent.
        assert!(m.should_prune(100.0, 0.0, Some(100.0), 0.0, 1000.0));
        // 2: bound lifts it over the incumbent.
        assert!(m.should_prune(90.0, 15.0, Some(100.0), 0.0, 1000.0));
        assert!(!m.should_prune(90.0, 5.0, Some(100.0), 0.0, 1000.0));
        // 3: detour cap, independent of any incumbent.
        assert!(m.should_prune(1.0, 0.0, None, 500.0, 100.0));
        assert!(!m.should_prune(1.0, 0.0, None, 219.0, 100.0));
    }
}

// ── Engine: the literal end-to-end scenarios ──────────────────────────────────

#[cfg(test)]
mod scenarios {
    use d2d_core::mode::{SearchStatus, TravelMode};
    use d2d_graph::TimedGraphBuilder;
    use d2d_places::DestinationMatcher;

    use super::helpers::*;
    use crate::engine::search;
    use crate::params::SearchParams;

    #[test]
    fn direct_flight_only() {
        let graph = two_node_graph(vec![(
            edge(10, 1, 2, TravelMode::Flight, 75, false),
            offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:15:00Z", 118.0),
        )]);
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());

        assert_eq!(outcome.status, SearchStatus::Ok);
        let best = outcome.best.unwrap();
        assert_eq!(best.arcs.len(), 1);
        assert!((best.gen_cost - 143.0).abs() < 1e-9);
        assert_eq!(best.transfers, 0);
        assert_eq!(best.arrival_utc, stamp("2025-11-15T09:15:00Z"));
    }

    #[test]
    fn bus_beats_flight_on_generalized_cost() {
        let graph = two_node_graph(vec![
            (
                edge(10, 1, 2, TravelMode::Flight, 75, false),
                offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:15:00Z", 118.0),
            ),
            (
                edge(11, 1, 2, TravelMode::Bus, 260, false),
                offer(101, 11, "2025-11-15T08:00:00Z", "2025-11-15T12:20:00Z", 25.0),
            ),
        ]);
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());

        assert_eq!(outcome.status, SearchStatus::Ok);
        let best = outcome.best.unwrap();
        // 25 + 20·260/60 = 111.67 beats the flight's 143.
        assert!((best.gen_cost - (25.0 + 20.0 * 260.0 / 60.0)).abs() < 1e-9);
        assert_eq!(best.arcs.len(), 1);
        assert_eq!(graph.arc(best.arcs[0]).edge.mode, TravelMode::Bus);
    }

    #[test]
    fn transfer_penalized_two_leg() {
        let mut b = TimedGraphBuilder::new();
        b.add_node(node_at(1, 0.0, 0.0));
        b.add_node(node_at(3, 0.0, 0.01)); // connection point
        b.add_node(node_at(2, 0.0, 0.02));
        b.add_arc(
            edge(10, 1, 3, TravelMode::Flight, 60, false),
            offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:00:00Z", 80.0),
        );
        b.add_arc(
            edge(11, 3, 2, TravelMode::Bus, 120, true),
            offer(101, 11, "2025-11-15T09:30:00Z", "2025-11-15T11:30:00Z", 20.0),
        );
        let graph = b.build();
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());

        assert_eq!(outcome.status, SearchStatus::Ok);
        let best = outcome.best.unwrap();
        // 80 + 20 + 20·(180/60) + 6 = 166, one transfer counted.
        assert!((best.gen_cost - 166.0).abs() < 1e-9);
        assert_eq!(best.transfers, 1);
        assert_eq!(best.arcs.len(), 2);
    }

    #[test]
    fn detour_branch_never_expands() {
        // Destination ~100 km away; the only route runs through a node
        // ~500 km out, past the 2.2× detour cap — so it must be pruned and
        // the search must come back empty-handed.
        let mut b = TimedGraphBuilder::new();
        b.add_node(node_at(1, 0.0, 0.0));
        b.add_node(node_at(2, 0.9, 0.0)); // ~100 km
        b.add_node(node_at(3, 4.5, 0.0)); // ~500 km
        b.add_arc(
            edge(10, 1, 3, TravelMode::Flight, 60, false),
            offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:00:00Z", 50.0),
        );
        b.add_arc(
            edge(11, 3, 2, TravelMode::Flight, 60, false),
            offer(101, 11, "2025-11-15T10:00:00Z", "2025-11-15T11:00:00Z", 50.0),
        );
        let graph = b.build();
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());

        assert_eq!(outcome.status, SearchStatus::NoFeasibleRoute);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.pruned, 1);
        // Only the origin itself was ever expanded.
        assert_eq!(outcome.expansions, 1);
    }

    #[test]
    fn dominated_state_dropped_before_expansion() {
        // Two offers reach the connection node in the same 5-minute bucket
        // at costs 50 and 60; the 60 path must never generate successors.
        let mut params = SearchParams::default();
        params.time_value_per_hour = 0.0; // costs are pure cash here

        let mut b = TimedGraphBuilder::new();
        b.add_node(node_at(1, 0.0, 0.0));
        b.add_node(node_at(3, 0.0, 0.01));
        b.add_node(node_at(2, 0.0, 0.02));
        b.add_arc(
            edge(10, 1, 3, TravelMode::Train, 30, false),
            offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T08:30:00Z", 50.0),
        );
        b.add_arc(
            edge(10, 1, 3, TravelMode::Train, 30, false),
            offer(101, 10, "2025-11-15T08:02:00Z", "2025-11-15T08:32:00Z", 60.0),
        );
        b.add_arc(
            edge(11, 3, 2, TravelMode::Bus, 30, false),
            offer(102, 11, "2025-11-15T09:00:00Z", "2025-11-15T09:30:00Z", 1.0),
        );
        let graph = b.build();
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &params, now());

        assert_eq!(outcome.status, SearchStatus::Ok);
        assert_eq!(outcome.dominated, 1);
        let best = outcome.best.unwrap();
        assert!((best.gen_cost - 51.0).abs() < 1e-9);
        // Exactly origin, the surviving connection state, and the goal.
        assert_eq!(outcome.expansions, 3);
    }

    #[test]
    fn expansion_budget_exhaustion() {
        // A 12-hop chain needs ~12 expansions to reach the goal; 5 are not
        // enough, and nothing reachable in 5 satisfies the predicate.
        let mut b = TimedGraphBuilder::new();
        for i in 0..12 {
            b.add_node(node_at(i + 1, 0.0, 0.001 * i as f64));
        }
        for i in 0..11 {
            let dep = stamp("2025-11-15T08:00:00Z") + chrono::Duration::hours(i);
            let arr = dep + chrono::Duration::minutes(30);
            let mut o = offer(100 + i, 10 + i, "2025-11-15T08:00:00Z", "2025-11-15T08:30:00Z", 1.0);
            o.departure_utc = dep;
            o.arrival_utc = arr;
            b.add_arc(edge(10 + i, i + 1, i + 2, TravelMode::Bus, 30, false), o);
        }
        let graph = b.build();
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([12]);

        let mut params = SearchParams::default();
        params.max_expansions = 5;
        let outcome = search(&graph, &origins, &matcher, &params, now());

        assert_eq!(outcome.status, SearchStatus::TimeBudgetExhausted);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.expansions, 5);
    }
}

// ── Engine: boundaries and determinism ────────────────────────────────────────

#[cfg(test)]
mod engine_boundaries {
    use d2d_core::mode::{SearchStatus, TravelMode};
    use d2d_graph::TimedGraphBuilder;
    use d2d_places::DestinationMatcher;

    use super::helpers::*;
    use crate::engine::search;
    use crate::params::SearchParams;

    #[test]
    fn empty_adjacency_is_no_feasible_route() {
        let mut b = TimedGraphBuilder::new();
        b.add_node(node_at(1, 0.0, 0.0));
        b.add_node(node_at(2, 0.0, 1.0));
        let graph = b.build();
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());
        assert_eq!(outcome.status, SearchStatus::NoFeasibleRoute);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn origin_satisfying_predicate_yields_zero_leg_ok() {
        let graph = two_node_graph(vec![]);
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([1, 2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());
        assert_eq!(outcome.status, SearchStatus::Ok);
        let best = outcome.best.unwrap();
        assert!(best.arcs.is_empty());
        assert_eq!(best.gen_cost, 0.0);
        assert_eq!(best.transfers, 0);
        assert_eq!(best.arrival_utc, now());
    }

    #[test]
    fn zero_expansion_budget_exhausts_immediately() {
        let graph = two_node_graph(vec![(
            edge(10, 1, 2, TravelMode::Flight, 75, false),
            offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:15:00Z", 118.0),
        )]);
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let mut params = SearchParams::default();
        params.max_expansions = 0;
        let outcome = search(&graph, &origins, &matcher, &params, now());
        assert_eq!(outcome.status, SearchStatus::TimeBudgetExhausted);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.expansions, 0);
    }

    #[test]
    fn zero_timeout_exhausts_immediately() {
        let graph = two_node_graph(vec![(
            edge(10, 1, 2, TravelMode::Flight, 75, false),
            offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:15:00Z", 118.0),
        )]);
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let mut params = SearchParams::default();
        params.timeout_ms = 0;
        let outcome = search(&graph, &origins, &matcher, &params, now());
        assert_eq!(outcome.status, SearchStatus::TimeBudgetExhausted);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn early_optimality_fires_with_work_still_queued() {
        // Cheap direct hop to the goal plus an expensive branch that can
        // never catch up: the search must return before draining it.
        let mut b = TimedGraphBuilder::new();
        b.add_node(node_at(1, 0.0, 0.0));
        b.add_node(node_at(2, 0.0, 0.5));
        b.add_node(node_at(3, 0.0, 1.0));
        b.add_arc(
            edge(10, 1, 2, TravelMode::Bus, 30, false),
            offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T08:30:00Z", 5.0),
        );
        b.add_arc(
            edge(11, 1, 3, TravelMode::Flight, 60, false),
            offer(101, 11, "2025-11-15T08:00:00Z", "2025-11-15T09:00:00Z", 500.0),
        );
        let graph = b.build();
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());
        assert_eq!(outcome.status, SearchStatus::Ok);
        // Origin + goal pops only; the 500-cost branch stayed queued.
        assert_eq!(outcome.expansions, 2);
        assert_eq!(outcome.pushed, 3);
    }

    #[test]
    fn rerun_is_deterministic() {
        let build = || {
            two_node_graph(vec![
                (
                    edge(10, 1, 2, TravelMode::Flight, 75, false),
                    offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:15:00Z", 118.0),
                ),
                (
                    edge(11, 1, 2, TravelMode::Bus, 260, false),
                    offer(101, 11, "2025-11-15T08:00:00Z", "2025-11-15T12:20:00Z", 25.0),
                ),
            ])
        };
        let matcher = DestinationMatcher::from_ids([2]);
        let params = SearchParams::default();

        let a_graph = build();
        let a = search(&a_graph, &[a_graph.node_idx(1).unwrap()], &matcher, &params, now());
        let b_graph = build();
        let b = search(&b_graph, &[b_graph.node_idx(1).unwrap()], &matcher, &params, now());

        let a_best = a.best.unwrap();
        let b_best = b.best.unwrap();
        assert_eq!(a_best.gen_cost, b_best.gen_cost);
        let a_offers: Vec<i64> = a_best.arcs.iter().map(|&i| a_graph.arc(i).offer.id).collect();
        let b_offers: Vec<i64> = b_best.arcs.iter().map(|&i| b_graph.arc(i).offer.id).collect();
        assert_eq!(a_offers, b_offers);
        assert_eq!(a.expansions, b.expansions);
    }

    #[test]
    fn static_offers_board_at_frontier_arrival() {
        let mut b = TimedGraphBuilder::new();
        b.add_node(node_at(1, 0.0, 0.0));
        b.add_node(node_at(2, 0.0, 0.01));
        // Static walk anchored at some stale wall clock; the search must
        // rebase it onto the frontier arrival.
        let mut o = offer(100, 10, "2025-01-01T00:00:00Z", "2025-01-01T00:12:00Z", 0.0);
        o.is_static = true;
        b.add_arc(edge(10, 1, 2, TravelMode::Walk, 12, true), o);
        let graph = b.build();
        let origins = [graph.node_idx(1).unwrap()];
        let matcher = DestinationMatcher::from_ids([2]);

        let outcome = search(&graph, &origins, &matcher, &SearchParams::default(), now());
        let best = outcome.best.unwrap();
        assert_eq!(best.arrival_utc, now() + chrono::Duration::minutes(12));
    }
}

// ── Params ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use crate::params::SearchParams;

    #[test]
    fn defaults_match_the_engine_contract() {
        let p = SearchParams::default();
        assert_eq!(p.max_expansions, 100_000);
        assert_eq!(p.timeout_ms, 5_000);
        assert_eq!(p.time_value_per_hour, 20.0);
        assert_eq!(p.transfer_penalty, 6.0);
        assert_eq!(p.max_detour_factor, 2.2);
        assert_eq!(p.risk_penalty, 0.0);
        assert_eq!(p.transfer_radius_km, 3.0);
        assert_eq!(p.rideshare.base_fare, 3.00);
    }

    #[test]
    fn partial_overrides_deserialize_over_defaults() {
        let p: SearchParams =
            serde_json::from_str(r#"{"timeout_ms": 100, "transfer_radius_km": 1.5}"#).unwrap();
        assert_eq!(p.timeout_ms, 100);
        assert_eq!(p.transfer_radius_km, 1.5);
        assert_eq!(p.max_expansions, 100_000);
    }

    #[test]
    fn transfer_config_carries_radius_and_rideshare() {
        let mut p = SearchParams::default();
        p.transfer_radius_km = 7.0;
        p.rideshare.surge_coeff = 2.0;
        let cfg = p.transfer_config();
        assert_eq!(cfg.radius_km, 7.0);
        assert_eq!(cfg.rideshare.surge_coeff, 2.0);
    }
}

// ── Planner end-to-end ────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use d2d_core::geo::GeoPoint;
    use d2d_core::mode::{AreaKind, NodeKind, SearchStatus, TravelMode};
    use d2d_core::{Area, LocationNode};
    use d2d_places::FixtureGeocoder;
    use d2d_store::Store;

    use super::helpers::*;
    use crate::params::SearchParams;
    use crate::planner::Planner;

    fn city(id: i64, name: &str, lat: f64, lon: f64) -> Area {
        Area {
            id,
            name: name.to_owned(),
            kind: AreaKind::City,
            country: Some("US".to_owned()),
            center: GeoPoint::new(lat, lon),
            radius_km: 15.0,
            parent_id: None,
        }
    }

    fn station(id: i64, name: &str, area_id: i64, lat: f64, lon: f64) -> LocationNode {
        LocationNode {
            id,
            external_ref: None,
            name: name.to_owned(),
            kind: NodeKind::Station,
            area_id: Some(area_id),
            pos: GeoPoint::new(lat, lon),
            is_hub: false,
            mct_air_ground_min: 0,
            mct_ground_air_min: 0,
            mct_any_min: 0,
            country: Some("US".to_owned()),
            timezone: None,
        }
    }

    /// Boston and New York, one flight between them.
    fn fixture() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.insert_area(&city(1, "Boston", 42.36, -71.06)).unwrap();
        store.insert_area(&city(2, "New York", 40.71, -74.00)).unwrap();
        store.insert_node(&station(1, "Logan Airport", 1, 42.36, -71.06)).unwrap();
        store.insert_node(&station(2, "JFK Airport", 2, 40.71, -74.00)).unwrap();
        store
            .insert_edge(&edge(10, 1, 2, TravelMode::Flight, 75, false))
            .unwrap();
        store
            .insert_offer(&offer(100, 10, "2025-11-15T08:00:00Z", "2025-11-15T09:15:00Z", 118.0))
            .unwrap();
        store
    }

    #[test]
    fn area_to_area_flight() {
        let store = fixture();
        let geocoder = FixtureGeocoder::new();
        let planner = Planner::new(&store, &geocoder);

        let bundle = planner
            .plan_at("Boston", "New York", &SearchParams::default(), now())
            .unwrap();

        assert_eq!(bundle.status, SearchStatus::Ok);
        assert_eq!(bundle.legs.len(), 1);
        assert_eq!(bundle.legs[0].mode, TravelMode::Flight);
        assert!((bundle.generalized_cost.unwrap() - 143.0).abs() < 1e-9);
        assert_eq!(bundle.price_total, 118.0);
        assert_eq!(bundle.duration_min, 75);
        assert_eq!(bundle.num_transfers, 0);
        assert_eq!(bundle.main_mode, Some(TravelMode::Flight));
        assert_eq!(bundle.origin_node_id, Some(1));
        assert_eq!(bundle.dest_node_id, Some(2));
        assert!(bundle.search_params_json.contains("\"resolved_as\":\"area\""));
    }

    #[test]
    fn address_destination_gets_a_last_mile_transfer() {
        let store = fixture();
        // ~1 km north of JFK.
        let geocoder = FixtureGeocoder::new()
            .with("9 Harbor Way", GeoPoint::new(40.71 + 1.0 / 111.195, -74.00));
        let planner = Planner::new(&store, &geocoder);

        let bundle = planner
            .plan_at("Boston", "address:9 Harbor Way", &SearchParams::default(), now())
            .unwrap();

        assert_eq!(bundle.status, SearchStatus::Ok);
        assert_eq!(bundle.legs.len(), 2);
        assert_eq!(bundle.num_transfers, 1);
        let last = bundle.legs.last().unwrap();
        assert!(last.is_transfer);
        // Walk wins the last mile: 0 cash + 20·(12/60) + 6 = 10 beats the
        // rideshare's 13.17 and the shuttle's 18.67.
        assert_eq!(last.mode, TravelMode::Walk);
        assert_eq!(last.to_node_id, bundle.dest_node_id.unwrap());
        assert!(last.to_node_id < 0, "destination is a synthetic node");
        assert!((bundle.generalized_cost.unwrap() - 153.0).abs() < 1e-6);

        // Bundle invariants.
        let leg_sum: f64 = bundle.legs.iter().map(|l| l.price).sum();
        assert_eq!(bundle.price_total, leg_sum);
        let dur_sum: i64 = bundle.legs.iter().map(|l| l.duration_min).sum();
        assert_eq!(bundle.duration_min, dur_sum);
        let transfer_count = bundle.legs.iter().filter(|l| l.is_transfer).count() as u32;
        assert_eq!(bundle.num_transfers, transfer_count);
    }

    #[test]
    fn origin_equals_destination_is_a_zero_leg_bundle() {
        let store = fixture();
        let geocoder = FixtureGeocoder::new();
        let planner = Planner::new(&store, &geocoder);

        let bundle = planner
            .plan_at("Boston", "Boston", &SearchParams::default(), now())
            .unwrap();

        assert_eq!(bundle.status, SearchStatus::Ok);
        assert!(bundle.legs.is_empty());
        assert_eq!(bundle.price_total, 0.0);
        assert_eq!(bundle.duration_min, 0);
        assert_eq!(bundle.generalized_cost, Some(0.0));
        assert_eq!(bundle.origin_node_id, bundle.dest_node_id);
    }

    #[test]
    fn empty_area_short_circuits_before_graph_load() {
        let store = fixture();
        store.insert_area(&city(3, "Ghost Town", 10.0, 10.0)).unwrap();
        let geocoder = FixtureGeocoder::new();
        let planner = Planner::new(&store, &geocoder);

        let err = planner
            .plan_at("Ghost Town", "New York", &SearchParams::default(), now())
            .unwrap_err();
        assert!(matches!(err, crate::SearchError::Place(_)), "{err:?}");
    }

    #[test]
    fn persisted_bundle_round_trips() {
        let store = fixture();
        let geocoder = FixtureGeocoder::new();
        let planner = Planner::new(&store, &geocoder);

        let (bundle, row_id) = planner
            .plan_persisted("Boston", "New York", &SearchParams::default(), now())
            .unwrap();
        let row = store.get_bundle(row_id).unwrap();
        assert_eq!(row.search_status, "OK");
        assert_eq!(row.generalized_cost, bundle.generalized_cost);
        assert_eq!(row.origin_node_id, Some(1));
        assert!(row.legs_json.contains("\"mode\":\"flight\""));
    }

    #[test]
    fn rerun_yields_identical_legs() {
        let store = fixture();
        let geocoder = FixtureGeocoder::new();
        let planner = Planner::new(&store, &geocoder);
        let params = SearchParams::default();

        let a = planner.plan_at("Boston", "New York", &params, now()).unwrap();
        let b = planner.plan_at("Boston", "New York", &params, now()).unwrap();
        assert_eq!(a.generalized_cost, b.generalized_cost);
        let a_ids: Vec<i64> = a.legs.iter().map(|l| l.offer_id).collect();
        let b_ids: Vec<i64> = b.legs.iter().map(|l| l.offer_id).collect();
        assert_eq!(a_ids, b_ids);
    }
}
