//! Best-first branch-and-bound over the timed graph.
//!
//! # State space
//!
//! A state is `(node, arrival time, generalized cost, transfers, traversed
//! distance)` plus a parent link for path reconstruction.  States live in
//! an arena; the frontier holds arena indexes ordered by ascending cost
//! with insertion order as the tie-break, so two runs over the same graph
//! and parameters expand identically.
//!
//! # Pruning
//!
//! Each successor's cost is computed exactly once, then the prune
//! predicates run, then dominance is checked and recorded, then the state
//! is pushed.  The dominance table maps `(node, 5-minute arrival bucket)`
//! to the best cost seen; a bucketed key avoids quadratic blow-up on
//! timestamp diversity while keeping "same place, roughly same time,
//! strictly worse → drop".
//!
//! # Budgets
//!
//! Wall clock and expansion count are checked **before popping each
//! state**; on breach the best-so-far (possibly none) is returned with
//! `TIME_BUDGET_EXHAUSTED`.  No work is left in flight.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;

use d2d_core::geo::GeoPoint;
use d2d_core::mode::SearchStatus;
use d2d_core::time::arrival_bucket;
use d2d_core::{ArcIdx, NodeIdx};
use d2d_graph::TimedGraph;
use d2d_places::DestinationMatcher;

use crate::cost::CostModel;
use crate::params::SearchParams;

// ── Outcome ──────────────────────────────────────────────────────────────────

/// The best itinerary found: ordered arcs plus the final state's totals.
#[derive(Debug, Clone)]
pub struct ItineraryPath {
    pub arcs: Vec<ArcIdx>,
    pub end_node: NodeIdx,
    pub gen_cost: f64,
    pub transfers: u32,
    pub arrival_utc: DateTime<Utc>,
}

/// What a search run produced, plus counters for logging and tests.
#[derive(Debug)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    pub best: Option<ItineraryPath>,
    pub expansions: u64,
    pub pushed: u64,
    pub pruned: u64,
    pub dominated: u64,
}

// ── Internal state ───────────────────────────────────────────────────────────

struct State {
    node: NodeIdx,
    arrival: DateTime<Utc>,
    gen_cost: f64,
    transfers: u32,
    dist_km: f64,
    parent: Option<u32>,
    via: Option<ArcIdx>,
}

/// Frontier key: ascending cost, then insertion sequence.  `total_cmp`
/// gives a total order over the cost floats.
#[derive(Copy, Clone)]
struct FrontierEntry {
    cost: f64,
    seq: u64,
    state: u32,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost).is_eq() && self.seq == other.seq
    }
}
impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.seq.cmp(&other.seq))
    }
}
impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ── Search ───────────────────────────────────────────────────────────────────

/// Run one branch-and-bound search.
///
/// `origins` seed the frontier in order with zero cost and arrival `now`.
/// The destination predicate is `matcher`; destination coordinates for the
/// lower bound are derived from it against the graph.
pub fn search(
    graph: &TimedGraph,
    origins: &[NodeIdx],
    matcher: &DestinationMatcher,
    params: &SearchParams,
    now: DateTime<Utc>,
) -> SearchOutcome {
    let model = CostModel::from_params(params);

    // Destination coordinates for the lower bound and the detour baseline.
    let dest_points: Vec<GeoPoint> = graph
        .nodes()
        .iter()
        .filter(|n| matcher.matches(n.id))
        .map(|n| n.pos)
        .collect();

    // Straight-line baseline: the closest origin/destination pairing, so
    // the detour cap never cuts off a pair the search may legally connect.
    let direct_km = origins
        .iter()
        .flat_map(|&o| {
            let from = graph.node(o).pos;
            dest_points.iter().map(move |d| from.approx_km(*d))
        })
        .fold(f64::INFINITY, f64::min);

    let mut states: Vec<State> = Vec::new();
    let mut heap: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
    let mut dominance: FxHashMap<(NodeIdx, i64), f64> = FxHashMap::default();
    let mut seq: u64 = 0;

    let mut pushed: u64 = 0;
    let mut pruned: u64 = 0;
    let mut dominated: u64 = 0;

    for &origin in origins {
        let key = (origin, arrival_bucket(now));
        match dominance.get(&key) {
            Some(&prior) if prior <= 0.0 => {
                dominated += 1;
                continue; // duplicate origin
            }
            _ => {
                dominance.insert(key, 0.0);
            }
        }
        let idx = states.len() as u32;
        states.push(State {
            node: origin,
            arrival: now,
            gen_cost: 0.0,
            transfers: 0,
            dist_km: 0.0,
            parent: None,
            via: None,
        });
        heap.push(Reverse(FrontierEntry {
            cost: 0.0,
            seq,
            state: idx,
        }));
        seq += 1;
        pushed += 1;
    }

    let started = Instant::now();
    let mut expansions: u64 = 0;
    let mut best: Option<(f64, u32)> = None;

    loop {
        // Budget checks happen before each pop, so `max_expansions = 0`
        // and `timeout_ms = 0` both exhaust deterministically.
        if expansions >= params.max_expansions
            || started.elapsed().as_millis() as u64 >= params.timeout_ms
        {
            log::debug!(
                "budget exhausted after {expansions} expansions ({pushed} pushed, \
                 {pruned} pruned, {dominated} dominated)"
            );
            return SearchOutcome {
                status: SearchStatus::TimeBudgetExhausted,
                best: best.map(|(_, idx)| reconstruct(&states, idx)),
                expansions,
                pushed,
                pruned,
                dominated,
            };
        }

        let Some(Reverse(entry)) = heap.pop() else {
            break; // frontier drained
        };
        expansions += 1;

        let (node, arrival, gen_cost, transfers, dist_km) = {
            let s = &states[entry.state as usize];
            (s.node, s.arrival, s.gen_cost, s.transfers, s.dist_km)
        };

        // A strictly better state may have claimed this bucket after this
        // entry was pushed; expanding it would regenerate dominated work.
        if let Some(&best_at_key) = dominance.get(&(node, arrival_bucket(arrival))) {
            if best_at_key < gen_cost {
                dominated += 1;
                continue;
            }
        }

        // ── Goal handling ─────────────────────────────────────────────────
        if matcher.matches(graph.node(node).id) {
            if best.map_or(true, |(cost, _)| gen_cost < cost) {
                best = Some((gen_cost, entry.state));
            }
            let best_cost = best.map(|(cost, _)| cost).unwrap_or(gen_cost);

            // Early optimality: the frontier minimum plus its lower bound
            // cannot beat the incumbent, so nothing pending can either.
            match heap.peek() {
                None => break,
                Some(Reverse(front)) => {
                    let front_node = states[front.state as usize].node;
                    let lb = model.lower_bound(graph.node(front_node).pos, &dest_points);
                    if front.cost + lb >= best_cost {
                        log::debug!(
                            "early optimality at cost {best_cost:.2} after {expansions} expansions"
                        );
                        return SearchOutcome {
                            status: SearchStatus::Ok,
                            best: best.map(|(_, idx)| reconstruct(&states, idx)),
                            expansions,
                            pushed,
                            pruned,
                            dominated,
                        };
                    }
                }
            }
            continue; // goal states are not expanded
        }

        // ── Expansion ─────────────────────────────────────────────────────
        for arc_idx in graph.out_arcs(node) {
            let arc = graph.arc(arc_idx);
            let leg = model.leg_cost(gen_cost, transfers, arc);

            let to = arc.to;
            let to_pos = graph.node(to).pos;
            let new_dist = dist_km + graph.node(node).pos.approx_km(to_pos);
            let lb_next = model.lower_bound(to_pos, &dest_points);

            if model.should_prune(
                leg.gen_cost,
                lb_next,
                best.map(|(cost, _)| cost),
                new_dist,
                direct_km,
            ) {
                pruned += 1;
                continue;
            }

            // Static and model-estimated offers board at the frontier
            // arrival; scheduled offers keep their own timestamps.
            let new_arrival = if arc.offer.boards_on_arrival() {
                arrival + Duration::minutes(leg.duration_min)
            } else {
                arc.offer.arrival_utc
            };

            let key = (to, arrival_bucket(new_arrival));
            match dominance.get(&key) {
                Some(&prior) if prior <= leg.gen_cost => {
                    dominated += 1;
                    continue;
                }
                _ => {
                    dominance.insert(key, leg.gen_cost);
                }
            }

            let idx = states.len() as u32;
            states.push(State {
                node: to,
                arrival: new_arrival,
                gen_cost: leg.gen_cost,
                transfers: leg.transfers,
                dist_km: new_dist,
                parent: Some(entry.state),
                via: Some(arc_idx),
            });
            heap.push(Reverse(FrontierEntry {
                cost: leg.gen_cost,
                seq,
                state: idx,
            }));
            seq += 1;
            pushed += 1;
        }
    }

    // Frontier drained.
    let status = if best.is_some() {
        SearchStatus::Ok
    } else {
        SearchStatus::NoFeasibleRoute
    };
    log::debug!(
        "frontier drained with status {status} after {expansions} expansions \
         ({pushed} pushed, {pruned} pruned, {dominated} dominated)"
    );
    SearchOutcome {
        status,
        best: best.map(|(_, idx)| reconstruct(&states, idx)),
        expansions,
        pushed,
        pruned,
        dominated,
    }
}

/// Walk the parent chain back to the seed and emit arcs in travel order.
fn reconstruct(states: &[State], end: u32) -> ItineraryPath {
    let terminal = &states[end as usize];
    let mut arcs = Vec::new();
    let mut cursor = end as usize;
    loop {
        let state = &states[cursor];
        match (state.via, state.parent) {
            (Some(arc), Some(parent)) => {
                arcs.push(arc);
                cursor = parent as usize;
            }
            _ => break,
        }
    }
    arcs.reverse();
    ItineraryPath {
        arcs,
        end_node: terminal.node,
        gen_cost: terminal.gen_cost,
        transfers: terminal.transfers,
        arrival_utc: terminal.arrival,
    }
}
