//! Join store snapshots into a timed adjacency.
//!
//! Assembly runs once per search:
//!
//! 1. snapshot nodes, structural edges, and active offers;
//! 2. append the search's synthetic address nodes;
//! 3. one timed arc per `(edge, offer)` pair whose endpoints resolve;
//! 4. walk/rideshare/shuttle transfer arcs between every ordered pair of
//!    nodes within the transfer radius.
//!
//! Transfers are injected eagerly rather than generated lazily — memory
//! traded for a simpler search; the radius cap bounds the fan-out.  The
//! proximity query runs over an R-tree: a per-node envelope of
//! `radius/111°` latitude by `radius/(111·cos lat)°` longitude, then an
//! exact haversine filter.

use chrono::{DateTime, Utc};
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use d2d_core::geo::KM_PER_DEGREE;
use d2d_core::ids::SyntheticIds;
use d2d_core::mode::TravelMode;
use d2d_core::{LocationNode, NodeIdx, Offer};
use d2d_store::{Store, StoreResult};

use crate::graph::{TimedGraph, TimedGraphBuilder};
use crate::transfer::{TransferConfig, synthesize};

/// Transfer modes injected between every proximate ordered pair.
const TRANSFER_MODES: [TravelMode; 3] =
    [TravelMode::Walk, TravelMode::Rideshare, TravelMode::Shuttle];

// ── R-tree entry ─────────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    idx: NodeIdx,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Assembly ─────────────────────────────────────────────────────────────────

/// Build the timed adjacency for one search.
///
/// `extra_nodes` are the normalizer's synthetic address nodes; they join
/// the arena before transfer injection so first/last-mile arcs attach to
/// them.  Store failures abort the build (fatal to the search); a
/// transfer pair that cannot be synthesized is skipped.
pub fn assemble(
    store: &Store,
    extra_nodes: &[LocationNode],
    cfg: &TransferConfig,
    now: DateTime<Utc>,
    ids: &mut SyntheticIds,
) -> StoreResult<TimedGraph> {
    let nodes = store.all_nodes()?;
    let edges = store.all_edges()?;
    let offers = store.active_offers()?;

    let mut builder = TimedGraphBuilder::with_capacity(
        nodes.len() + extra_nodes.len(),
        offers.len(),
    );
    for node in nodes {
        builder.add_node(node);
    }
    for node in extra_nodes {
        builder.add_node(node.clone());
    }

    // ── Persisted arcs: one per (edge, offer) ─────────────────────────────
    let mut offers_by_edge: FxHashMap<i64, Vec<Offer>> = FxHashMap::default();
    for offer in offers {
        offers_by_edge.entry(offer.edge_id).or_default().push(offer);
    }

    let mut dangling = 0usize;
    for edge in &edges {
        let Some(edge_offers) = offers_by_edge.remove(&edge.id) else {
            continue; // structural edge with no timed instance — not searchable
        };
        for offer in edge_offers {
            if !builder.add_arc(edge.clone(), offer) {
                dangling += 1;
            }
        }
    }
    if dangling > 0 {
        log::warn!("dropped {dangling} offers on edges with unresolved endpoints");
    }

    // ── Synthesized transfer arcs ─────────────────────────────────────────
    let entries: Vec<NodeEntry> = builder
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.pos.is_valid())
        .map(|(i, n)| NodeEntry {
            point: [n.pos.lat, n.pos.lon],
            idx: NodeIdx(i as u32),
        })
        .collect();
    let index = RTree::bulk_load(entries);

    let all_nodes: Vec<LocationNode> = builder.nodes().to_vec();
    let mut injected = 0usize;
    for a in &all_nodes {
        if !a.pos.is_valid() {
            continue;
        }
        let d_lat = cfg.radius_km / KM_PER_DEGREE;
        let d_lon = cfg.radius_km / (KM_PER_DEGREE * a.pos.lat.to_radians().cos().max(0.01));
        let envelope = AABB::from_corners(
            [a.pos.lat - d_lat, a.pos.lon - d_lon],
            [a.pos.lat + d_lat, a.pos.lon + d_lon],
        );
        for entry in index.locate_in_envelope(&envelope) {
            let b = &all_nodes[entry.idx.index()];
            if b.id == a.id || a.pos.haversine_km(b.pos) > cfg.radius_km {
                continue;
            }
            for mode in TRANSFER_MODES {
                if let Some((edge, offer)) = synthesize(a, b, mode, now, cfg, ids) {
                    builder.add_arc(edge, offer);
                    injected += 1;
                }
            }
        }
    }

    let graph = builder.build();
    log::debug!(
        "assembled graph: {} nodes, {} arcs ({injected} synthesized transfers)",
        graph.node_count(),
        graph.arc_count(),
    );
    Ok(graph)
}
