//! Timed graph representation and builder.
//!
//! # Data layout
//!
//! The adjacency uses **Compressed Sparse Row (CSR)** format for outgoing
//! arcs.  Given a `NodeIdx n`, its outgoing timed arcs occupy:
//!
//! ```text
//! arcs[ arc_start[n] .. arc_start[n+1] ]
//! ```
//!
//! Arcs are sorted by source node and indexed by `ArcIdx`, so iterating a
//! node's out-arcs is a contiguous scan — what the branch-and-bound inner
//! loop wants.  Nodes live in an arena `Vec` addressed by `NodeIdx`;
//! persisted `i64` ids map to indexes through one hash lookup at build
//! time and never inside the search.

use rustc_hash::FxHashMap;

use d2d_core::{ArcIdx, EdgeLeg, LocationNode, NodeIdx, Offer};

// ── TimedArc ─────────────────────────────────────────────────────────────────

/// One searchable arc: a structural edge plus one timed offer on it.
#[derive(Debug, Clone)]
pub struct TimedArc {
    pub from: NodeIdx,
    pub to: NodeIdx,
    pub edge: EdgeLeg,
    pub offer: Offer,
}

// ── TimedGraph ───────────────────────────────────────────────────────────────

/// Immutable timed adjacency for one search (or several sharing a snapshot).
///
/// Do not construct directly; use [`TimedGraphBuilder`] or
/// [`assemble`](crate::assemble::assemble).
pub struct TimedGraph {
    nodes: Vec<LocationNode>,
    idx_by_id: FxHashMap<i64, NodeIdx>,
    /// Sorted by `from`; indexed by `ArcIdx`.
    arcs: Vec<TimedArc>,
    /// CSR row pointer, length `node_count + 1`.
    arc_start: Vec<u32>,
}

impl TimedGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, idx: NodeIdx) -> &LocationNode {
        &self.nodes[idx.index()]
    }

    pub fn nodes(&self) -> &[LocationNode] {
        &self.nodes
    }

    /// Resolve a persisted (or synthetic negative) node id to its index.
    pub fn node_idx(&self, id: i64) -> Option<NodeIdx> {
        self.idx_by_id.get(&id).copied()
    }

    #[inline]
    pub fn arc(&self, idx: ArcIdx) -> &TimedArc {
        &self.arcs[idx.index()]
    }

    /// Iterator over the `ArcIdx`s of all outgoing arcs from `node`.
    ///
    /// A contiguous index range — no heap allocation.
    #[inline]
    pub fn out_arcs(&self, node: NodeIdx) -> impl Iterator<Item = ArcIdx> + '_ {
        let start = self.arc_start[node.index()] as usize;
        let end = self.arc_start[node.index() + 1] as usize;
        (start..end).map(|i| ArcIdx(i as u32))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeIdx) -> usize {
        let start = self.arc_start[node.index()] as usize;
        let end = self.arc_start[node.index() + 1] as usize;
        end - start
    }
}

// ── TimedGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`TimedGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes and arcs may arrive in any order; `build()` sorts arcs by source
/// node and constructs the CSR row pointer.
pub struct TimedGraphBuilder {
    nodes: Vec<LocationNode>,
    idx_by_id: FxHashMap<i64, NodeIdx>,
    raw_arcs: Vec<TimedArc>,
}

impl TimedGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            idx_by_id: FxHashMap::default(),
            raw_arcs: Vec::new(),
        }
    }

    pub fn with_capacity(nodes: usize, arcs: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            idx_by_id: FxHashMap::default(),
            raw_arcs: Vec::with_capacity(arcs),
        }
    }

    /// Add a node and return its index.  A duplicate id returns the
    /// existing index and keeps the first record.
    pub fn add_node(&mut self, node: LocationNode) -> NodeIdx {
        if let Some(&existing) = self.idx_by_id.get(&node.id) {
            return existing;
        }
        let idx = NodeIdx(self.nodes.len() as u32);
        self.idx_by_id.insert(node.id, idx);
        self.nodes.push(node);
        idx
    }

    pub fn node_idx(&self, id: i64) -> Option<NodeIdx> {
        self.idx_by_id.get(&id).copied()
    }

    pub fn nodes(&self) -> &[LocationNode] {
        &self.nodes
    }

    /// Add a timed arc for `(edge, offer)`.
    ///
    /// Returns `false` (and drops the pair) when either endpoint id is not
    /// in the node arena.
    pub fn add_arc(&mut self, edge: EdgeLeg, offer: Offer) -> bool {
        let (Some(&from), Some(&to)) = (
            self.idx_by_id.get(&edge.from_node),
            self.idx_by_id.get(&edge.to_node),
        ) else {
            return false;
        };
        self.raw_arcs.push(TimedArc {
            from,
            to,
            edge,
            offer,
        });
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.raw_arcs.len()
    }

    /// Consume the builder and produce a [`TimedGraph`].
    ///
    /// O(A log A) for the arc sort plus O(N) for the row pointer.  The sort
    /// is stable, so arcs from the same node keep insertion order — which
    /// keeps search expansion order reproducible.
    pub fn build(self) -> TimedGraph {
        let node_count = self.nodes.len();

        let mut arcs = self.raw_arcs;
        arcs.sort_by_key(|a| a.from.0);

        let mut arc_start = vec![0u32; node_count + 1];
        for arc in &arcs {
            arc_start[arc.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            arc_start[i] += arc_start[i - 1];
        }
        debug_assert_eq!(arc_start[node_count] as usize, arcs.len());

        TimedGraph {
            nodes: self.nodes,
            idx_by_id: self.idx_by_id,
            arcs,
            arc_start,
        }
    }
}

impl Default for TimedGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
