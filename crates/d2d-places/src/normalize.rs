//! The place normalizer.

use rustc_hash::FxHashSet;

use d2d_core::ids::SyntheticIds;
use d2d_core::mode::NodeKind;
use d2d_core::{Area, LocationNode};
use d2d_store::Store;

use crate::error::{PlaceError, PlaceResult};
use crate::geocode::Geocoder;

/// Prefix forcing address interpretation.
const ADDRESS_PREFIX: &str = "address:";

// ── PlaceSpec ────────────────────────────────────────────────────────────────

/// How a raw origin/destination string was interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceSpec {
    /// A point address; resolution created one synthetic node for it.
    Address { address: String },
    /// `hotel … near <area>`; candidate nodes are the area's hotels.
    HotelQuery { area: Area },
    /// A named area; candidate nodes are everything the area owns.
    Area { area: Area },
}

impl PlaceSpec {
    /// Short tag used in `search_params_json`.
    pub fn tag(&self) -> &'static str {
        match self {
            PlaceSpec::Address { .. } => "address",
            PlaceSpec::HotelQuery { .. } => "hotel_query",
            PlaceSpec::Area { .. } => "area",
        }
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// The outcome of normalizing one raw string.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub raw: String,
    pub spec: PlaceSpec,
    /// Candidate graph nodes.  For `Address` this holds the one synthetic
    /// node, which must be handed to the graph assembler as an extra node.
    pub nodes: Vec<LocationNode>,
    /// Area candidates the fuzzy lookup returned (≤ 5).  More than one
    /// means the tie-break picked `candidates[0]`; surfaced so the caller
    /// can record the ambiguity in `search_params_json`.
    pub candidates: Vec<Area>,
}

impl Resolution {
    /// `true` when the fuzzy lookup had more than one candidate area.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    /// Build the destination-matching predicate for this resolution.
    pub fn matcher(&self) -> DestinationMatcher {
        DestinationMatcher {
            ids: self.nodes.iter().map(|n| n.id).collect(),
        }
    }
}

/// Destination predicate: does a node id belong to the resolved set?
///
/// For `Address` the set is the single synthetic node id; for `Area` and
/// `HotelQuery` it is the whole candidate set.
#[derive(Debug, Clone)]
pub struct DestinationMatcher {
    ids: FxHashSet<i64>,
}

impl DestinationMatcher {
    /// Build a matcher over an explicit id set.
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    #[inline]
    pub fn matches(&self, node_id: i64) -> bool {
        self.ids.contains(&node_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ── Normalizer ───────────────────────────────────────────────────────────────

/// Resolves raw strings against the store's areas/nodes plus an injected
/// geocoder.
pub struct Normalizer<'a, G: Geocoder> {
    store: &'a Store,
    geocoder: &'a G,
    strict: bool,
}

impl<'a, G: Geocoder> Normalizer<'a, G> {
    pub fn new(store: &'a Store, geocoder: &'a G) -> Self {
        Self {
            store,
            geocoder,
            strict: false,
        }
    }

    /// Refuse to tie-break ambiguous area lookups instead of picking the
    /// lowest id.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Resolve one raw origin/destination string.
    ///
    /// Synthetic address nodes draw their ids from `ids`, the per-search
    /// negative counter shared with transfer synthesis.
    pub fn resolve(&self, raw: &str, ids: &mut SyntheticIds) -> PlaceResult<Resolution> {
        let trimmed = raw.trim();

        if let Some(address) = trimmed.strip_prefix(ADDRESS_PREFIX) {
            return Ok(self.resolve_address(raw, address.trim(), ids));
        }

        let lower = trimmed.to_lowercase();
        if lower.starts_with("hotel") {
            return self.resolve_hotel(raw, &lower, ids);
        }

        let candidates = self.store.areas_by_name(trimmed)?;
        if candidates.is_empty() {
            // No area interpretation — treat the whole string as an address.
            return Ok(self.resolve_address(raw, trimmed, ids));
        }
        let area = self.pick_area(trimmed, &candidates)?;
        let nodes = self.store.nodes_in_area(area.id)?;
        if nodes.is_empty() {
            return Err(PlaceError::EmptyArea {
                area_id: area.id,
                area_name: area.name.clone(),
            });
        }
        Ok(Resolution {
            raw: raw.to_owned(),
            spec: PlaceSpec::Area { area },
            nodes,
            candidates,
        })
    }

    // ── Variants ──────────────────────────────────────────────────────────

    fn resolve_address(&self, raw: &str, address: &str, ids: &mut SyntheticIds) -> Resolution {
        let pos = self.geocoder.geocode(address);
        let node = LocationNode::synthetic_address(ids.next_id(), address, pos);
        log::debug!("address `{address}` geocoded to {pos} as node {}", node.id);
        Resolution {
            raw: raw.to_owned(),
            spec: PlaceSpec::Address {
                address: address.to_owned(),
            },
            nodes: vec![node],
            candidates: Vec::new(),
        }
    }

    fn resolve_hotel(
        &self,
        raw: &str,
        lower: &str,
        ids: &mut SyntheticIds,
    ) -> PlaceResult<Resolution> {
        // `hotel … near <X>` — everything after the first " near " names
        // the area.  The lookup is case-insensitive, so matching on the
        // lowercased string is safe.
        let Some(pos) = lower.find(" near ") else {
            return Ok(self.resolve_address(raw, raw.trim(), ids));
        };
        let area_name = lower[pos + " near ".len()..].trim();

        let candidates = self.store.areas_by_name(area_name)?;
        if candidates.is_empty() {
            return Ok(self.resolve_address(raw, raw.trim(), ids));
        }
        let area = self.pick_area(area_name, &candidates)?;
        let hotels: Vec<LocationNode> = self
            .store
            .nodes_in_area(area.id)?
            .into_iter()
            .filter(|n| n.kind == NodeKind::Hotel)
            .collect();
        if hotels.is_empty() {
            return Err(PlaceError::EmptyArea {
                area_id: area.id,
                area_name: area.name.clone(),
            });
        }
        Ok(Resolution {
            raw: raw.to_owned(),
            spec: PlaceSpec::HotelQuery { area },
            nodes: hotels,
            candidates,
        })
    }

    /// Tie-break: the store returns candidates in ascending id order, so
    /// the first one wins.  Strict mode refuses instead.
    fn pick_area(&self, pattern: &str, candidates: &[Area]) -> PlaceResult<Area> {
        if self.strict && candidates.len() > 1 {
            return Err(PlaceError::AmbiguousArea {
                pattern: pattern.to_owned(),
                candidates: candidates.iter().map(|a| a.id).collect(),
            });
        }
        Ok(candidates[0].clone())
    }
}
