//! Raw row structs and row ↔ record conversion.
//!
//! Rows hold exactly what SQLite hands back (strings for tags and
//! timestamps); conversion into validated `d2d-core` records happens in
//! `to_record`, so a malformed row surfaces as `StoreError::Corrupted`
//! rather than a panic deep in the graph assembler.

use d2d_core::geo::GeoPoint;
use d2d_core::time::parse_stamp;
use d2d_core::{Area, EdgeLeg, LocationNode, Offer};

use crate::error::{StoreError, StoreResult};

pub(crate) struct AreaRow {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub country: Option<String>,
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_km: f64,
    pub parent_id: Option<i64>,
}

impl AreaRow {
    pub fn to_record(self) -> StoreResult<Area> {
        let area = Area {
            id: self.id,
            name: self.name,
            kind: self.kind.parse()?,
            country: self.country,
            center: GeoPoint::new(self.center_lat, self.center_lon),
            radius_km: self.radius_km,
            parent_id: self.parent_id,
        };
        area.validate()?;
        Ok(area)
    }
}

pub(crate) struct NodeRow {
    pub id: i64,
    pub external_ref: Option<String>,
    pub name: String,
    pub kind: String,
    pub area_id: Option<i64>,
    pub lat: f64,
    pub lon: f64,
    pub is_hub: bool,
    pub mct_air_ground_min: u32,
    pub mct_ground_air_min: u32,
    pub mct_any_min: u32,
    pub country: Option<String>,
    pub timezone: Option<String>,
}

impl NodeRow {
    pub fn to_record(self) -> StoreResult<LocationNode> {
        let node = LocationNode {
            id: self.id,
            external_ref: self.external_ref,
            name: self.name,
            kind: self.kind.parse()?,
            area_id: self.area_id,
            pos: GeoPoint::new(self.lat, self.lon),
            is_hub: self.is_hub,
            mct_air_ground_min: self.mct_air_ground_min,
            mct_ground_air_min: self.mct_ground_air_min,
            mct_any_min: self.mct_any_min,
            country: self.country,
            timezone: self.timezone,
        };
        node.validate()?;
        Ok(node)
    }
}

pub(crate) struct EdgeRow {
    pub id: i64,
    pub from_node: i64,
    pub to_node: i64,
    pub mode: String,
    pub is_transfer: bool,
    pub carrier_code: Option<String>,
    pub service_code: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_min: u32,
    pub mct_override_min: Option<u32>,
    pub co_located: bool,
    pub structure: String,
}

impl EdgeRow {
    pub fn to_record(self) -> StoreResult<EdgeLeg> {
        let edge = EdgeLeg {
            id: self.id,
            from_node: self.from_node,
            to_node: self.to_node,
            mode: self.mode.parse()?,
            is_transfer: self.is_transfer,
            carrier_code: self.carrier_code,
            service_code: self.service_code,
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            mct_override_min: self.mct_override_min,
            co_located: self.co_located,
            structure: self.structure.parse()?,
        };
        edge.validate()?;
        Ok(edge)
    }
}

pub(crate) struct OfferRow {
    pub id: i64,
    pub edge_id: i64,
    pub departure_time_utc: String,
    pub arrival_time_utc: String,
    pub price_total: Option<f64>,
    pub currency: String,
    pub source_type: String,
    pub provider: String,
    pub provider_ref: Option<String>,
    pub cache_ref: Option<String>,
    pub is_static: bool,
    pub retrieved_at_utc: String,
    pub validity_window_hrs: i64,
    pub effective_from_utc: Option<String>,
    pub last_verified_utc: Option<String>,
    pub ttl_hrs: i64,
    pub is_active: bool,
    pub reliability: Option<f64>,
    pub meta_json: Option<String>,
}

impl OfferRow {
    pub fn to_record(self) -> StoreResult<Offer> {
        let meta_json = match self.meta_json {
            None => None,
            Some(raw) => Some(
                serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Corrupted(format!("offer meta_json: {e}")))?,
            ),
        };
        let offer = Offer {
            id: self.id,
            edge_id: self.edge_id,
            departure_utc: parse_stamp(&self.departure_time_utc)?,
            arrival_utc: parse_stamp(&self.arrival_time_utc)?,
            price_total: self.price_total,
            currency: self.currency,
            source: self.source_type.parse()?,
            provider: self.provider,
            provider_ref: self.provider_ref,
            cache_ref: self.cache_ref,
            is_static: self.is_static,
            retrieved_at_utc: parse_stamp(&self.retrieved_at_utc)?,
            validity_window_hrs: self.validity_window_hrs,
            effective_from_utc: self
                .effective_from_utc
                .as_deref()
                .map(parse_stamp)
                .transpose()?,
            last_verified_utc: self
                .last_verified_utc
                .as_deref()
                .map(parse_stamp)
                .transpose()?,
            ttl_hrs: self.ttl_hrs,
            is_active: self.is_active,
            reliability: self.reliability,
            meta_json,
        };
        offer.validate()?;
        Ok(offer)
    }
}

// ── BundleRow ────────────────────────────────────────────────────────────────

/// Flat persisted form of a finished itinerary bundle.
///
/// `d2d-search` produces these from its in-memory bundle type; the store
/// never needs to understand the legs beyond their JSON serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleRow {
    pub origin_node_id: Option<i64>,
    pub dest_node_id: Option<i64>,
    pub origin_spec_raw: String,
    pub dest_spec_raw: String,
    pub legs_json: String,
    pub price_total: f64,
    pub duration_min: i64,
    pub num_transfers: i64,
    pub main_mode: Option<String>,
    pub generalized_cost: Option<f64>,
    pub search_status: String,
    pub search_params_json: String,
    pub started_at_utc: String,
    pub finished_at_utc: String,
}
