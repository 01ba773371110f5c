//! CSV reference-data seeding.
//!
//! One loader per table, each accepting any `Read` source (a file, or a
//! `Cursor` over an embedded fixture in tests and demos).  All rows of one
//! call are inserted inside a single transaction; a parse failure rolls the
//! whole call back.
//!
//! # CSV formats
//!
//! Flags are `0`/`1` integers, timestamps `YYYY-MM-DDTHH:MM:SSZ`, optional
//! columns empty strings.  Column order follows the schema tables:
//!
//! ```csv
//! id,name,kind,country,center_lat,center_lon,radius_km,parent_id
//! 1,Boston,city,US,42.36,-71.06,12.0,
//! ```

use std::io::Read;

use serde::Deserialize;

use d2d_core::geo::GeoPoint;
use d2d_core::time::parse_stamp;
use d2d_core::{Area, EdgeLeg, LocationNode, Offer};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

// ── CSV records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AreaRecord {
    id: i64,
    name: String,
    kind: String,
    country: Option<String>,
    center_lat: f64,
    center_lon: f64,
    radius_km: f64,
    parent_id: Option<i64>,
}

#[derive(Deserialize)]
struct NodeRecord {
    id: i64,
    external_ref: Option<String>,
    name: String,
    kind: String,
    area_id: Option<i64>,
    lat: f64,
    lon: f64,
    is_hub: u8,
    mct_air_ground_min: u32,
    mct_ground_air_min: u32,
    mct_any_min: u32,
    country: Option<String>,
    timezone: Option<String>,
}

#[derive(Deserialize)]
struct EdgeRecord {
    id: i64,
    from_node: i64,
    to_node: i64,
    mode: String,
    is_transfer: u8,
    carrier_code: Option<String>,
    service_code: Option<String>,
    distance_km: Option<f64>,
    duration_min: u32,
    mct_override_min: Option<u32>,
    co_located: u8,
    structure: String,
}

#[derive(Deserialize)]
struct OfferRecord {
    id: i64,
    edge_id: i64,
    departure_time_utc: String,
    arrival_time_utc: String,
    price_total: Option<f64>,
    currency: String,
    source_type: String,
    provider: String,
    is_static: u8,
    retrieved_at_utc: String,
    validity_window_hrs: i64,
    ttl_hrs: i64,
    is_active: u8,
}

// ── Loaders ──────────────────────────────────────────────────────────────────

/// Load areas from CSV; returns the number of rows inserted.
pub fn seed_areas<R: Read>(store: &Store, reader: R) -> StoreResult<usize> {
    with_transaction(store, |store| {
        let mut count = 0;
        for result in csv::Reader::from_reader(reader).deserialize::<AreaRecord>() {
            let rec = result.map_err(parse_error)?;
            let area = Area {
                id: rec.id,
                name: rec.name,
                kind: rec.kind.parse()?,
                country: rec.country,
                center: GeoPoint::new(rec.center_lat, rec.center_lon),
                radius_km: rec.radius_km,
                parent_id: rec.parent_id,
            };
            store.insert_area(&area)?;
            count += 1;
        }
        Ok(count)
    })
}

/// Load location nodes from CSV; returns the number of rows inserted.
pub fn seed_nodes<R: Read>(store: &Store, reader: R) -> StoreResult<usize> {
    with_transaction(store, |store| {
        let mut count = 0;
        for result in csv::Reader::from_reader(reader).deserialize::<NodeRecord>() {
            let rec = result.map_err(parse_error)?;
            let node = LocationNode {
                id: rec.id,
                external_ref: rec.external_ref,
                name: rec.name,
                kind: rec.kind.parse()?,
                area_id: rec.area_id,
                pos: GeoPoint::new(rec.lat, rec.lon),
                is_hub: rec.is_hub != 0,
                mct_air_ground_min: rec.mct_air_ground_min,
                mct_ground_air_min: rec.mct_ground_air_min,
                mct_any_min: rec.mct_any_min,
                country: rec.country,
                timezone: rec.timezone,
            };
            store.insert_node(&node)?;
            count += 1;
        }
        Ok(count)
    })
}

/// Load structural edges from CSV; returns the number of rows inserted.
pub fn seed_edges<R: Read>(store: &Store, reader: R) -> StoreResult<usize> {
    with_transaction(store, |store| {
        let mut count = 0;
        for result in csv::Reader::from_reader(reader).deserialize::<EdgeRecord>() {
            let rec = result.map_err(parse_error)?;
            let edge = EdgeLeg {
                id: rec.id,
                from_node: rec.from_node,
                to_node: rec.to_node,
                mode: rec.mode.parse()?,
                is_transfer: rec.is_transfer != 0,
                carrier_code: rec.carrier_code,
                service_code: rec.service_code,
                distance_km: rec.distance_km,
                duration_min: rec.duration_min,
                mct_override_min: rec.mct_override_min,
                co_located: rec.co_located != 0,
                structure: rec.structure.parse()?,
            };
            store.insert_edge(&edge)?;
            count += 1;
        }
        Ok(count)
    })
}

/// Load offers from CSV; returns the number of rows inserted.
///
/// The CSV carries the commonly seeded columns; provider refs, cache refs,
/// reliability, and meta stay NULL (they come from live providers, not
/// fixtures).
pub fn seed_offers<R: Read>(store: &Store, reader: R) -> StoreResult<usize> {
    with_transaction(store, |store| {
        let mut count = 0;
        for result in csv::Reader::from_reader(reader).deserialize::<OfferRecord>() {
            let rec = result.map_err(parse_error)?;
            let offer = Offer {
                id: rec.id,
                edge_id: rec.edge_id,
                departure_utc: parse_stamp(&rec.departure_time_utc)?,
                arrival_utc: parse_stamp(&rec.arrival_time_utc)?,
                price_total: rec.price_total,
                currency: rec.currency,
                source: rec.source_type.parse()?,
                provider: rec.provider,
                provider_ref: None,
                cache_ref: None,
                is_static: rec.is_static != 0,
                retrieved_at_utc: parse_stamp(&rec.retrieved_at_utc)?,
                validity_window_hrs: rec.validity_window_hrs,
                effective_from_utc: None,
                last_verified_utc: None,
                ttl_hrs: rec.ttl_hrs,
                is_active: rec.is_active != 0,
                reliability: None,
                meta_json: None,
            };
            store.insert_offer(&offer)?;
            count += 1;
        }
        Ok(count)
    })
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn parse_error(err: csv::Error) -> StoreError {
    StoreError::Corrupted(format!("seed csv: {err}"))
}

fn with_transaction<T>(
    store: &Store,
    body: impl FnOnce(&Store) -> StoreResult<T>,
) -> StoreResult<T> {
    store.conn.execute_batch("BEGIN")?;
    match body(store) {
        Ok(value) => {
            store.conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(why) => {
            let _ = store.conn.execute_batch("ROLLBACK");
            Err(why)
        }
    }
}
