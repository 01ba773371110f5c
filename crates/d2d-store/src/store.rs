//! The `Store` handle: snapshot reads, keyed lookups, and inserts.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use d2d_core::time::format_stamp;
use d2d_core::{Area, EdgeLeg, LocationNode, Offer};

use crate::error::{StoreError, StoreResult};
use crate::rows::{AreaRow, BundleRow, EdgeRow, NodeRow, OfferRow};
use crate::schema;

/// Handle on one SQLite database with the d2d schema applied.
///
/// Reference data (areas, nodes, edges, offers) is read-mostly; writes go
/// to the API cache and the append-only `itinerary_bundle` table.  A search
/// owns its handle for its duration — there is no pooling, and concurrent
/// searches each open their own.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(StoreError::Unavailable)?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database.  Used by tests and the demo.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Unavailable)?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }

    // ── Snapshot reads ────────────────────────────────────────────────────

    /// Full-table snapshot of location nodes, ordered by id.
    pub fn all_nodes(&self) -> StoreResult<Vec<LocationNode>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, external_ref, name, kind, area_id, lat, lon, is_hub,
                    mct_air_ground_min, mct_ground_air_min, mct_any_min,
                    country, timezone
             FROM location_node ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(NodeRow {
                id: row.get(0)?,
                external_ref: row.get(1)?,
                name: row.get(2)?,
                kind: row.get(3)?,
                area_id: row.get(4)?,
                lat: row.get(5)?,
                lon: row.get(6)?,
                is_hub: row.get(7)?,
                mct_air_ground_min: row.get(8)?,
                mct_ground_air_min: row.get(9)?,
                mct_any_min: row.get(10)?,
                country: row.get(11)?,
                timezone: row.get(12)?,
            })
        })?;
        rows.map(|row| row.map_err(StoreError::from_sqlite)?.to_record())
            .collect()
    }

    /// Full-table snapshot of structural edges, ordered by id.
    pub fn all_edges(&self) -> StoreResult<Vec<EdgeLeg>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, from_node, to_node, mode, is_transfer, carrier_code,
                    service_code, distance_km, duration_min, mct_override_min,
                    co_located, structure
             FROM edge_leg ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EdgeRow {
                id: row.get(0)?,
                from_node: row.get(1)?,
                to_node: row.get(2)?,
                mode: row.get(3)?,
                is_transfer: row.get(4)?,
                carrier_code: row.get(5)?,
                service_code: row.get(6)?,
                distance_km: row.get(7)?,
                duration_min: row.get(8)?,
                mct_override_min: row.get(9)?,
                co_located: row.get(10)?,
                structure: row.get(11)?,
            })
        })?;
        rows.map(|row| row.map_err(StoreError::from_sqlite)?.to_record())
            .collect()
    }

    /// Snapshot of all **active** offers, ordered by id.
    ///
    /// Inactive rows never reach the graph; validity/TTL windows are data
    /// for the provider refresh layer and are not filtered here.
    pub fn active_offers(&self) -> StoreResult<Vec<Offer>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, edge_id, departure_time_utc, arrival_time_utc,
                    price_total, currency, source_type, provider, provider_ref,
                    cache_ref, is_static, retrieved_at_utc, validity_window_hrs,
                    effective_from_utc, last_verified_utc, ttl_hrs, is_active,
                    reliability, meta_json
             FROM offer WHERE is_active = 1 ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(OfferRow {
                id: row.get(0)?,
                edge_id: row.get(1)?,
                departure_time_utc: row.get(2)?,
                arrival_time_utc: row.get(3)?,
                price_total: row.get(4)?,
                currency: row.get(5)?,
                source_type: row.get(6)?,
                provider: row.get(7)?,
                provider_ref: row.get(8)?,
                cache_ref: row.get(9)?,
                is_static: row.get(10)?,
                retrieved_at_utc: row.get(11)?,
                validity_window_hrs: row.get(12)?,
                effective_from_utc: row.get(13)?,
                last_verified_utc: row.get(14)?,
                ttl_hrs: row.get(15)?,
                is_active: row.get(16)?,
                reliability: row.get(17)?,
                meta_json: row.get(18)?,
            })
        })?;
        rows.map(|row| row.map_err(StoreError::from_sqlite)?.to_record())
            .collect()
    }

    // ── Keyed lookups ─────────────────────────────────────────────────────

    /// Fuzzy area lookup: case-insensitive substring match on name,
    /// ordered by ascending id, at most 5 candidates.
    ///
    /// `%`/`_` in the pattern are stripped rather than treated as LIKE
    /// metacharacters.
    pub fn areas_by_name(&self, pattern: &str) -> StoreResult<Vec<Area>> {
        let cleaned: String = pattern.chars().filter(|c| !matches!(c, '%' | '_')).collect();
        let like = format!("%{cleaned}%");
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, kind, country, center_lat, center_lon, radius_km, parent_id
             FROM area WHERE name LIKE ?1 ORDER BY id LIMIT 5",
        )?;
        let rows = stmt.query_map(params![like], |row| {
            Ok(AreaRow {
                id: row.get(0)?,
                name: row.get(1)?,
                kind: row.get(2)?,
                country: row.get(3)?,
                center_lat: row.get(4)?,
                center_lon: row.get(5)?,
                radius_km: row.get(6)?,
                parent_id: row.get(7)?,
            })
        })?;
        rows.map(|row| row.map_err(StoreError::from_sqlite)?.to_record())
            .collect()
    }

    /// All nodes owned by `area_id`, ordered by id.
    pub fn nodes_in_area(&self, area_id: i64) -> StoreResult<Vec<LocationNode>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, external_ref, name, kind, area_id, lat, lon, is_hub,
                    mct_air_ground_min, mct_ground_air_min, mct_any_min,
                    country, timezone
             FROM location_node WHERE area_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![area_id], |row| {
            Ok(NodeRow {
                id: row.get(0)?,
                external_ref: row.get(1)?,
                name: row.get(2)?,
                kind: row.get(3)?,
                area_id: row.get(4)?,
                lat: row.get(5)?,
                lon: row.get(6)?,
                is_hub: row.get(7)?,
                mct_air_ground_min: row.get(8)?,
                mct_ground_air_min: row.get(9)?,
                mct_any_min: row.get(10)?,
                country: row.get(11)?,
                timezone: row.get(12)?,
            })
        })?;
        rows.map(|row| row.map_err(StoreError::from_sqlite)?.to_record())
            .collect()
    }

    // ── Inserts ───────────────────────────────────────────────────────────

    pub fn insert_area(&self, area: &Area) -> StoreResult<()> {
        area.validate()?;
        self.conn.execute(
            "INSERT INTO area (id, name, kind, country, center_lat, center_lon,
                               radius_km, parent_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                area.id,
                area.name,
                area.kind.as_str(),
                area.country,
                area.center.lat,
                area.center.lon,
                area.radius_km,
                area.parent_id,
            ],
        )?;
        Ok(())
    }

    pub fn insert_node(&self, node: &LocationNode) -> StoreResult<()> {
        node.validate()?;
        self.conn.execute(
            "INSERT INTO location_node
                (id, external_ref, name, kind, area_id, lat, lon, is_hub,
                 mct_air_ground_min, mct_ground_air_min, mct_any_min,
                 country, timezone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                node.id,
                node.external_ref,
                node.name,
                node.kind.as_str(),
                node.area_id,
                node.pos.lat,
                node.pos.lon,
                node.is_hub,
                node.mct_air_ground_min,
                node.mct_ground_air_min,
                node.mct_any_min,
                node.country,
                node.timezone,
            ],
        )?;
        Ok(())
    }

    pub fn insert_edge(&self, edge: &EdgeLeg) -> StoreResult<()> {
        edge.validate()?;
        self.conn.execute(
            "INSERT INTO edge_leg
                (id, from_node, to_node, mode, is_transfer, carrier_code,
                 service_code, distance_km, duration_min, mct_override_min,
                 co_located, structure)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                edge.id,
                edge.from_node,
                edge.to_node,
                edge.mode.as_str(),
                edge.is_transfer,
                edge.carrier_code,
                edge.service_code,
                edge.distance_km,
                edge.duration_min,
                edge.mct_override_min,
                edge.co_located,
                edge.structure.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_offer(&self, offer: &Offer) -> StoreResult<()> {
        offer.validate()?;
        let meta_json = offer
            .meta_json
            .as_ref()
            .map(|v| serde_json::to_string(v))
            .transpose()
            .map_err(|e| StoreError::Corrupted(format!("offer meta_json: {e}")))?;
        self.conn.execute(
            "INSERT INTO offer
                (id, edge_id, departure_time_utc, arrival_time_utc, price_total,
                 currency, source_type, provider, provider_ref, cache_ref,
                 is_static, retrieved_at_utc, validity_window_hrs,
                 effective_from_utc, last_verified_utc, ttl_hrs, is_active,
                 reliability, meta_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                offer.id,
                offer.edge_id,
                format_stamp(offer.departure_utc),
                format_stamp(offer.arrival_utc),
                offer.price_total,
                offer.currency,
                offer.source.as_str(),
                offer.provider,
                offer.provider_ref,
                offer.cache_ref,
                offer.is_static,
                format_stamp(offer.retrieved_at_utc),
                offer.validity_window_hrs,
                offer.effective_from_utc.map(format_stamp),
                offer.last_verified_utc.map(format_stamp),
                offer.ttl_hrs,
                offer.is_active,
                offer.reliability,
                meta_json,
            ],
        )?;
        Ok(())
    }

    /// Persist a finished search result.  Append-only; returns the row id.
    pub fn put_bundle(&self, bundle: &BundleRow) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO itinerary_bundle
                (origin_node_id, dest_node_id, origin_spec_raw, dest_spec_raw,
                 legs_json, price_total, duration_min, num_transfers, main_mode,
                 generalized_cost, search_status, search_params_json,
                 started_at_utc, finished_at_utc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                bundle.origin_node_id,
                bundle.dest_node_id,
                bundle.origin_spec_raw,
                bundle.dest_spec_raw,
                bundle.legs_json,
                bundle.price_total,
                bundle.duration_min,
                bundle.num_transfers,
                bundle.main_mode,
                bundle.generalized_cost,
                bundle.search_status,
                bundle.search_params_json,
                bundle.started_at_utc,
                bundle.finished_at_utc,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch one persisted bundle row by id (tests and tooling).
    pub fn get_bundle(&self, id: i64) -> StoreResult<BundleRow> {
        self.conn
            .query_row(
                "SELECT origin_node_id, dest_node_id, origin_spec_raw,
                        dest_spec_raw, legs_json, price_total, duration_min,
                        num_transfers, main_mode, generalized_cost,
                        search_status, search_params_json, started_at_utc,
                        finished_at_utc
                 FROM itinerary_bundle WHERE id = ?1",
                params![id],
                |row| {
                    Ok(BundleRow {
                        origin_node_id: row.get(0)?,
                        dest_node_id: row.get(1)?,
                        origin_spec_raw: row.get(2)?,
                        dest_spec_raw: row.get(3)?,
                        legs_json: row.get(4)?,
                        price_total: row.get(5)?,
                        duration_min: row.get(6)?,
                        num_transfers: row.get(7)?,
                        main_mode: row.get(8)?,
                        generalized_cost: row.get(9)?,
                        search_status: row.get(10)?,
                        search_params_json: row.get(11)?,
                        started_at_utc: row.get(12)?,
                        finished_at_utc: row.get(13)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from_sqlite)?
            .ok_or_else(|| StoreError::NotFound(format!("itinerary_bundle {id}")))
    }
}
