//! Persisted schema DDL.
//!
//! Applied idempotently on every [`Store`](crate::Store) open.  Column
//! names and the `api_cache` UNIQUE index are load-bearing for
//! compatibility; timestamps are ISO-8601 UTC `TEXT` throughout.
//! Schema evolution/migration is an external concern and not handled here.

use rusqlite::Connection;

use crate::error::StoreResult;

pub const DDL: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS area (
        id         INTEGER PRIMARY KEY,
        name       TEXT NOT NULL,
        kind       TEXT NOT NULL,
        country    TEXT,
        center_lat REAL NOT NULL,
        center_lon REAL NOT NULL,
        radius_km  REAL NOT NULL CHECK (radius_km > 0),
        parent_id  INTEGER REFERENCES area(id)
    );

    CREATE TABLE IF NOT EXISTS location_node (
        id                 INTEGER PRIMARY KEY,
        external_ref       TEXT,
        name               TEXT NOT NULL,
        kind               TEXT NOT NULL,
        area_id            INTEGER REFERENCES area(id),
        lat                REAL NOT NULL,
        lon                REAL NOT NULL,
        is_hub             INTEGER NOT NULL DEFAULT 0,
        mct_air_ground_min INTEGER NOT NULL DEFAULT 0,
        mct_ground_air_min INTEGER NOT NULL DEFAULT 0,
        mct_any_min        INTEGER NOT NULL DEFAULT 0,
        country            TEXT,
        timezone           TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_location_node_area ON location_node(area_id);

    CREATE TABLE IF NOT EXISTS edge_leg (
        id               INTEGER PRIMARY KEY,
        from_node        INTEGER NOT NULL REFERENCES location_node(id),
        to_node          INTEGER NOT NULL REFERENCES location_node(id),
        mode             TEXT NOT NULL,
        is_transfer      INTEGER NOT NULL DEFAULT 0,
        carrier_code     TEXT,
        service_code     TEXT,
        distance_km      REAL,
        duration_min     INTEGER NOT NULL CHECK (duration_min >= 0),
        mct_override_min INTEGER,
        co_located       INTEGER NOT NULL DEFAULT 0,
        structure        TEXT NOT NULL DEFAULT 'static'
    );

    CREATE TABLE IF NOT EXISTS offer (
        id                  INTEGER PRIMARY KEY,
        edge_id             INTEGER NOT NULL REFERENCES edge_leg(id) ON DELETE CASCADE,
        departure_time_utc  TEXT NOT NULL,
        arrival_time_utc    TEXT NOT NULL,
        price_total         REAL,
        currency            TEXT NOT NULL DEFAULT 'USD',
        source_type         TEXT NOT NULL,
        provider            TEXT NOT NULL,
        provider_ref        TEXT,
        cache_ref           TEXT,
        is_static           INTEGER NOT NULL DEFAULT 0,
        retrieved_at_utc    TEXT NOT NULL,
        validity_window_hrs INTEGER NOT NULL DEFAULT 24,
        effective_from_utc  TEXT,
        last_verified_utc   TEXT,
        ttl_hrs             INTEGER NOT NULL DEFAULT 6,
        is_active           INTEGER NOT NULL DEFAULT 1,
        reliability         REAL,
        meta_json           TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_offer_edge ON offer(edge_id);

    CREATE TABLE IF NOT EXISTS api_cache (
        id                    INTEGER PRIMARY KEY,
        provider              TEXT NOT NULL,
        endpoint              TEXT NOT NULL,
        canonical_params_hash TEXT NOT NULL,
        params_json           TEXT NOT NULL,
        response_json         TEXT NOT NULL,
        created_at_utc        TEXT NOT NULL,
        expires_at_utc        TEXT NOT NULL,
        last_used_at_utc      TEXT,
        hit_count             INTEGER NOT NULL DEFAULT 0
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_api_cache_key
        ON api_cache(provider, endpoint, canonical_params_hash);

    CREATE TABLE IF NOT EXISTS itinerary_bundle (
        id                 INTEGER PRIMARY KEY,
        origin_node_id     INTEGER,
        dest_node_id       INTEGER,
        origin_spec_raw    TEXT NOT NULL,
        dest_spec_raw      TEXT NOT NULL,
        legs_json          TEXT NOT NULL,
        price_total        REAL NOT NULL,
        duration_min       INTEGER NOT NULL,
        num_transfers      INTEGER NOT NULL,
        main_mode          TEXT,
        generalized_cost   REAL,
        search_status      TEXT NOT NULL,
        search_params_json TEXT NOT NULL,
        started_at_utc     TEXT NOT NULL,
        finished_at_utc    TEXT NOT NULL
    );
";

/// Apply the schema to a fresh or existing connection.
pub fn init(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(DDL)?;
    Ok(())
}
