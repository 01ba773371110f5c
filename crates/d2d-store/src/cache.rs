//! Content-addressed, TTL-bounded cache of provider responses.
//!
//! Entries are keyed by `(provider, endpoint, sha256(canonical params))`.
//! Canonicalization sorts object keys lexicographically at every nesting
//! level, so permuting a params object never changes its hash.
//!
//! Cache failures must never take down a search: callers on the degraded
//! path use [`Store::cache_lookup`], which turns any store error into a
//! logged miss.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};

use d2d_core::time::format_stamp;

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

// ── Canonical params ─────────────────────────────────────────────────────────

/// Serialize a JSON value with object keys sorted lexicographically,
/// recursively.  This is the hashing wire format; it is not meant to be
/// pretty.
pub fn canonical_params(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &serde_json::Value, out: &mut String) {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Keys serialize through Value so escaping matches values.
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Lowercase hex sha256 of the canonical serialization.
pub fn params_hash(value: &serde_json::Value) -> String {
    use std::fmt::Write as _;

    let mut hasher = Sha256::new();
    hasher.update(canonical_params(value).as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

// ── Cache operations ─────────────────────────────────────────────────────────

impl Store {
    /// Look up a cached response body.
    ///
    /// On any hit (fresh or expired) the row's `hit_count` and
    /// `last_used_at_utc` are bumped in a single UPDATE; the body is
    /// returned only while `now < expires_at_utc`.
    pub fn cache_get(
        &self,
        provider: &str,
        endpoint: &str,
        request_params: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<String>> {
        let hash = params_hash(request_params);

        let hit: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT id, response_json, expires_at_utc
                 FROM api_cache
                 WHERE provider = ?1 AND endpoint = ?2 AND canonical_params_hash = ?3",
                params![provider, endpoint, hash],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(StoreError::from_sqlite)?;

        let Some((id, body, expires_at)) = hit else {
            return Ok(None);
        };

        self.conn.execute(
            "UPDATE api_cache
             SET hit_count = hit_count + 1, last_used_at_utc = ?2
             WHERE id = ?1",
            params![id, format_stamp(now)],
        )?;

        let expires = d2d_core::time::parse_stamp(&expires_at)?;
        if now < expires {
            Ok(Some(body))
        } else {
            Ok(None)
        }
    }

    /// Insert (or refresh) a cached response.
    ///
    /// A key conflict whose stored `params_json` differs from the incoming
    /// canonical serialization is a hash collision — treated as corruption,
    /// since sha256 collisions do not happen to honest data.
    pub fn cache_put(
        &self,
        provider: &str,
        endpoint: &str,
        request_params: &serde_json::Value,
        response_body: &str,
        ttl_hours: i64,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let canonical = canonical_params(request_params);
        let hash = params_hash(request_params);
        let expires = now + Duration::hours(ttl_hours);

        let existing: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, params_json FROM api_cache
                 WHERE provider = ?1 AND endpoint = ?2 AND canonical_params_hash = ?3",
                params![provider, endpoint, hash],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(StoreError::from_sqlite)?;

        match existing {
            Some((_, stored_params)) if stored_params != canonical => {
                Err(StoreError::Corrupted(format!(
                    "api_cache hash collision on {provider}/{endpoint} ({hash})"
                )))
            }
            Some((id, _)) => {
                self.conn.execute(
                    "UPDATE api_cache
                     SET response_json = ?2, created_at_utc = ?3, expires_at_utc = ?4
                     WHERE id = ?1",
                    params![id, response_body, format_stamp(now), format_stamp(expires)],
                )?;
                Ok(())
            }
            None => {
                self.conn.execute(
                    "INSERT INTO api_cache
                        (provider, endpoint, canonical_params_hash, params_json,
                         response_json, created_at_utc, expires_at_utc,
                         last_used_at_utc, hit_count)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, 0)",
                    params![
                        provider,
                        endpoint,
                        hash,
                        canonical,
                        response_body,
                        format_stamp(now),
                        format_stamp(expires),
                    ],
                )?;
                Ok(())
            }
        }
    }

    /// Degraded-path lookup: any store error becomes a logged miss.
    pub fn cache_lookup(
        &self,
        provider: &str,
        endpoint: &str,
        request_params: &serde_json::Value,
    ) -> Option<String> {
        match self.cache_get(provider, endpoint, request_params, Utc::now()) {
            Ok(hit) => hit,
            Err(why) => {
                log::warn!("api cache degraded to miss for {provider}/{endpoint}: {why}");
                None
            }
        }
    }
}

/// Default TTL for cached provider responses.
pub const DEFAULT_TTL_HOURS: i64 = 6;
