//! UTC timestamp conventions.
//!
//! # Design
//!
//! Every persisted timestamp in the system is an ISO-8601 UTC string of the
//! exact form `YYYY-MM-DDTHH:MM:SSZ` (second resolution, no offset other
//! than `Z`).  In memory timestamps are `chrono::DateTime<Utc>`; this module
//! owns the conversion in both directions so the wire format is defined in
//! one place.
//!
//! Durations are handled in whole minutes — the resolution of every nominal
//! edge duration and offer pair in the data model.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};

/// The one true persisted timestamp format.
pub const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Width of a dominance bucket in milliseconds (5 minutes).
pub const BUCKET_MS: i64 = 5 * 60 * 1_000;

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_stamp(t: DateTime<Utc>) -> String {
    t.format(STAMP_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DDTHH:MM:SSZ` string into a UTC instant.
pub fn parse_stamp(s: &str) -> CoreResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, STAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| CoreError::Timestamp(s.to_owned()))
}

/// Whole minutes from `from` to `to` (negative if `to` is earlier).
#[inline]
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_minutes()
}

/// Dominance bucket index of an arrival instant:
/// `floor(epoch_millis / 300_000)`.
///
/// `div_euclid` keeps the floor semantics for pre-1970 instants too.
#[inline]
pub fn arrival_bucket(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis().div_euclid(BUCKET_MS)
}
