//! Geocoding capability.
//!
//! Real geocoding is an external collaborator; the normalizer only needs
//! *some* injected implementation.  [`HashGeocoder`] is the stand-in used
//! when no real geocoder is wired up: it hashes the address into a fixed
//! box around (39, −86), which is deterministic but **non-geographic** —
//! two different addresses on the same street land in unrelated spots.
//! Anything that cares about real-world placement must inject a real
//! implementation.

use rustc_hash::FxHashMap;

use d2d_core::geo::GeoPoint;

/// Injected address → coordinate capability.
///
/// Total by contract: every address maps to *a* coordinate.  Quality is
/// the implementation's problem.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> GeoPoint;
}

// ── HashGeocoder ─────────────────────────────────────────────────────────────

/// Deterministic placeholder geocoder: FNV-1a hash of the address spread
/// over a 1°×1° box centered on (39, −86).
#[derive(Debug, Default, Clone, Copy)]
pub struct HashGeocoder;

impl Geocoder for HashGeocoder {
    fn geocode(&self, address: &str) -> GeoPoint {
        let h = fnv1a(address.as_bytes());
        let lat_part = (h & 0xffff_ffff) as f64 / u32::MAX as f64;
        let lon_part = (h >> 32) as f64 / u32::MAX as f64;
        GeoPoint::new(38.5 + lat_part, -86.5 + lon_part)
    }
}

/// 64-bit FNV-1a.  Stable across platforms and releases, unlike the
/// std hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

// ── FixtureGeocoder ──────────────────────────────────────────────────────────

/// Test geocoder with known address → coordinate fixtures; unknown
/// addresses fall back to the hash stub so the trait stays total.
#[derive(Debug, Default, Clone)]
pub struct FixtureGeocoder {
    fixtures: FxHashMap<String, GeoPoint>,
}

impl FixtureGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: impl Into<String>, pos: GeoPoint) -> Self {
        self.fixtures.insert(address.into(), pos);
        self
    }
}

impl Geocoder for FixtureGeocoder {
    fn geocode(&self, address: &str) -> GeoPoint {
        self.fixtures
            .get(address)
            .copied()
            .unwrap_or_else(|| HashGeocoder.geocode(address))
    }
}
