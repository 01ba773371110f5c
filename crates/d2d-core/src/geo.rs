//! Geographic coordinate type and distance functions.
//!
//! Two distance functions coexist by design:
//!
//! - [`GeoPoint::haversine_km`] — great-circle distance; used wherever the
//!   number feeds a price or a duration (transfer synthesis, radius caps).
//! - [`GeoPoint::approx_km`] — `√(Δlat² + Δlon²) · 111`; a flat-earth
//!   approximation used inside search pruning, where a cheap bound beats an
//!   exact one.

/// Kilometres per degree of latitude (and the flat-earth scale factor).
pub const KM_PER_DEGREE: f64 = 111.0;

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside the valid WGS-84
    /// ranges (`-90 ≤ lat ≤ 90`, `-180 ≤ lon ≤ 180`).
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in kilometres.
    pub fn haversine_km(self, other: GeoPoint) -> f64 {
        const R_KM: f64 = 6_371.0; // mean Earth radius

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R_KM * c
    }

    /// Flat-earth distance approximation in kilometres.
    ///
    /// Cheap enough for the search's inner loop; only ever compared against
    /// other values produced by the same formula.
    #[inline]
    pub fn approx_km(self, other: GeoPoint) -> f64 {
        let d_lat = other.lat - self.lat;
        let d_lon = other.lon - self.lon;
        (d_lat * d_lat + d_lon * d_lon).sqrt() * KM_PER_DEGREE
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
