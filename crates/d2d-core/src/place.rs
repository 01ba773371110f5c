//! Long-lived reference records: areas and location nodes.
//!
//! Both are read-mostly rows loaded from the store at graph-build time.
//! Synthetic address nodes created by the place normalizer reuse
//! [`LocationNode`] with a negative id and `NodeKind::Address`.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::geo::GeoPoint;
use crate::mode::{AreaKind, NodeKind};

// ── Area ─────────────────────────────────────────────────────────────────────

/// A named geographic region used for city-level origin/destination
/// resolution.  `parent_id` links form a forest (no cycles enforced at the
/// data layer; seeding rejects self-parents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub kind: AreaKind,
    pub country: Option<String>,
    pub center: GeoPoint,
    pub radius_km: f64,
    pub parent_id: Option<i64>,
}

impl Area {
    pub fn validate(&self) -> CoreResult<()> {
        if !self.center.is_valid() {
            return Err(CoreError::invariant(
                "area",
                format!("center {} out of range", self.center),
            ));
        }
        if !(self.radius_km > 0.0) {
            return Err(CoreError::invariant(
                "area",
                format!("radius_km {} must be positive", self.radius_km),
            ));
        }
        if self.parent_id == Some(self.id) {
            return Err(CoreError::invariant("area", "parent references itself"));
        }
        Ok(())
    }
}

// ── LocationNode ─────────────────────────────────────────────────────────────

/// A routable point: airport, station, terminal, hotel, address, area
/// centroid, or point of interest.
///
/// The three minimum-connect-time defaults are reserved in the data model;
/// the current search does not enforce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: i64,
    /// External reference such as `IATA:BOS`.
    pub external_ref: Option<String>,
    pub name: String,
    pub kind: NodeKind,
    /// Owning area, if any.  A node belongs to at most one area.
    pub area_id: Option<i64>,
    pub pos: GeoPoint,
    pub is_hub: bool,
    pub mct_air_ground_min: u32,
    pub mct_ground_air_min: u32,
    pub mct_any_min: u32,
    pub country: Option<String>,
    pub timezone: Option<String>,
}

impl LocationNode {
    pub fn validate(&self) -> CoreResult<()> {
        if !self.pos.is_valid() {
            return Err(CoreError::invariant(
                "location_node",
                format!("position {} out of range", self.pos),
            ));
        }
        Ok(())
    }

    /// Convenience constructor for unpersisted synthetic address nodes.
    pub fn synthetic_address(id: i64, name: impl Into<String>, pos: GeoPoint) -> Self {
        LocationNode {
            id,
            external_ref: None,
            name: name.into(),
            kind: NodeKind::Address,
            area_id: None,
            pos,
            is_hub: false,
            mct_air_ground_min: 0,
            mct_ground_air_min: 0,
            mct_any_min: 0,
            country: None,
            timezone: None,
        }
    }
}
