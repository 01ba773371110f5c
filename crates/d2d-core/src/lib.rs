//! `d2d-core` — foundational types for the d2d intermodal routing engine.
//!
//! This crate is a dependency of every other `d2d-*` crate.  It intentionally
//! has no `d2d-*` dependencies and minimal external ones (chrono, serde,
//! thiserror).
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `NodeIdx`, `ArcIdx` — dense graph indexes                 |
//! | [`geo`]   | `GeoPoint`, haversine and pruning-approximation distances |
//! | [`time`]  | ISO-8601 UTC stamp parse/format, minute arithmetic        |
//! | [`mode`]  | `TravelMode`, `NodeKind`, `OfferSource`, … tag enums      |
//! | [`place`] | `Area`, `LocationNode` reference records                  |
//! | [`leg`]   | `EdgeLeg`, `Offer` records                                |
//! | [`error`] | `CoreError`, `CoreResult`                                 |
//!
//! Persisted ids are `i64` database row ids and live on the records.  Dense
//! `u32` indexes from [`ids`] exist only inside an assembled graph and never
//! leak into persisted data.

pub mod error;
pub mod geo;
pub mod ids;
pub mod leg;
pub mod mode;
pub mod place;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{ArcIdx, NodeIdx, SyntheticIds};
pub use leg::{EdgeLeg, Offer};
pub use mode::{AreaKind, EdgeStructure, NodeKind, OfferSource, SearchStatus, TravelMode};
pub use place::{Area, LocationNode};
