//! `d2d-store` — SQLite persistence for the d2d routing engine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`store`]  | `Store` handle, snapshot reads, lookups, inserts          |
//! | [`rows`]   | raw row structs and row ↔ record conversion               |
//! | [`schema`] | DDL, applied idempotently on open                         |
//! | [`cache`]  | content-addressed API response cache                      |
//! | [`seed`]   | CSV reference-data loading                                |
//! | [`error`]  | `StoreError`, `StoreResult<T>`                            |
//!
//! The graph assembler consumes exactly four reads per build:
//! [`Store::all_nodes`], [`Store::all_edges`], [`Store::active_offers`],
//! and (through the normalizer) [`Store::areas_by_name`] /
//! [`Store::nodes_in_area`].  Writes go to the API cache and the
//! append-only itinerary-bundle table.

pub mod cache;
pub mod error;
pub mod rows;
pub mod schema;
pub mod seed;
pub mod store;


pub use cache::{canonical_params, params_hash};
pub use error::{StoreError, StoreResult};
pub use rows::BundleRow;
pub use store::Store;
