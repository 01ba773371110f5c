//! `d2d-search` — minimum-generalized-cost itinerary search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`params`]  | `SearchParams` with the engine defaults                  |
//! | [`cost`]    | generalized-cost evaluator, lower bound, prune predicate |
//! | [`engine`]  | best-first branch-and-bound over the timed graph         |
//! | [`bundle`]  | `ItineraryBundle` result assembly                        |
//! | [`planner`] | end-to-end: normalize → assemble → search → bundle       |
//! | [`error`]   | `SearchError` (fatal failures only)                      |
//!
//! The objective is a scalar **generalized cost**: cash price, travel time
//! valued at a user-chosen hourly rate, and per-transfer/risk penalties, all
//! in currency units.  `NO_FEASIBLE_ROUTE` and budget exhaustion are bundle
//! statuses, never errors.

pub mod bundle;
pub mod cost;
pub mod engine;
pub mod error;
pub mod params;
pub mod planner;

#[cfg(test)]
mod tests;

pub use bundle::{ItineraryBundle, ItineraryLeg};
pub use cost::CostModel;
pub use engine::{ItineraryPath, SearchOutcome, search};
pub use error::{SearchError, SearchResult};
pub use params::SearchParams;
pub use planner::Planner;
