//! `d2d-places` — resolve free-form origin/destination strings.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`normalize`] | `Normalizer`, `PlaceSpec`, `Resolution`, matcher      |
//! | [`geocode`]   | `Geocoder` capability, hash stub, test fixtures       |
//! | [`error`]     | `PlaceError`, `PlaceResult<T>`                        |
//!
//! # Resolution rules
//!
//! | Input shape                     | Result                              |
//! |---------------------------------|-------------------------------------|
//! | `address:<text>`                | one synthetic address node          |
//! | `hotel … near <X>` (any case)   | Hotel-kind nodes of area `<X>`      |
//! | `hotel …` without a known area  | address fallback                    |
//! | fuzzy area-name match           | all nodes of the first area by id   |
//! | anything else                   | address fallback                    |
//!
//! Normalization happens before any graph load; its errors short-circuit
//! the search.

pub mod error;
pub mod geocode;
pub mod normalize;


pub use error::{PlaceError, PlaceResult};
pub use geocode::{FixtureGeocoder, Geocoder, HashGeocoder};
pub use normalize::{DestinationMatcher, Normalizer, PlaceSpec, Resolution};
