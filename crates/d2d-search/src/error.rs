//! Search error type.
//!
//! Only fatal failures live here: persistence problems during the graph
//! build and normalization failures before it.  `NO_FEASIBLE_ROUTE` and
//! budget exhaustion are carried on the bundle's `search_status`, never as
//! errors.

use thiserror::Error;

use d2d_places::PlaceError;
use d2d_store::StoreError;

/// Fatal failures of the end-to-end planner.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Place(#[from] PlaceError),
}

pub type SearchResult<T> = Result<T, SearchError>;
