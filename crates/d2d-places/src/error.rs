//! Normalization error type.

use thiserror::Error;

use d2d_store::StoreError;

/// Errors produced while resolving an origin/destination string.
///
/// All of these surface to the caller before any graph load happens.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// Strict resolution refused to tie-break between multiple area
    /// candidates.
    #[error("area name `{pattern}` is ambiguous between ids {candidates:?}")]
    AmbiguousArea {
        pattern: String,
        candidates: Vec<i64>,
    },

    /// An area matched but holds no usable nodes (no nodes at all, or no
    /// hotels for a hotel query).
    #[error("area `{area_name}` (id {area_id}) has no matching nodes")]
    EmptyArea { area_id: i64, area_name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type PlaceResult<T> = Result<T, PlaceError>;
