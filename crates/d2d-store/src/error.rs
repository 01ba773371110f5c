//! Store error type.
//!
//! The three kinds mirror how callers must react: `Unavailable` and
//! `Corrupted` are fatal to the search that triggered them; `NotFound` is
//! only an error for keyed lookups that require a row.

use thiserror::Error;

use d2d_core::CoreError;

/// Errors produced by the persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or is locked/busy.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),

    /// A row failed to decode, violated an invariant, or the schema is in
    /// an inconsistent state (including API-cache hash collisions).
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// A keyed lookup matched no row.
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Map a raw SQLite error onto the three store kinds.
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::QueryReturnedNoRows => {
                StoreError::NotFound("query returned no rows".to_owned())
            }
            rusqlite::Error::SqliteFailure(code, _) => match code.code {
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::PermissionDenied => StoreError::Unavailable(err),
                _ => StoreError::Corrupted(err.to_string()),
            },
            _ => StoreError::Corrupted(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::from_sqlite(err)
    }
}

impl From<CoreError> for StoreError {
    /// A persisted row that fails record validation or tag parsing is
    /// corrupted data, not a caller mistake.
    fn from(err: CoreError) -> Self {
        StoreError::Corrupted(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
