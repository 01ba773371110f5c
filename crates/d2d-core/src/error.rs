//! Core error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! via `From` or wrap it as one variant; both patterns appear downstream.

use thiserror::Error;

/// Errors raised by record validation and wire-format parsing in `d2d-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid timestamp `{0}` (expected YYYY-MM-DDTHH:MM:SSZ)")]
    Timestamp(String),

    #[error("unknown {kind} tag `{value}`")]
    UnknownTag { kind: &'static str, value: String },

    #[error("invalid {record}: {reason}")]
    Invariant {
        record: &'static str,
        reason: String,
    },
}

impl CoreError {
    /// Shorthand used by the record `validate()` methods.
    pub(crate) fn invariant(record: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Invariant {
            record,
            reason: reason.into(),
        }
    }
}

/// Shorthand result type for all `d2d-*` crates that only fail on core errors.
pub type CoreResult<T> = Result<T, CoreError>;
