//! Engine error taxonomy.
//!
//! Validation/NotFound/Conflict carry a precise, stable reason that is safe
//! to show to callers. Upstream and Internal failures are logged where they
//! occur and collapsed to opaque messages at the API boundary.

use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Malformed input or an unmet business precondition (e.g. fewer than
    /// two active teams).
    Validation(String),
    /// League/team/match missing.
    NotFound(String),
    /// Operation collides with current state (duplicate start, fixtures
    /// already generated).
    Conflict(String),
    /// The external payment-status service was unreachable or errored.
    /// Callers on the enrollment paths downgrade this to "not paid".
    Upstream(String),
    /// Unexpected storage-layer failure.
    Internal(anyhow::Error),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        EngineError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        EngineError::Conflict(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        EngineError::Upstream(msg.into())
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "validation error: {}", msg),
            EngineError::NotFound(msg) => write!(f, "not found: {}", msg),
            EngineError::Conflict(msg) => write!(f, "conflict: {}", msg),
            EngineError::Upstream(msg) => write!(f, "upstream error: {}", msg),
            EngineError::Internal(err) => write!(f, "internal error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Internal(err)
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Internal(err.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_reason() {
        let err = EngineError::conflict("fixtures already generated");
        assert_eq!(err.to_string(), "conflict: fixtures already generated");
    }

    #[test]
    fn test_sqlite_errors_become_internal() {
        let err: EngineError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, EngineError::Internal(_)));
    }
}
