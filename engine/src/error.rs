//! Error types for the namedraw engine.

use crate::session::{Rejection, SessionState};
use thiserror::Error;

/// All possible errors from the namedraw engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Precondition errors
    #[error("draw rejected: {0}")]
    Rejected(Rejection),

    // Store errors
    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("duplicate name in pool: {0}")]
    DuplicateName(String),

    // Configuration errors
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    // Internal consistency faults
    #[error("carousel window invariant violated: {0}")]
    WindowInvariant(String),

    #[error("invalid session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::RecordNotFound("Alice".into());
        assert_eq!(err.to_string(), "record not found: Alice");

        let err = Error::Rejected(Rejection::AllDrawn);
        assert_eq!(err.to_string(), "draw rejected: all items have been drawn");

        let err = Error::InvalidTransition {
            from: SessionState::Idle,
            to: SessionState::Done,
        };
        assert_eq!(
            err.to_string(),
            "invalid session transition from Idle to Done"
        );
    }
}
