//! Domain error types.

use thiserror::Error;

/// Errors raised by domain operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced business or version does not exist or is outside the
    /// caller's business scope.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot delete the active design version")]
    CannotDeleteActiveVersion,

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store returned an error.
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl DomainError {
    pub fn not_found(what: &str) -> Self {
        DomainError::NotFound(format!("{} not found", what))
    }

    pub fn upstream(err: impl std::fmt::Display) -> Self {
        DomainError::Upstream(err.to_string())
    }
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
