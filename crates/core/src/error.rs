//! Domain error model.

use thiserror::Error;

/// Result type used for record validation.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only raised when a record handed over by the persistence layer is malformed.
/// The analytics themselves never fail on degenerate numbers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. negative quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
