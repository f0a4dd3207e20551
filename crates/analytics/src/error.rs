use stockwise_core::DomainError;
use thiserror::Error;

/// Failure of an analytics request.
///
/// Degenerate numbers (empty series, zero prices, flat history) are never errors;
/// they resolve to conservative defaults. Only malformed configuration or input
/// records are rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AnalyticsError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
