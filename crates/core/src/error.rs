//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures (validation, malformed
/// identifiers). Request-time outcomes such as "unknown region" have their own
/// error types in the crates that produce them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A locale tag could not be parsed.
    #[error("invalid locale tag: {0}")]
    InvalidLocale(String),

    /// A currency code was not a 3-letter ISO 4217 style code.
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_locale(msg: impl Into<String>) -> Self {
        Self::InvalidLocale(msg.into())
    }

    pub fn invalid_currency(msg: impl Into<String>) -> Self {
        Self::InvalidCurrency(msg.into())
    }
}
