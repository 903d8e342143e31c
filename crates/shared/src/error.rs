//! Collaborator error types.
//!
//! Every record primitive (create, search, write, copy, native reconcile)
//! fails with an `AppError`. Business logic passes these through unchanged.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by the record layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Field value rejected by the record layer.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g. native reconciliation invariants).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for user-facing reporting.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Shorthand for a missing record of the given kind.
    #[must_use]
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{kind} {id}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
