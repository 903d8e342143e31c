//! Reconciliation error types.

use ledgerwright_shared::AppError;
use ledgerwright_shared::types::LedgerLineId;
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur while reconciling ledger lines.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// No lines were selected.
    #[error("No ledger lines selected for reconciliation")]
    EmptySelection,

    /// A line cannot be grouped by partner.
    #[error("Ledger line {0} has no partner and cannot be grouped")]
    InvalidLineKind(LedgerLineId),

    /// The record layer or the native reconciliation failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl ReconcileError {
    /// Returns the error code for user-facing reporting.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::InvalidLineKind(_) => "INVALID_LINE_KIND",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySelection => ErrorKind::Precondition,
            Self::InvalidLineKind(_) => ErrorKind::InvalidLineKind,
            Self::Store(_) => ErrorKind::Collaborator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_kinds() {
        let err = ReconcileError::InvalidLineKind(LedgerLineId::new());
        assert_eq!(err.error_code(), "INVALID_LINE_KIND");
        assert_eq!(err.kind(), ErrorKind::InvalidLineKind);

        assert_eq!(ReconcileError::EmptySelection.kind(), ErrorKind::Precondition);

        let err = ReconcileError::from(AppError::BusinessRule("already reconciled".into()));
        assert_eq!(err.error_code(), "BUSINESS_RULE_VIOLATION");
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert_eq!(
            err.to_string(),
            "Business rule violation: already reconciled"
        );
    }
}
