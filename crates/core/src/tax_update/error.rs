//! Tax update workflow error types.

use ledgerwright_shared::AppError;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::tax_update::types::{ConfigState, TaxUse};

/// Errors that can occur during tax update workflow steps.
#[derive(Debug, Error)]
pub enum TaxUpdateError {
    /// The step needs exactly one target configuration.
    #[error("Expected exactly one configuration, got {0}")]
    ExpectedSingleConfig(usize),

    /// The per-tax-use step was called without a tax use.
    #[error("Can not detect tax use type")]
    MissingTaxUse,

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ConfigState,
        /// The attempted target status.
        to: ConfigState,
    },

    /// Taxes of a tax use are archived only after their defaults moved on.
    #[error("Set the {0} tax defaults before setting the {0} taxes inactive")]
    DefaultsNotSet(TaxUse),

    /// Lines can only change while the configuration is a draft.
    #[error("Configuration lines cannot be changed in status {0}")]
    NotEditable(ConfigState),

    /// The configuration name is used as legacy label and cannot be empty.
    #[error("Configuration name must not be empty")]
    EmptyName,

    /// The record layer failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl TaxUpdateError {
    /// Returns the error code for user-facing reporting.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ExpectedSingleConfig(_) => "EXPECTED_SINGLE_CONFIG",
            Self::MissingTaxUse => "MISSING_TAX_USE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::DefaultsNotSet(_) => "DEFAULTS_NOT_SET",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::EmptyName => "EMPTY_NAME",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(_) => ErrorKind::Collaborator,
            _ => ErrorKind::Precondition,
        }
    }
}
