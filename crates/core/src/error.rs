//! Error classification shared by all workflows.

use serde::Serialize;

/// The kind of failure a workflow step ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required parameter or selection was missing or wrong.
    Precondition,
    /// A ledger line cannot be grouped (e.g. it has no partner).
    InvalidLineKind,
    /// A collaborator primitive failed and the failure was passed through.
    Collaborator,
}

impl ErrorKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precondition => "precondition",
            Self::InvalidLineKind => "invalid_line_kind",
            Self::Collaborator => "collaborator",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
