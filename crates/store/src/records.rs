//! Records that only the store knows about.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use ledgerwright_core::reconcile::ReconcileMode;
use ledgerwright_shared::types::{
    CompanyId, JournalId, LedgerLineId, MoveId, PartnerId, RecordId, ReconciliationId, TaxId,
};
use serde::{Deserialize, Serialize};

/// Journal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalKind {
    /// Customer invoices.
    Sale,
    /// Supplier invoices.
    Purchase,
    /// Bank and cash statements.
    Bank,
    /// Miscellaneous operations.
    General,
}

impl JournalKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::Bank => "bank",
            Self::General => "general",
        }
    }
}

impl fmt::Display for JournalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// The journal ID.
    pub id: JournalId,
    /// Journal name.
    pub name: String,
    /// Journal type.
    pub kind: JournalKind,
    /// Owning company.
    pub company_id: CompanyId,
}

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// The move ID.
    pub id: MoveId,
    /// Entry label.
    pub name: String,
    /// Counterparty.
    pub partner_id: Option<PartnerId>,
    /// Owning company.
    pub company_id: CompanyId,
    /// Journal the entry is posted in.
    pub journal_id: Option<JournalId>,
}

/// A native reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// The reconciliation ID.
    pub id: ReconciliationId,
    /// How it was requested.
    pub mode: ReconcileMode,
    /// Reconciled lines, write-off line included.
    pub line_ids: Vec<LedgerLineId>,
    /// When it was made.
    pub created_at: DateTime<Utc>,
}

/// A record holding tax id sets, such as a product or an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxedRecord {
    /// The record ID.
    pub id: RecordId,
    /// Record type, e.g. `product.product`.
    pub record_type: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Archived records keep their references.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Field name → tax ids.
    #[serde(default)]
    pub taxes: BTreeMap<String, Vec<TaxId>>,
}

fn default_active() -> bool {
    true
}
