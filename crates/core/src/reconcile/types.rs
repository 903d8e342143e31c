//! Reconciliation domain types.
//!
//! Ledger lines, accounts and the parameters handed to the native
//! reconciliation primitive.

use ledgerwright_shared::types::{
    AccountId, CompanyId, JournalId, LedgerLineId, MoveId, PartnerId, PeriodId, ReconciliationId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account classification.
///
/// Only `Receivable` and `Payable` get special treatment when balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Aggregation-only account, no postings.
    View,
    /// Regular account.
    Other,
    /// Amounts owed by partners.
    Receivable,
    /// Amounts owed to partners.
    Payable,
    /// Cash and bank.
    Liquidity,
    /// Consolidation account.
    Consolidation,
    /// Closed account.
    Closed,
}

impl AccountKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Other => "other",
            Self::Receivable => "receivable",
            Self::Payable => "payable",
            Self::Liquidity => "liquidity",
            Self::Consolidation => "consolidation",
            Self::Closed => "closed",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" => Some(Self::View),
            "other" => Some(Self::Other),
            "receivable" => Some(Self::Receivable),
            "payable" => Some(Self::Payable),
            "liquidity" => Some(Self::Liquidity),
            "consolidation" => Some(Self::Consolidation),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// Account code, e.g. "1200".
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub kind: AccountKind,
    /// Owning company.
    pub company_id: CompanyId,
}

/// A ledger line: one leg of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// The line ID.
    pub id: LedgerLineId,
    /// The journal entry this line belongs to.
    pub move_id: MoveId,
    /// The account posted to.
    pub account_id: AccountId,
    /// The partner, if any. Required for mixed-account reconciliation.
    pub partner_id: Option<PartnerId>,
    /// Owning company.
    pub company_id: CompanyId,
    /// Line label.
    #[serde(default)]
    pub name: String,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
    /// Native reconciliation this line takes part in, if any.
    #[serde(default)]
    pub reconciliation_id: Option<ReconciliationId>,
}

/// How the native reconciliation was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    /// Automatic reconciliation.
    #[default]
    Auto,
    /// Manual reconciliation by a user.
    Manual,
}

/// Optional write-off parameters for the native reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOff {
    /// Account receiving the write-off amount.
    pub account_id: Option<AccountId>,
    /// Period of the write-off entry.
    pub period_id: Option<PeriodId>,
    /// Journal of the write-off entry.
    pub journal_id: Option<JournalId>,
}

/// Parameters forwarded unchanged to every native reconciliation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// Reconciliation mode.
    pub mode: ReconcileMode,
    /// Write-off parameters.
    pub write_off: WriteOff,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct NewMove {
    /// Partner of the entry.
    pub partner_id: PartnerId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Journal to post in, if one was found.
    pub journal_id: Option<JournalId>,
    /// Entry name.
    pub name: String,
}

/// Input for creating a ledger line.
#[derive(Debug, Clone)]
pub struct NewLedgerLine {
    /// Journal entry the line belongs to.
    pub move_id: MoveId,
    /// Partner of the line.
    pub partner_id: PartnerId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Line label.
    pub name: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Debit and credit sums of a group of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl GroupTotals {
    /// Adds a line's amounts.
    pub fn add(&mut self, debit: Decimal, credit: Decimal) {
        self.debit += debit;
        self.credit += credit;
    }

    /// Returns debit minus credit.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Splits a signed residual into the (debit, credit) pair that cancels it.
///
/// A positive residual (excess debit) is cancelled by a credit and vice versa.
#[must_use]
pub fn offsetting_amounts(residual: Decimal) -> (Decimal, Decimal) {
    if residual > Decimal::ZERO {
        (Decimal::ZERO, residual)
    } else {
        (-residual, Decimal::ZERO)
    }
}

/// Native reconciliation result for one (partner, account) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupResult {
    /// Partner of the group.
    pub partner_id: PartnerId,
    /// Account of the group.
    pub account_id: AccountId,
    /// Lines handed to the native reconciliation.
    pub lines: Vec<LedgerLineId>,
    /// What the native reconciliation returned.
    pub result: ReconciliationId,
}

/// Outcome of a reconciliation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    /// Result of the last native reconciliation performed.
    pub result: ReconciliationId,
    /// Every native reconciliation performed, in call order.
    /// Empty when all lines shared one account and were delegated directly.
    pub groups: Vec<GroupResult>,
    /// Journal entries created to hold balancing lines.
    pub balancing_moves: Vec<MoveId>,
    /// Balancing lines created.
    pub balancing_lines: Vec<LedgerLineId>,
}

impl ReconcileOutcome {
    /// Returns true if the lines were reconciled directly without grouping.
    #[must_use]
    pub fn was_delegated(&self) -> bool {
        self.groups.is_empty()
    }
}
