//! Reconciliation of ledger lines spread over several accounts.
//!
//! This module implements:
//! - Domain types for lines, accounts and native reconciliation parameters
//! - The ledger primitives consumed from the record layer
//! - Partner → account grouping
//! - The mixed-account reconciler
//! - Error types for reconciliation

pub mod book;
pub mod error;
pub mod grouping;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use book::LedgerBook;
pub use error::ReconcileError;
pub use grouping::{AccountGroup, PartnerGroup, group_by_partner, has_mixed_accounts};
pub use service::{MixedAccountReconciler, ReconcileOptions};
pub use types::{
    Account, AccountKind, GroupResult, GroupTotals, LedgerLine, NewLedgerLine, NewMove,
    ReconcileMode, ReconcileOutcome, ReconcileRequest, WriteOff,
};
