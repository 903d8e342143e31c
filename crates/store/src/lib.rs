//! Record layer for Ledgerwright.
//!
//! This crate provides:
//! - An in-memory store of ledger, tax and configuration records
//! - Implementations of the collaborator traits consumed by the core workflows
//! - JSON snapshots of the whole store

pub mod configs;
pub mod ledger;
pub mod memory;
pub mod records;
pub mod snapshot;
pub mod taxes;

#[cfg(test)]
mod ledger_props;

pub use memory::MemoryStore;
pub use records::{Journal, JournalKind, Move, Reconciliation, TaxedRecord};
