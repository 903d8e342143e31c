//! Core business logic for Ledgerwright.
//!
//! This crate contains pure business rules with ZERO storage dependencies.
//! Records are reached through collaborator traits implemented by the host
//! record layer (see `ledgerwright-store` for the in-memory one).
//!
//! # Modules
//!
//! - `reconcile` - Reconciliation of ledger lines spread over several accounts
//! - `tax` - Tax records, tax codes and the tax duplicator
//! - `tax_update` - Guided workflow replacing taxes and remapping their references

pub mod error;
pub mod reconcile;
pub mod tax;
pub mod tax_update;

pub use error::ErrorKind;
