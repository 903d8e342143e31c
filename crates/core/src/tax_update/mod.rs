//! Replacement of taxes by copies with a new amount.
//!
//! This module implements:
//! - Configuration, line and status types
//! - Record-layer primitives for configurations, defaults and references
//! - Old → new tax id substitution
//! - The audit log kept on a configuration
//! - The confirm / set defaults / set inactive workflow
//! - Error types for the workflow

pub mod audit;
pub mod collaborators;
pub mod error;
pub mod remap;
pub mod service;
pub mod types;

#[cfg(test)]
mod remap_props;

pub use audit::AuditLog;
pub use collaborators::{
    ConfigBook, DefaultValue, DefaultValueStore, FieldDescriptor, FieldKind, SchemaCatalog,
    TAX_RECORD_TYPE, TaxReference, TaxReferenceIndex,
};
pub use error::TaxUpdateError;
pub use remap::{DefaultPayload, TaxMap, rewrite_default};
pub use service::TaxUpdateService;
pub use types::{
    ActionContext, ConfigLineView, ConfigState, NewConfigLine, StepOutcome, TaxUse,
    UpdateTaxConfig, UpdateTaxConfigLine, is_sentinel_amount, resolve_new_amount,
};
