//! Taxes, tax codes and fiscal position mappings.
//!
//! - `types` - Tax records and the field patch written to them
//! - `book` - Tax primitives consumed from the record layer
//! - `duplicator` - Tax copy with shared tax code duplication

pub mod book;
pub mod duplicator;
pub mod types;

pub use book::TaxBook;
pub use duplicator::{DuplicationContext, TaxCodeMap, TaxDuplicator};
pub use types::{
    FiscalPosition, FiscalPositionTax, Tax, TaxCode, TaxCodeRefs, TaxCodeSlot, TaxPatch,
    legacy_label,
};
