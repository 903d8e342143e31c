//! Tax primitives the tax workflows consume from the record layer.

use ledgerwright_shared::AppResult;
use ledgerwright_shared::types::{FiscalPositionId, FiscalPositionTaxId, TaxCodeId, TaxId};

use super::types::{FiscalPosition, FiscalPositionTax, Tax, TaxCode, TaxPatch};

/// Access to taxes, tax codes and fiscal position mappings.
pub trait TaxBook {
    /// Reads a tax, active or not.
    fn tax(&self, id: TaxId) -> AppResult<Tax>;

    /// Writes field values to a tax.
    fn write_tax(&mut self, id: TaxId, patch: &TaxPatch) -> AppResult<()>;

    /// Copies a tax with `overrides` applied.
    fn copy_tax(&mut self, id: TaxId, overrides: &TaxPatch) -> AppResult<TaxId>;

    /// Returns the ids among `ids` of taxes that are still active.
    fn active_taxes(&self, ids: &[TaxId]) -> AppResult<Vec<TaxId>>;

    /// Reads a tax code.
    fn tax_code(&self, id: TaxCodeId) -> AppResult<TaxCode>;

    /// Renames a tax code.
    fn rename_tax_code(&mut self, id: TaxCodeId, name: &str) -> AppResult<()>;

    /// Copies a tax code under a new name.
    fn copy_tax_code(&mut self, id: TaxCodeId, name: &str) -> AppResult<TaxCodeId>;

    /// Reads a fiscal position.
    fn fiscal_position(&self, id: FiscalPositionId) -> AppResult<FiscalPosition>;

    /// Mappings whose source tax is one of `sources`.
    fn mappings_from(&self, sources: &[TaxId]) -> AppResult<Vec<FiscalPositionTax>>;

    /// Copies a mapping with its source and destination replaced.
    fn copy_mapping(
        &mut self,
        id: FiscalPositionTaxId,
        tax_src_id: TaxId,
        tax_dest_id: Option<TaxId>,
    ) -> AppResult<FiscalPositionTax>;
}
