//! Tax primitives.

use ledgerwright_core::tax::{FiscalPosition, FiscalPositionTax, Tax, TaxBook, TaxCode, TaxPatch};
use ledgerwright_shared::types::{FiscalPositionId, FiscalPositionTaxId, TaxCodeId, TaxId};
use ledgerwright_shared::{AppError, AppResult};

use crate::memory::MemoryStore;

impl TaxBook for MemoryStore {
    fn tax(&self, id: TaxId) -> AppResult<Tax> {
        self.tax_ref(id).cloned()
    }

    fn write_tax(&mut self, id: TaxId, patch: &TaxPatch) -> AppResult<()> {
        if let Some(name) = &patch.name {
            let company_id = self.tax_ref(id)?.company_id;
            self.ensure_unique_tax_name(name, company_id, Some(id))?;
        }
        patch.apply(self.tax_mut(id)?);
        Ok(())
    }

    fn copy_tax(&mut self, id: TaxId, overrides: &TaxPatch) -> AppResult<TaxId> {
        let mut copy = self.tax(id)?;
        copy.id = TaxId::new();
        overrides.apply(&mut copy);
        self.ensure_unique_tax_name(&copy.name, copy.company_id, None)?;
        let new_id = copy.id;
        self.taxes.push(copy);
        Ok(new_id)
    }

    fn active_taxes(&self, ids: &[TaxId]) -> AppResult<Vec<TaxId>> {
        Ok(self
            .taxes
            .iter()
            .filter(|t| t.active && ids.contains(&t.id))
            .map(|t| t.id)
            .collect())
    }

    fn tax_code(&self, id: TaxCodeId) -> AppResult<TaxCode> {
        self.tax_codes
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("tax code", id))
    }

    fn rename_tax_code(&mut self, id: TaxCodeId, name: &str) -> AppResult<()> {
        let code = self
            .tax_codes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("tax code", id))?;
        code.name = name.to_string();
        Ok(())
    }

    fn copy_tax_code(&mut self, id: TaxCodeId, name: &str) -> AppResult<TaxCodeId> {
        let mut copy = self.tax_code(id)?;
        copy.id = TaxCodeId::new();
        copy.name = name.to_string();
        let new_id = copy.id;
        self.tax_codes.push(copy);
        Ok(new_id)
    }

    fn fiscal_position(&self, id: FiscalPositionId) -> AppResult<FiscalPosition> {
        self.fiscal_positions
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("fiscal position", id))
    }

    fn mappings_from(&self, sources: &[TaxId]) -> AppResult<Vec<FiscalPositionTax>> {
        Ok(self
            .fiscal_position_taxes
            .iter()
            .filter(|m| sources.contains(&m.tax_src_id))
            .cloned()
            .collect())
    }

    fn copy_mapping(
        &mut self,
        id: FiscalPositionTaxId,
        tax_src_id: TaxId,
        tax_dest_id: Option<TaxId>,
    ) -> AppResult<FiscalPositionTax> {
        let position_id = self
            .fiscal_position_taxes
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.position_id)
            .ok_or_else(|| AppError::not_found("fiscal position tax", id))?;
        let copy = FiscalPositionTax {
            id: FiscalPositionTaxId::new(),
            position_id,
            tax_src_id,
            tax_dest_id,
        };
        self.fiscal_position_taxes.push(copy.clone());
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use ledgerwright_core::tax::TaxCodeRefs;
    use ledgerwright_shared::types::CompanyId;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_rename_into_taken_name_conflicts() {
        let mut store = MemoryStore::new();
        let company = CompanyId::new();
        let a = store.add_tax(company, "VAT 21%", None, dec!(0.21), TaxCodeRefs::default());
        store.add_tax(company, "VAT 6%", None, dec!(0.06), TaxCodeRefs::default());

        let err = store
            .write_tax(a, &TaxPatch::default().name("VAT 6%"))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        store
            .write_tax(a, &TaxPatch::default().name("VAT 21%").amount(dec!(0.22)))
            .unwrap();
        assert_eq!(store.tax(a).unwrap().amount, dec!(0.22));
    }

    #[test]
    fn test_copy_needs_a_free_name() {
        let mut store = MemoryStore::new();
        let company = CompanyId::new();
        let tax = store.add_tax(company, "VAT 21%", None, dec!(0.21), TaxCodeRefs::default());

        assert!(store.copy_tax(tax, &TaxPatch::default()).is_err());
        let copy = store
            .copy_tax(tax, &TaxPatch::default().name("[new] VAT 21%"))
            .unwrap();
        assert_eq!(store.tax(copy).unwrap().amount, dec!(0.21));
    }

    #[test]
    fn test_active_taxes_skips_archived() {
        let mut store = MemoryStore::new();
        let company = CompanyId::new();
        let a = store.add_tax(company, "A", None, dec!(0.1), TaxCodeRefs::default());
        let b = store.add_tax(company, "B", None, dec!(0.2), TaxCodeRefs::default());
        store.write_tax(b, &TaxPatch::default().active(false)).unwrap();

        assert_eq!(store.active_taxes(&[a, b]).unwrap(), vec![a]);
        assert!(!store.tax(b).unwrap().active);
    }

    #[test]
    fn test_copy_mapping_keeps_position() {
        let mut store = MemoryStore::new();
        let company = CompanyId::new();
        let src = store.add_tax(company, "A", None, dec!(0.1), TaxCodeRefs::default());
        let new = store.add_tax(company, "B", None, dec!(0.1), TaxCodeRefs::default());
        let position = store.add_fiscal_position("Intra-EU");
        let mapping = store.add_mapping(position, src, None);

        let copy = store.copy_mapping(mapping, new, None).unwrap();

        assert_eq!(copy.position_id, position);
        assert_eq!(store.mappings_from(&[new]).unwrap(), vec![copy]);
        assert_eq!(store.fiscal_position_taxes.len(), 2);
    }
}
