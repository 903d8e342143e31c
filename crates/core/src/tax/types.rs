//! Tax domain types.

use ledgerwright_shared::types::{CompanyId, FiscalPositionId, FiscalPositionTaxId, TaxCodeId, TaxId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tax code: a reporting bucket attached to taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCode {
    /// The tax code ID.
    pub id: TaxCodeId,
    /// Tax code name.
    pub name: String,
    /// Short code, e.g. "1a".
    pub code: Option<String>,
    /// Owning company.
    pub company_id: CompanyId,
}

/// The four tax code references of a tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxCodeSlot {
    /// Base code for invoices.
    BaseCode,
    /// Tax code for invoices.
    TaxCode,
    /// Base code for refunds.
    RefBaseCode,
    /// Tax code for refunds.
    RefTaxCode,
}

impl TaxCodeSlot {
    /// All slots, in the order they are processed.
    pub const ALL: [Self; 4] = [
        Self::RefTaxCode,
        Self::TaxCode,
        Self::RefBaseCode,
        Self::BaseCode,
    ];

    /// Returns the field name of the slot.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::BaseCode => "base_code_id",
            Self::TaxCode => "tax_code_id",
            Self::RefBaseCode => "ref_base_code_id",
            Self::RefTaxCode => "ref_tax_code_id",
        }
    }
}

/// Tax code references of a tax; any slot may be empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCodeRefs {
    /// Base code for invoices.
    pub base_code: Option<TaxCodeId>,
    /// Tax code for invoices.
    pub tax_code: Option<TaxCodeId>,
    /// Base code for refunds.
    pub ref_base_code: Option<TaxCodeId>,
    /// Tax code for refunds.
    pub ref_tax_code: Option<TaxCodeId>,
}

impl TaxCodeRefs {
    /// Returns the tax code in a slot.
    #[must_use]
    pub fn get(&self, slot: TaxCodeSlot) -> Option<TaxCodeId> {
        match slot {
            TaxCodeSlot::BaseCode => self.base_code,
            TaxCodeSlot::TaxCode => self.tax_code,
            TaxCodeSlot::RefBaseCode => self.ref_base_code,
            TaxCodeSlot::RefTaxCode => self.ref_tax_code,
        }
    }

    /// Sets the tax code in a slot.
    pub fn set(&mut self, slot: TaxCodeSlot, code: Option<TaxCodeId>) {
        match slot {
            TaxCodeSlot::BaseCode => self.base_code = code,
            TaxCodeSlot::TaxCode => self.tax_code = code,
            TaxCodeSlot::RefBaseCode => self.ref_base_code = code,
            TaxCodeSlot::RefTaxCode => self.ref_tax_code = code,
        }
    }
}

/// A tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// The tax ID.
    pub id: TaxId,
    /// Tax name; unique per company.
    pub name: String,
    /// Tax code shown on documents.
    pub description: Option<String>,
    /// Rate, e.g. 0.21 for 21%.
    pub amount: Decimal,
    /// Inactive taxes are hidden from selection but keep their history.
    pub active: bool,
    /// Owning company.
    pub company_id: CompanyId,
    /// Linked tax codes.
    #[serde(default)]
    pub codes: TaxCodeRefs,
}

/// Field values written to a tax. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxPatch {
    /// New name.
    pub name: Option<String>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New active flag.
    pub active: Option<bool>,
    /// New tax code references.
    pub codes: Option<TaxCodeRefs>,
}

impl TaxPatch {
    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets the amount.
    #[must_use]
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets the tax code references.
    #[must_use]
    pub fn codes(mut self, codes: TaxCodeRefs) -> Self {
        self.codes = Some(codes);
        self
    }

    /// Applies the patch to a tax.
    pub fn apply(&self, tax: &mut Tax) {
        if let Some(name) = &self.name {
            tax.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            tax.description.clone_from(description);
        }
        if let Some(amount) = self.amount {
            tax.amount = amount;
        }
        if let Some(active) = self.active {
            tax.active = active;
        }
        if let Some(codes) = self.codes {
            tax.codes = codes;
        }
    }
}

/// A fiscal position: rules redirecting taxes for some counterparties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPosition {
    /// The fiscal position ID.
    pub id: FiscalPositionId,
    /// Fiscal position name.
    pub name: String,
}

/// One tax mapping of a fiscal position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPositionTax {
    /// The mapping ID.
    pub id: FiscalPositionTaxId,
    /// Owning fiscal position.
    pub position_id: FiscalPositionId,
    /// Tax being replaced.
    pub tax_src_id: TaxId,
    /// Replacement tax; `None` removes the tax.
    pub tax_dest_id: Option<TaxId>,
}

/// Prefixes a name with a bracketed label, e.g. `[legacy] VAT 21%`.
#[must_use]
pub fn legacy_label(prefix: &str, name: &str) -> String {
    format!("[{prefix}] {name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tax() -> Tax {
        Tax {
            id: TaxId::new(),
            name: "VAT 21%".into(),
            description: Some("21".into()),
            amount: dec!(0.21),
            active: true,
            company_id: CompanyId::new(),
            codes: TaxCodeRefs::default(),
        }
    }

    #[test]
    fn test_patch_leaves_unset_fields_alone() {
        let mut tax = tax();
        TaxPatch::default().amount(dec!(0.19)).apply(&mut tax);
        assert_eq!(tax.amount, dec!(0.19));
        assert_eq!(tax.name, "VAT 21%");
        assert_eq!(tax.description.as_deref(), Some("21"));
    }

    #[test]
    fn test_patch_clears_description() {
        let mut tax = tax();
        TaxPatch::default().description(None).apply(&mut tax);
        assert_eq!(tax.description, None);
    }

    #[test]
    fn test_code_refs_slots() {
        let mut refs = TaxCodeRefs::default();
        let code = TaxCodeId::new();
        refs.set(TaxCodeSlot::RefBaseCode, Some(code));
        assert_eq!(refs.get(TaxCodeSlot::RefBaseCode), Some(code));
        assert_eq!(refs.ref_base_code, Some(code));
        assert_eq!(refs.get(TaxCodeSlot::BaseCode), None);
        assert_eq!(TaxCodeSlot::RefTaxCode.field_name(), "ref_tax_code_id");
    }

    #[test]
    fn test_legacy_label() {
        assert_eq!(legacy_label("2024", "VAT 21%"), "[2024] VAT 21%");
    }
}
