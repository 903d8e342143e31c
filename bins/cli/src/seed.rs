//! Demonstration snapshot for trying the workflows locally.

use ledgerwright_core::reconcile::AccountKind;
use ledgerwright_core::tax::TaxCodeRefs;
use ledgerwright_core::tax_update::{NewConfigLine, TaxUpdateService, TaxUse};
use ledgerwright_shared::types::{CompanyId, PartnerId};
use ledgerwright_store::{JournalKind, MemoryStore};
use rust_decimal::Decimal;
use std::fmt::Write as _;

/// Fills an empty store with one company, a partner with open items on two
/// receivable accounts, and a draft configuration raising two taxes.
pub fn seed_demo(store: &mut MemoryStore) -> anyhow::Result<String> {
    let company = CompanyId::new();
    let partner = Some(PartnerId::new());
    let mut report = String::new();

    store.add_journal(company, "Miscellaneous Operations", JournalKind::General);
    store.add_journal(company, "Sales", JournalKind::Sale);
    let debtors = store.add_account(company, "1100", "Debtors", AccountKind::Receivable);
    let debtors_eu = store.add_account(company, "1110", "Debtors EU", AccountKind::Receivable);
    let lines = [
        store.add_line(company, debtors, partner, "INV/2024/0001", Decimal::new(10_000, 2), Decimal::ZERO),
        store.add_line(company, debtors_eu, partner, "RINV/2024/0001", Decimal::ZERO, Decimal::new(4_000, 2)),
        store.add_line(company, debtors, partner, "BNK/2024/0001", Decimal::ZERO, Decimal::new(6_000, 2)),
    ];
    writeln!(report, "ledger lines:")?;
    for id in lines {
        writeln!(report, "  {id}")?;
    }

    let base = store.add_tax_code(company, "Turnover high rate", Some("1a"));
    let vat = store.add_tax_code(company, "VAT high rate", Some("1a-vat"));
    let codes = TaxCodeRefs {
        base_code: Some(base),
        tax_code: Some(vat),
        ref_base_code: Some(base),
        ref_tax_code: Some(vat),
    };
    let sale = store.add_tax(company, "VAT 19% sales", Some("19S"), Decimal::new(19, 2), codes);
    let purchase = store.add_tax(company, "VAT 19% purchase", Some("19P"), Decimal::new(19, 2), codes);
    let zero = store.add_tax(company, "VAT 0% sales", Some("0S"), Decimal::ZERO, TaxCodeRefs::default());

    let export = store.add_fiscal_position("Export");
    store.add_mapping(export, sale, Some(zero));

    store.add_record("product.product", "Office chair", "taxes_id", vec![sale]);
    store.add_record("product.product", "Desk lamp", "supplier_taxes_id", vec![purchase]);
    store.add_record("product.template", "Office chair", "taxes_id", vec![sale, zero]);
    store.add_record("account.account", "Revenue", "tax_ids", vec![sale]);
    store.add_default("product.product", "taxes_id", serde_json::to_string(&vec![sale])?);
    store.add_default("product.template", "supplier_taxes_id", serde_json::to_string(&purchase)?);

    let config = TaxUpdateService::create_config(store, "VAT 2024", None, true)?;
    for (tax_use, source_tax_id) in [(TaxUse::Sale, sale), (TaxUse::Purchase, purchase)] {
        TaxUpdateService::add_line(
            store,
            config,
            tax_use,
            NewConfigLine {
                source_tax_id,
                amount_new: Some(Decimal::new(21, 2)),
                target_tax_description: None,
            },
        )?;
    }
    writeln!(report, "tax update configuration: {config}")?;

    Ok(report)
}
