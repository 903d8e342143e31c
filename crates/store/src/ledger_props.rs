//! Property-based tests for the native reconciliation.
//!
//! - Balanced selections are reconciled as a whole
//! - A difference without write-off account leaves the store untouched
//! - A write-off always closes the difference

use proptest::prelude::*;
use rust_decimal::Decimal;

use ledgerwright_core::reconcile::{AccountKind, LedgerBook, ReconcileRequest, WriteOff};
use ledgerwright_shared::types::{CompanyId, LedgerLineId};

use crate::memory::MemoryStore;

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn post(store: &mut MemoryStore, debits: &[Decimal], credits: &[Decimal]) -> Vec<LedgerLineId> {
    let company = CompanyId::new();
    let account = store.add_account(company, "1100", "Debtors", AccountKind::Receivable);
    let mut ids = Vec::new();
    for debit in debits {
        ids.push(store.add_line(company, account, None, "D", *debit, Decimal::ZERO));
    }
    for credit in credits {
        ids.push(store.add_line(company, account, None, "C", Decimal::ZERO, *credit));
    }
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* amounts booked once as debit and once as credit, the
    /// selection reconciles without write-off.
    #[test]
    fn prop_balanced_selection_reconciles(amounts in prop::collection::vec(positive_amount(), 1..6)) {
        let mut store = MemoryStore::new();
        let ids = post(&mut store, &amounts, &amounts);

        let id = store.reconcile(&ids, &ReconcileRequest::default()).unwrap();

        prop_assert!(store.lines.iter().all(|l| l.reconciliation_id == Some(id)));
        prop_assert_eq!(store.reconciliations.len(), 1);
    }

    /// *For any* unbalanced selection, reconciliation fails without write-off
    /// account and closes the difference with one.
    #[test]
    fn prop_difference_needs_write_off(
        debits in prop::collection::vec(positive_amount(), 1..4),
        credits in prop::collection::vec(positive_amount(), 1..4),
    ) {
        let debit_total: Decimal = debits.iter().sum();
        let credit_total: Decimal = credits.iter().sum();
        prop_assume!(debit_total != credit_total);

        let mut store = MemoryStore::new();
        let ids = post(&mut store, &debits, &credits);
        let before = store.clone();

        prop_assert!(store.reconcile(&ids, &ReconcileRequest::default()).is_err());
        prop_assert_eq!(&store, &before);

        let expense = store.add_account(CompanyId::new(), "4900", "Write-off", AccountKind::Other);
        let request = ReconcileRequest {
            write_off: WriteOff { account_id: Some(expense), ..WriteOff::default() },
            ..ReconcileRequest::default()
        };
        let id = store.reconcile(&ids, &request).unwrap();

        let reconciled: Decimal = store
            .lines
            .iter()
            .filter(|l| l.reconciliation_id == Some(id))
            .map(|l| l.debit - l.credit)
            .sum();
        prop_assert_eq!(reconciled, Decimal::ZERO);
        prop_assert_eq!(store.reconciliations[0].line_ids.len(), ids.len() + 1);
    }
}
