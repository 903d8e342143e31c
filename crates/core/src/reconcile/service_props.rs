//! Property-based tests for MixedAccountReconciler.
//!
//! - Single-account selections behave exactly like the native reconciliation
//! - One payable plus one receivable account never needs balancing lines
//! - Secondary payable accounts end up balanced

use proptest::prelude::*;
use rust_decimal::Decimal;

use ledgerwright_shared::types::PartnerId;

use super::service::MixedAccountReconciler;
use super::service::tests::{FakeLedger, line};
use super::types::{AccountKind, LedgerLine, ReconcileRequest};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate (debit, credit) legs: exactly one side is non-zero.
fn leg() -> impl Strategy<Value = (Decimal, Decimal)> {
    (positive_amount(), any::<bool>()).prop_map(|(amount, is_debit)| {
        if is_debit {
            (amount, Decimal::ZERO)
        } else {
            (Decimal::ZERO, amount)
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* selection on one account, the outcome is the native result
    /// for the whole selection and nothing else is called.
    #[test]
    fn prop_single_account_matches_native(legs in prop::collection::vec(leg(), 1..8)) {
        let mut book = FakeLedger::default();
        let account = book.add_account(AccountKind::Receivable);
        let partner = Some(PartnerId::new());
        let lines: Vec<LedgerLine> = legs
            .iter()
            .map(|(debit, credit)| line(account, partner, *debit, *credit))
            .collect();

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        prop_assert_eq!(book.calls.len(), 1);
        prop_assert_eq!(&book.calls[0].0, &lines.iter().map(|l| l.id).collect::<Vec<_>>());
        prop_assert_eq!(outcome.result, book.calls[0].1);
        prop_assert!(book.created.is_empty());
    }

    /// *For any* balanced receivable and payable activity of one partner,
    /// no balancing line is created and every group stays balanced.
    #[test]
    fn prop_one_payable_one_receivable_needs_no_balancing(
        receivable_amounts in prop::collection::vec(positive_amount(), 1..5),
        payable_amounts in prop::collection::vec(positive_amount(), 1..5),
    ) {
        let mut book = FakeLedger::default();
        let receivable = book.add_account(AccountKind::Receivable);
        let payable = book.add_account(AccountKind::Payable);
        let partner = Some(PartnerId::new());

        let mut lines = Vec::new();
        for amount in &receivable_amounts {
            lines.push(line(receivable, partner, *amount, Decimal::ZERO));
            lines.push(line(receivable, partner, Decimal::ZERO, *amount));
        }
        for amount in &payable_amounts {
            lines.push(line(payable, partner, Decimal::ZERO, *amount));
            lines.push(line(payable, partner, *amount, Decimal::ZERO));
        }

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        prop_assert!(outcome.balancing_lines.is_empty());
        prop_assert!(book.moves.is_empty());
        prop_assert_eq!(outcome.groups.len(), 2);
        for group in &outcome.groups {
            let (debit, credit) = book.amounts_of(&group.lines, &lines);
            prop_assert_eq!(debit, credit);
        }
    }

    /// *For any* activity over several payable accounts of one partner, every
    /// payable group except the designated one is balanced after step 3.
    #[test]
    fn prop_secondary_payables_are_balanced(
        per_account in prop::collection::vec(prop::collection::vec(leg(), 1..4), 2..5),
    ) {
        let mut book = FakeLedger::default();
        let partner = Some(PartnerId::new());
        let accounts: Vec<_> = per_account
            .iter()
            .map(|_| book.add_account(AccountKind::Payable))
            .collect();

        let mut lines = Vec::new();
        for (account, legs) in accounts.iter().zip(&per_account) {
            for (debit, credit) in legs {
                lines.push(line(*account, partner, *debit, *credit));
            }
        }
        let designated = accounts[0];

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        for group in &outcome.groups {
            let (debit, credit) = book.amounts_of(&group.lines, &lines);
            if group.account_id != designated {
                prop_assert_eq!(debit, credit);
            }
            total_debit += debit;
            total_credit += credit;
        }

        let input_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let input_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        prop_assert_eq!(total_debit - total_credit, input_debit - input_credit);
        prop_assert!(outcome.balancing_moves.len() <= 1);
    }
}
