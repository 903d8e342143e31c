//! Reconciliation of ledger lines spread over several accounts.
//!
//! Lines sharing one account go straight to the native reconciliation.
//! Otherwise lines are grouped per partner and account, residuals on
//! secondary payable/receivable accounts are moved to the partner's
//! designated account with balancing lines, and every group is reconciled
//! natively.

use ledgerwright_shared::AppResult;
use ledgerwright_shared::config::ReconcileConfig;
use ledgerwright_shared::types::{AccountId, CompanyId, JournalId, LedgerLineId, MoveId, PartnerId};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::book::LedgerBook;
use super::error::ReconcileError;
use super::grouping::{PartnerGroup, group_by_partner, has_mixed_accounts};
use super::types::{
    GroupResult, LedgerLine, NewLedgerLine, NewMove, ReconcileOutcome, ReconcileRequest,
    offsetting_amounts,
};

/// Behaviour switches of the reconciler.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Name of the journal entry holding balancing lines.
    pub balancing_move_name: String,
    /// Net opposite residuals of the designated receivable and payable accounts.
    pub net_receivable_payable: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::from(&ReconcileConfig::default())
    }
}

impl From<&ReconcileConfig> for ReconcileOptions {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            balancing_move_name: config.balancing_move_name.clone(),
            net_receivable_payable: config.net_receivable_payable,
        }
    }
}

/// The balancing journal entry of one partner, created on first use.
struct BalancingMove<'a> {
    partner_id: PartnerId,
    company_id: CompanyId,
    journal_id: Option<JournalId>,
    name: &'a str,
    move_id: Option<MoveId>,
    lines: Vec<LedgerLineId>,
}

impl<'a> BalancingMove<'a> {
    fn new(partner: &PartnerGroup, journal_id: Option<JournalId>, name: &'a str) -> Self {
        Self {
            partner_id: partner.partner_id,
            company_id: partner.company_id,
            journal_id,
            name,
            move_id: None,
            lines: Vec::new(),
        }
    }

    fn post<B: LedgerBook>(
        &mut self,
        book: &mut B,
        account_id: AccountId,
        debit: Decimal,
        credit: Decimal,
    ) -> AppResult<LedgerLineId> {
        let move_id = match self.move_id {
            Some(id) => id,
            None => {
                let id = book.create_move(NewMove {
                    partner_id: self.partner_id,
                    company_id: self.company_id,
                    journal_id: self.journal_id,
                    name: self.name.to_string(),
                })?;
                self.move_id = Some(id);
                id
            }
        };

        let line = book.create_line(NewLedgerLine {
            move_id,
            partner_id: self.partner_id,
            account_id,
            company_id: self.company_id,
            name: self.name.to_string(),
            debit,
            credit,
        })?;
        debug!(%account_id, %debit, %credit, "posted balancing line");
        self.lines.push(line);
        Ok(line)
    }

    /// Moves `residual` from `from` to `to`: `from` receives the offsetting
    /// amounts, `to` the mirror image.
    fn transfer<B: LedgerBook>(
        &mut self,
        book: &mut B,
        partner: &mut PartnerGroup,
        from: AccountId,
        to: AccountId,
        residual: Decimal,
    ) -> AppResult<()> {
        let (debit, credit) = offsetting_amounts(residual);
        let from_line = self.post(book, from, debit, credit)?;
        let to_line = self.post(book, to, credit, debit)?;

        if let Some(group) = partner.account_mut(from) {
            group.push(from_line, debit, credit);
        }
        if let Some(group) = partner.account_mut(to) {
            group.push(to_line, credit, debit);
        }
        Ok(())
    }
}

/// Reconciler for ledger lines that may span several accounts.
#[derive(Debug, Clone, Default)]
pub struct MixedAccountReconciler {
    options: ReconcileOptions,
}

impl MixedAccountReconciler {
    /// Creates a reconciler with the given options.
    #[must_use]
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    /// Reconcile a selection of ledger lines.
    ///
    /// 1. If every line shares the first line's account, delegate to the native
    ///    reconciliation and return its result.
    /// 2. Group lines per partner and account; remember the first payable and
    ///    the first receivable account of every partner.
    /// 3. Move each unbalanced group's residual to the partner's designated
    ///    account of the same side with a pair of balancing lines.
    /// 4. Optionally net the designated receivable against the designated payable.
    /// 5. Reconcile every group natively. The outcome's `result` is the last
    ///    native result.
    ///
    /// # Errors
    ///
    /// - `EmptySelection` when `lines` is empty
    /// - `InvalidLineKind` when mixed lines include one without partner
    /// - `Store` when a record primitive or the native reconciliation fails
    pub fn reconcile<B: LedgerBook>(
        &self,
        book: &mut B,
        lines: &[LedgerLine],
        request: &ReconcileRequest,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let first = lines.first().ok_or(ReconcileError::EmptySelection)?;

        if !has_mixed_accounts(lines) {
            let ids: Vec<LedgerLineId> = lines.iter().map(|l| l.id).collect();
            let result = book.reconcile(&ids, request)?;
            return Ok(ReconcileOutcome {
                result,
                groups: Vec::new(),
                balancing_moves: Vec::new(),
                balancing_lines: Vec::new(),
            });
        }

        let mut partners = group_by_partner(book, lines)?;
        let journal_id = book.general_journal(first.company_id)?;

        let mut balancing_moves = Vec::new();
        let mut balancing_lines = Vec::new();
        for partner in &mut partners {
            let mut balancing =
                BalancingMove::new(partner, journal_id, &self.options.balancing_move_name);
            Self::balance_accounts(book, partner, &mut balancing)?;
            if self.options.net_receivable_payable {
                Self::net_receivable_payable(book, partner, &mut balancing)?;
            }
            balancing_moves.extend(balancing.move_id);
            balancing_lines.append(&mut balancing.lines);
        }

        let mut groups = Vec::new();
        for partner in &partners {
            for account in &partner.accounts {
                let result = book.reconcile(&account.lines, request)?;
                groups.push(GroupResult {
                    partner_id: partner.partner_id,
                    account_id: account.account_id,
                    lines: account.lines.clone(),
                    result,
                });
            }
        }

        let result = groups
            .last()
            .map(|g| g.result)
            .ok_or(ReconcileError::EmptySelection)?;
        if groups.len() > 1 {
            warn!(
                groups = groups.len(),
                %result,
                "mixed-account reconciliation reports only the last group's result"
            );
        }
        info!(
            partners = partners.len(),
            groups = groups.len(),
            balancing_lines = balancing_lines.len(),
            "reconciled lines over mixed accounts"
        );

        Ok(ReconcileOutcome {
            result,
            groups,
            balancing_moves,
            balancing_lines,
        })
    }

    /// Step 3: move residuals of non-designated accounts to the designated one.
    fn balance_accounts<B: LedgerBook>(
        book: &mut B,
        partner: &mut PartnerGroup,
        balancing: &mut BalancingMove<'_>,
    ) -> AppResult<()> {
        for index in 0..partner.accounts.len() {
            let group = &partner.accounts[index];
            if group.totals.is_balanced() {
                continue;
            }
            let (account_id, residual) = (group.account_id, group.totals.difference());

            let Some(target) = partner.balancing_target(group.kind) else {
                warn!(
                    partner_id = %partner.partner_id,
                    %account_id,
                    kind = %group.kind,
                    "no designated account to move residual to"
                );
                continue;
            };
            if target == account_id {
                continue;
            }

            balancing.transfer(book, partner, account_id, target, residual)?;
        }
        Ok(())
    }

    /// Step 4: clear what the designated receivable and payable residuals
    /// have in common when they point in opposite directions.
    fn net_receivable_payable<B: LedgerBook>(
        book: &mut B,
        partner: &mut PartnerGroup,
        balancing: &mut BalancingMove<'_>,
    ) -> AppResult<()> {
        let (Some(receivable), Some(payable)) =
            (partner.receivable_account, partner.payable_account)
        else {
            return Ok(());
        };
        let residual_of = |id| {
            partner
                .account(id)
                .map_or(Decimal::ZERO, |g| g.totals.difference())
        };
        let (r, p) = (residual_of(receivable), residual_of(payable));
        if r.is_zero() || p.is_zero() || r.is_sign_positive() == p.is_sign_positive() {
            return Ok(());
        }

        let amount = r.abs().min(p.abs());
        let cleared = if r > Decimal::ZERO { amount } else { -amount };
        balancing.transfer(book, partner, receivable, payable, cleared)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use ledgerwright_shared::AppError;
    use ledgerwright_shared::types::{PartnerId, ReconciliationId};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::reconcile::types::{Account, AccountKind};

    /// In-memory ledger recording every primitive call.
    #[derive(Default)]
    pub(crate) struct FakeLedger {
        pub accounts: HashMap<AccountId, Account>,
        pub journal: Option<JournalId>,
        pub moves: Vec<(MoveId, NewMove)>,
        pub created: Vec<(LedgerLineId, NewLedgerLine)>,
        pub calls: Vec<(Vec<LedgerLineId>, ReconciliationId)>,
        pub reject_native: bool,
    }

    impl FakeLedger {
        pub(crate) fn add_account(&mut self, kind: AccountKind) -> AccountId {
            let id = AccountId::new();
            self.accounts.insert(
                id,
                Account {
                    id,
                    code: format!("{}", self.accounts.len() + 1),
                    name: kind.to_string(),
                    kind,
                    company_id: company(),
                },
            );
            id
        }

        pub(crate) fn amounts_of(&self, lines: &[LedgerLineId], source: &[LedgerLine]) -> (Decimal, Decimal) {
            let mut debit = Decimal::ZERO;
            let mut credit = Decimal::ZERO;
            for id in lines {
                if let Some(line) = source.iter().find(|l| l.id == *id) {
                    debit += line.debit;
                    credit += line.credit;
                } else if let Some((_, line)) = self.created.iter().find(|(l, _)| l == id) {
                    debit += line.debit;
                    credit += line.credit;
                }
            }
            (debit, credit)
        }
    }

    impl LedgerBook for FakeLedger {
        fn account(&self, id: AccountId) -> AppResult<Account> {
            self.accounts
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::not_found("account", id))
        }

        fn general_journal(&self, _company_id: CompanyId) -> AppResult<Option<JournalId>> {
            Ok(self.journal)
        }

        fn create_move(&mut self, input: NewMove) -> AppResult<MoveId> {
            let id = MoveId::new();
            self.moves.push((id, input));
            Ok(id)
        }

        fn create_line(&mut self, input: NewLedgerLine) -> AppResult<LedgerLineId> {
            let id = LedgerLineId::new();
            self.created.push((id, input));
            Ok(id)
        }

        fn reconcile(
            &mut self,
            lines: &[LedgerLineId],
            _request: &ReconcileRequest,
        ) -> AppResult<ReconciliationId> {
            if self.reject_native {
                return Err(AppError::BusinessRule("line already reconciled".into()));
            }
            let id = ReconciliationId::new();
            self.calls.push((lines.to_vec(), id));
            Ok(id)
        }
    }

    pub(crate) fn company() -> CompanyId {
        CompanyId::from_uuid(uuid::Uuid::nil())
    }

    pub(crate) fn line(
        account_id: AccountId,
        partner_id: Option<PartnerId>,
        debit: Decimal,
        credit: Decimal,
    ) -> LedgerLine {
        LedgerLine {
            id: LedgerLineId::new(),
            move_id: MoveId::new(),
            account_id,
            partner_id,
            company_id: company(),
            name: String::new(),
            debit,
            credit,
            reconciliation_id: None,
        }
    }

    #[test]
    fn test_single_account_delegates_directly() {
        let mut book = FakeLedger::default();
        let receivable = book.add_account(AccountKind::Receivable);
        let partner = Some(PartnerId::new());
        let lines = vec![
            line(receivable, partner, dec!(100), dec!(0)),
            line(receivable, None, dec!(0), dec!(100)),
        ];

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        assert!(outcome.was_delegated());
        assert_eq!(book.calls.len(), 1);
        assert_eq!(book.calls[0].0, vec![lines[0].id, lines[1].id]);
        assert_eq!(outcome.result, book.calls[0].1);
        assert!(book.moves.is_empty());
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut book = FakeLedger::default();
        let result =
            MixedAccountReconciler::default().reconcile(&mut book, &[], &ReconcileRequest::default());
        assert!(matches!(result, Err(ReconcileError::EmptySelection)));
    }

    #[test]
    fn test_mixed_line_without_partner_is_invalid() {
        let mut book = FakeLedger::default();
        let receivable = book.add_account(AccountKind::Receivable);
        let payable = book.add_account(AccountKind::Payable);
        let lines = vec![
            line(receivable, Some(PartnerId::new()), dec!(50), dec!(0)),
            line(payable, None, dec!(0), dec!(50)),
        ];

        let result = MixedAccountReconciler::default().reconcile(
            &mut book,
            &lines,
            &ReconcileRequest::default(),
        );

        match result {
            Err(ReconcileError::InvalidLineKind(id)) => assert_eq!(id, lines[1].id),
            other => panic!("expected InvalidLineKind, got {other:?}"),
        }
        assert!(book.calls.is_empty());
    }

    #[test]
    fn test_second_payable_residual_moves_to_designated_payable() {
        let mut book = FakeLedger::default();
        book.journal = Some(JournalId::new());
        let payable_a = book.add_account(AccountKind::Payable);
        let payable_b = book.add_account(AccountKind::Payable);
        let partner = Some(PartnerId::new());
        let lines = vec![
            line(payable_a, partner, dec!(0), dec!(300)),
            line(payable_b, partner, dec!(120), dec!(0)),
            line(payable_a, partner, dec!(180), dec!(0)),
        ];

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        assert_eq!(outcome.balancing_moves.len(), 1);
        assert_eq!(outcome.balancing_lines.len(), 2);
        assert_eq!(book.moves[0].1.journal_id, book.journal);
        assert_eq!(book.moves[0].1.name, "Account Reconcile Balancing");

        let (_, on_b) = &book.created[0];
        assert_eq!(on_b.account_id, payable_b);
        assert_eq!((on_b.debit, on_b.credit), (dec!(0), dec!(120)));
        let (_, on_a) = &book.created[1];
        assert_eq!(on_a.account_id, payable_a);
        assert_eq!((on_a.debit, on_a.credit), (dec!(120), dec!(0)));

        assert_eq!(outcome.groups.len(), 2);
        for group in &outcome.groups {
            let (debit, credit) = book.amounts_of(&group.lines, &lines);
            if group.account_id == payable_b {
                assert_eq!(debit, credit);
            }
        }
        assert_eq!(outcome.result, outcome.groups[1].result);
    }

    #[test]
    fn test_one_payable_one_receivable_creates_no_balancing_lines() {
        let mut book = FakeLedger::default();
        let receivable = book.add_account(AccountKind::Receivable);
        let payable = book.add_account(AccountKind::Payable);
        let partner = Some(PartnerId::new());
        let lines = vec![
            line(receivable, partner, dec!(100), dec!(0)),
            line(payable, partner, dec!(0), dec!(60)),
        ];

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        assert!(outcome.balancing_lines.is_empty());
        assert!(book.moves.is_empty());
        assert_eq!(book.calls.len(), 2);
    }

    #[test]
    fn test_netting_clears_common_part_of_receivable_and_payable() {
        let mut book = FakeLedger::default();
        let receivable = book.add_account(AccountKind::Receivable);
        let payable = book.add_account(AccountKind::Payable);
        let partner = Some(PartnerId::new());
        let lines = vec![
            line(receivable, partner, dec!(100), dec!(0)),
            line(payable, partner, dec!(0), dec!(60)),
        ];
        let reconciler = MixedAccountReconciler::new(ReconcileOptions {
            net_receivable_payable: true,
            ..ReconcileOptions::default()
        });

        let outcome = reconciler
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        assert_eq!(outcome.balancing_lines.len(), 2);
        let (_, on_receivable) = &book.created[0];
        assert_eq!(on_receivable.account_id, receivable);
        assert_eq!(on_receivable.credit, dec!(60));
        let (_, on_payable) = &book.created[1];
        assert_eq!(on_payable.account_id, payable);
        assert_eq!(on_payable.debit, dec!(60));

        let payable_group = outcome
            .groups
            .iter()
            .find(|g| g.account_id == payable)
            .unwrap();
        let (debit, credit) = book.amounts_of(&payable_group.lines, &lines);
        assert_eq!(debit, credit);
    }

    #[test]
    fn test_netting_skips_residuals_on_the_same_side() {
        let mut book = FakeLedger::default();
        let receivable = book.add_account(AccountKind::Receivable);
        let payable = book.add_account(AccountKind::Payable);
        let partner = Some(PartnerId::new());
        let lines = vec![
            line(receivable, partner, dec!(100), dec!(0)),
            line(payable, partner, dec!(40), dec!(0)),
        ];
        let reconciler = MixedAccountReconciler::new(ReconcileOptions {
            net_receivable_payable: true,
            ..ReconcileOptions::default()
        });

        let outcome = reconciler
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        assert!(outcome.balancing_lines.is_empty());
    }

    #[test]
    fn test_other_account_without_designated_payable_is_left_alone() {
        let mut book = FakeLedger::default();
        let receivable = book.add_account(AccountKind::Receivable);
        let other = book.add_account(AccountKind::Other);
        let partner = Some(PartnerId::new());
        let lines = vec![
            line(receivable, partner, dec!(100), dec!(0)),
            line(other, partner, dec!(0), dec!(30)),
        ];

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        assert!(outcome.balancing_lines.is_empty());
        assert_eq!(outcome.groups.len(), 2);
    }

    #[test]
    fn test_native_failure_propagates_unchanged() {
        let mut book = FakeLedger {
            reject_native: true,
            ..FakeLedger::default()
        };
        let receivable = book.add_account(AccountKind::Receivable);
        let payable = book.add_account(AccountKind::Payable);
        let partner = Some(PartnerId::new());
        let lines = vec![
            line(receivable, partner, dec!(10), dec!(0)),
            line(payable, partner, dec!(0), dec!(10)),
        ];

        let result = MixedAccountReconciler::default().reconcile(
            &mut book,
            &lines,
            &ReconcileRequest::default(),
        );

        assert!(matches!(
            result,
            Err(ReconcileError::Store(AppError::BusinessRule(_)))
        ));
    }

    #[test]
    fn test_each_partner_gets_its_own_balancing_move() {
        let mut book = FakeLedger::default();
        let payable_a = book.add_account(AccountKind::Payable);
        let payable_b = book.add_account(AccountKind::Payable);
        let first = Some(PartnerId::new());
        let second = Some(PartnerId::new());
        let lines = vec![
            line(payable_a, first, dec!(0), dec!(10)),
            line(payable_b, first, dec!(5), dec!(0)),
            line(payable_a, second, dec!(0), dec!(20)),
            line(payable_b, second, dec!(7), dec!(0)),
        ];

        let outcome = MixedAccountReconciler::default()
            .reconcile(&mut book, &lines, &ReconcileRequest::default())
            .unwrap();

        assert_eq!(outcome.balancing_moves.len(), 2);
        assert_eq!(outcome.balancing_lines.len(), 4);
        assert_eq!(book.moves[0].1.partner_id, first.unwrap());
        assert_eq!(book.moves[1].1.partner_id, second.unwrap());
        assert_eq!(outcome.groups.len(), 4);
    }
}
