//! Ledger primitives: accounts, journal entries and native reconciliation.

use chrono::Utc;
use ledgerwright_core::reconcile::{
    Account, LedgerBook, LedgerLine, NewLedgerLine, NewMove, ReconcileRequest,
};
use ledgerwright_shared::types::{
    AccountId, CompanyId, JournalId, LedgerLineId, MoveId, ReconciliationId,
};
use ledgerwright_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::debug;

use crate::memory::MemoryStore;
use crate::records::{JournalKind, Move, Reconciliation};

/// Label of the line absorbing a reconciliation difference.
const WRITE_OFF_LABEL: &str = "Write-Off";

impl LedgerBook for MemoryStore {
    fn account(&self, id: AccountId) -> AppResult<Account> {
        self.accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("account", id))
    }

    fn general_journal(&self, company_id: CompanyId) -> AppResult<Option<JournalId>> {
        Ok(self
            .journals
            .iter()
            .find(|j| j.company_id == company_id && j.kind == JournalKind::General)
            .map(|j| j.id))
    }

    fn create_move(&mut self, input: NewMove) -> AppResult<MoveId> {
        let id = MoveId::new();
        self.moves.push(Move {
            id,
            name: input.name,
            partner_id: Some(input.partner_id),
            company_id: input.company_id,
            journal_id: input.journal_id,
        });
        Ok(id)
    }

    fn create_line(&mut self, input: NewLedgerLine) -> AppResult<LedgerLineId> {
        if !self.moves.iter().any(|m| m.id == input.move_id) {
            return Err(AppError::not_found("move", input.move_id));
        }
        self.account(input.account_id)?;
        if input.debit < Decimal::ZERO || input.credit < Decimal::ZERO {
            return Err(AppError::Validation(
                "debit and credit must not be negative".into(),
            ));
        }
        let id = LedgerLineId::new();
        self.lines.push(LedgerLine {
            id,
            move_id: input.move_id,
            account_id: input.account_id,
            partner_id: Some(input.partner_id),
            company_id: input.company_id,
            name: input.name,
            debit: input.debit,
            credit: input.credit,
            reconciliation_id: None,
        });
        Ok(id)
    }

    /// Lines must share one account and be unreconciled. A difference is
    /// only accepted with a write-off account, which receives the
    /// counterpart on a line of its own entry.
    fn reconcile(
        &mut self,
        lines: &[LedgerLineId],
        request: &ReconcileRequest,
    ) -> AppResult<ReconciliationId> {
        let selected = self.lines_by_id(lines)?;
        let first = selected
            .first()
            .ok_or_else(|| AppError::Validation("nothing to reconcile".into()))?;
        if selected.iter().any(|l| l.account_id != first.account_id) {
            return Err(AppError::BusinessRule(
                "entries are not of the same account".into(),
            ));
        }
        if let Some(line) = selected.iter().find(|l| l.reconciliation_id.is_some()) {
            return Err(AppError::BusinessRule(format!(
                "ledger line {} is already reconciled",
                line.id
            )));
        }

        let difference: Decimal = selected.iter().map(|l| l.debit - l.credit).sum();
        let mut line_ids = lines.to_vec();
        if !difference.is_zero() {
            let Some(write_off_account) = request.write_off.account_id else {
                return Err(AppError::BusinessRule(format!(
                    "a write-off account is required to reconcile a difference of {difference}"
                )));
            };
            line_ids.push(self.post_write_off(first, write_off_account, request, difference)?);
        }

        let id = ReconciliationId::new();
        for line in self.lines.iter_mut().filter(|l| line_ids.contains(&l.id)) {
            line.reconciliation_id = Some(id);
        }
        self.reconciliations.push(Reconciliation {
            id,
            mode: request.mode,
            line_ids,
            created_at: Utc::now(),
        });
        debug!(reconciliation = %id, lines = lines.len(), "reconciled natively");
        Ok(id)
    }
}

impl MemoryStore {
    /// Posts a write-off entry clearing `difference` on the reconciled
    /// account. Returns the line on the reconciled account.
    fn post_write_off(
        &mut self,
        first: &LedgerLine,
        write_off_account: AccountId,
        request: &ReconcileRequest,
        difference: Decimal,
    ) -> AppResult<LedgerLineId> {
        let move_id = MoveId::new();
        self.moves.push(Move {
            id: move_id,
            name: WRITE_OFF_LABEL.into(),
            partner_id: first.partner_id,
            company_id: first.company_id,
            journal_id: request.write_off.journal_id,
        });

        let (debit, credit) = if difference > Decimal::ZERO {
            (Decimal::ZERO, difference)
        } else {
            (-difference, Decimal::ZERO)
        };
        let mut post = |account_id, debit, credit| {
            let id = LedgerLineId::new();
            self.lines.push(LedgerLine {
                id,
                move_id,
                account_id,
                partner_id: first.partner_id,
                company_id: first.company_id,
                name: WRITE_OFF_LABEL.into(),
                debit,
                credit,
                reconciliation_id: None,
            });
            id
        };
        let closing = post(first.account_id, debit, credit);
        post(write_off_account, credit, debit);
        Ok(closing)
    }
}
