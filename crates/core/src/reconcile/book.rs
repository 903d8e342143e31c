//! Ledger primitives the reconciler consumes from the record layer.

use ledgerwright_shared::AppResult;
use ledgerwright_shared::types::{
    AccountId, CompanyId, JournalId, LedgerLineId, MoveId, ReconciliationId,
};

use super::types::{Account, NewLedgerLine, NewMove, ReconcileRequest};

/// Access to accounts, journal entries and the native reconciliation.
pub trait LedgerBook {
    /// Reads an account.
    fn account(&self, id: AccountId) -> AppResult<Account>;

    /// Finds the general (miscellaneous) journal of a company.
    fn general_journal(&self, company_id: CompanyId) -> AppResult<Option<JournalId>>;

    /// Creates a journal entry.
    fn create_move(&mut self, input: NewMove) -> AppResult<MoveId>;

    /// Creates a ledger line.
    fn create_line(&mut self, input: NewLedgerLine) -> AppResult<LedgerLineId>;

    /// Native reconciliation of lines that all share one account.
    fn reconcile(
        &mut self,
        lines: &[LedgerLineId],
        request: &ReconcileRequest,
    ) -> AppResult<ReconciliationId>;
}
