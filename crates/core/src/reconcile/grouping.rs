//! Partner → account grouping of ledger lines.

use std::collections::HashMap;

use ledgerwright_shared::types::{AccountId, CompanyId, LedgerLineId, PartnerId};
use rust_decimal::Decimal;

use super::book::LedgerBook;
use super::error::ReconcileError;
use super::types::{AccountKind, GroupTotals, LedgerLine};

/// Lines of one partner on one account.
#[derive(Debug, Clone)]
pub struct AccountGroup {
    /// The account.
    pub account_id: AccountId,
    /// The account classification.
    pub kind: AccountKind,
    /// Lines in the group, in selection order, balancing lines last.
    pub lines: Vec<LedgerLineId>,
    /// Debit and credit sums.
    pub totals: GroupTotals,
}

impl AccountGroup {
    fn new(account_id: AccountId, kind: AccountKind) -> Self {
        Self {
            account_id,
            kind,
            lines: Vec::new(),
            totals: GroupTotals::default(),
        }
    }

    /// Adds a line to the group.
    pub fn push(&mut self, line: LedgerLineId, debit: Decimal, credit: Decimal) {
        self.lines.push(line);
        self.totals.add(debit, credit);
    }
}

/// All lines of one partner.
#[derive(Debug, Clone)]
pub struct PartnerGroup {
    /// The partner.
    pub partner_id: PartnerId,
    /// Company of the partner's first line.
    pub company_id: CompanyId,
    /// First payable account seen for the partner.
    pub payable_account: Option<AccountId>,
    /// First receivable account seen for the partner.
    pub receivable_account: Option<AccountId>,
    /// Account groups in first-seen order.
    pub accounts: Vec<AccountGroup>,
}

impl PartnerGroup {
    fn new(partner_id: PartnerId, company_id: CompanyId) -> Self {
        Self {
            partner_id,
            company_id,
            payable_account: None,
            receivable_account: None,
            accounts: Vec::new(),
        }
    }

    /// Returns the group of an account.
    #[must_use]
    pub fn account(&self, account_id: AccountId) -> Option<&AccountGroup> {
        self.accounts.iter().find(|g| g.account_id == account_id)
    }

    /// Returns the group of an account, mutably.
    pub fn account_mut(&mut self, account_id: AccountId) -> Option<&mut AccountGroup> {
        self.accounts.iter_mut().find(|g| g.account_id == account_id)
    }

    /// The account a residual on an account of `kind` is moved to.
    ///
    /// Receivable residuals go to the designated receivable account,
    /// everything else to the designated payable account.
    #[must_use]
    pub fn balancing_target(&self, kind: AccountKind) -> Option<AccountId> {
        match kind {
            AccountKind::Receivable => self.receivable_account,
            _ => self.payable_account,
        }
    }

    fn add_line(&mut self, line: &LedgerLine, kind: AccountKind) {
        match kind {
            AccountKind::Payable if self.payable_account.is_none() => {
                self.payable_account = Some(line.account_id);
            }
            AccountKind::Receivable if self.receivable_account.is_none() => {
                self.receivable_account = Some(line.account_id);
            }
            _ => {}
        }

        let group = match self.accounts.iter().position(|g| g.account_id == line.account_id) {
            Some(index) => &mut self.accounts[index],
            None => {
                self.accounts.push(AccountGroup::new(line.account_id, kind));
                let last = self.accounts.len() - 1;
                &mut self.accounts[last]
            }
        };
        group.push(line.id, line.debit, line.credit);
    }
}

/// Returns true if not every line is on the first line's account.
#[must_use]
pub fn has_mixed_accounts(lines: &[LedgerLine]) -> bool {
    match lines.first() {
        Some(first) => lines.iter().any(|l| l.account_id != first.account_id),
        None => false,
    }
}

/// Groups lines by partner, then by account.
///
/// # Errors
///
/// Returns `ReconcileError::InvalidLineKind` for a line without partner.
pub fn group_by_partner<B: LedgerBook>(
    book: &B,
    lines: &[LedgerLine],
) -> Result<Vec<PartnerGroup>, ReconcileError> {
    let mut kinds: HashMap<AccountId, AccountKind> = HashMap::new();
    let mut partners: Vec<PartnerGroup> = Vec::new();

    for line in lines {
        let partner_id = line
            .partner_id
            .ok_or(ReconcileError::InvalidLineKind(line.id))?;

        let kind = match kinds.get(&line.account_id) {
            Some(kind) => *kind,
            None => {
                let kind = book.account(line.account_id)?.kind;
                kinds.insert(line.account_id, kind);
                kind
            }
        };

        let partner = match partners.iter().position(|p| p.partner_id == partner_id) {
            Some(index) => &mut partners[index],
            None => {
                partners.push(PartnerGroup::new(partner_id, line.company_id));
                let last = partners.len() - 1;
                &mut partners[last]
            }
        };
        partner.add_line(line, kind);
    }

    Ok(partners)
}
