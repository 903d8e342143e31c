//! The in-memory store and its seeding helpers.

use ledgerwright_core::reconcile::{Account, AccountKind, LedgerLine};
use ledgerwright_core::tax::{FiscalPosition, FiscalPositionTax, Tax, TaxCode, TaxCodeRefs};
use ledgerwright_core::tax_update::{
    DefaultValue, FieldDescriptor, FieldKind, TAX_RECORD_TYPE, UpdateTaxConfig,
};
use ledgerwright_shared::types::{
    AccountId, CompanyId, DefaultValueId, FiscalPositionId, FiscalPositionTaxId, JournalId,
    LedgerLineId, MoveId, PartnerId, RecordId, TaxCodeId, TaxId,
};
use ledgerwright_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::{Journal, JournalKind, Move, Reconciliation, TaxedRecord};

/// Every record of one database, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    /// Ledger accounts.
    pub accounts: Vec<Account>,
    /// Journals.
    pub journals: Vec<Journal>,
    /// Journal entries.
    pub moves: Vec<Move>,
    /// Ledger lines.
    pub lines: Vec<LedgerLine>,
    /// Native reconciliations.
    pub reconciliations: Vec<Reconciliation>,
    /// Taxes, active or not.
    pub taxes: Vec<Tax>,
    /// Tax codes.
    pub tax_codes: Vec<TaxCode>,
    /// Fiscal positions.
    pub fiscal_positions: Vec<FiscalPosition>,
    /// Fiscal position tax mappings.
    pub fiscal_position_taxes: Vec<FiscalPositionTax>,
    /// Tax update configurations.
    pub configs: Vec<UpdateTaxConfig>,
    /// Stored default values.
    pub default_values: Vec<DefaultValue>,
    /// Field catalog.
    pub fields: Vec<FieldDescriptor>,
    /// Records holding tax references.
    pub records: Vec<TaxedRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads lines in the given order.
    pub fn lines_by_id(&self, ids: &[LedgerLineId]) -> AppResult<Vec<LedgerLine>> {
        ids.iter()
            .map(|id| {
                self.lines
                    .iter()
                    .find(|l| l.id == *id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("ledger line", id))
            })
            .collect()
    }

    /// Reads a record.
    pub fn record(&self, id: RecordId) -> AppResult<&TaxedRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("record", id))
    }

    pub(crate) fn tax_ref(&self, id: TaxId) -> AppResult<&Tax> {
        self.taxes
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("tax", id))
    }

    pub(crate) fn tax_mut(&mut self, id: TaxId) -> AppResult<&mut Tax> {
        self.taxes
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("tax", id))
    }

    /// Fails if another tax of the company already carries `name`.
    pub(crate) fn ensure_unique_tax_name(
        &self,
        name: &str,
        company_id: CompanyId,
        except: Option<TaxId>,
    ) -> AppResult<()> {
        let taken = self
            .taxes
            .iter()
            .any(|t| t.name == name && t.company_id == company_id && Some(t.id) != except);
        if taken {
            return Err(AppError::Conflict(format!(
                "tax name {name} already exists in company {company_id}"
            )));
        }
        Ok(())
    }

    /// Adds an account.
    pub fn add_account(
        &mut self,
        company_id: CompanyId,
        code: &str,
        name: &str,
        kind: AccountKind,
    ) -> AccountId {
        let id = AccountId::new();
        self.accounts.push(Account {
            id,
            code: code.into(),
            name: name.into(),
            kind,
            company_id,
        });
        id
    }

    /// Adds a journal.
    pub fn add_journal(&mut self, company_id: CompanyId, name: &str, kind: JournalKind) -> JournalId {
        let id = JournalId::new();
        self.journals.push(Journal {
            id,
            name: name.into(),
            kind,
            company_id,
        });
        id
    }

    /// Adds a one-line journal entry, e.g. an invoice's counterpart line.
    pub fn add_line(
        &mut self,
        company_id: CompanyId,
        account_id: AccountId,
        partner_id: Option<PartnerId>,
        name: &str,
        debit: Decimal,
        credit: Decimal,
    ) -> LedgerLineId {
        let move_id = MoveId::new();
        self.moves.push(Move {
            id: move_id,
            name: name.into(),
            partner_id,
            company_id,
            journal_id: None,
        });
        let id = LedgerLineId::new();
        self.lines.push(LedgerLine {
            id,
            move_id,
            account_id,
            partner_id,
            company_id,
            name: name.into(),
            debit,
            credit,
            reconciliation_id: None,
        });
        id
    }

    /// Adds a tax code.
    pub fn add_tax_code(&mut self, company_id: CompanyId, name: &str, code: Option<&str>) -> TaxCodeId {
        let id = TaxCodeId::new();
        self.tax_codes.push(TaxCode {
            id,
            name: name.into(),
            code: code.map(str::to_string),
            company_id,
        });
        id
    }

    /// Adds an active tax.
    pub fn add_tax(
        &mut self,
        company_id: CompanyId,
        name: &str,
        description: Option<&str>,
        amount: Decimal,
        codes: TaxCodeRefs,
    ) -> TaxId {
        let id = TaxId::new();
        self.taxes.push(Tax {
            id,
            name: name.into(),
            description: description.map(str::to_string),
            amount,
            active: true,
            company_id,
            codes,
        });
        id
    }

    /// Adds a fiscal position.
    pub fn add_fiscal_position(&mut self, name: &str) -> FiscalPositionId {
        let id = FiscalPositionId::new();
        self.fiscal_positions.push(FiscalPosition {
            id,
            name: name.into(),
        });
        id
    }

    /// Adds a tax mapping to a fiscal position.
    pub fn add_mapping(
        &mut self,
        position_id: FiscalPositionId,
        tax_src_id: TaxId,
        tax_dest_id: Option<TaxId>,
    ) -> FiscalPositionTaxId {
        let id = FiscalPositionTaxId::new();
        self.fiscal_position_taxes.push(FiscalPositionTax {
            id,
            position_id,
            tax_src_id,
            tax_dest_id,
        });
        id
    }

    /// Declares a field referencing taxes.
    pub fn register_tax_field(&mut self, record_type: &str, field_name: &str) {
        let exists = self
            .fields
            .iter()
            .any(|f| f.record_type == record_type && f.field_name == field_name);
        if !exists {
            self.fields.push(FieldDescriptor {
                record_type: record_type.into(),
                field_name: field_name.into(),
                kind: FieldKind::Relation {
                    target: TAX_RECORD_TYPE.into(),
                    multiple: true,
                },
            });
        }
    }

    /// Adds a record whose `field` holds `taxes`, registering the field.
    pub fn add_record(
        &mut self,
        record_type: &str,
        name: &str,
        field: &str,
        taxes: Vec<TaxId>,
    ) -> RecordId {
        self.register_tax_field(record_type, field);
        let id = RecordId::new();
        self.records.push(TaxedRecord {
            id,
            record_type: record_type.into(),
            name: name.into(),
            active: true,
            taxes: [(field.to_string(), taxes)].into_iter().collect(),
        });
        id
    }

    /// Stores a default value, registering the field.
    pub fn add_default(&mut self, record_type: &str, field: &str, value: String) -> DefaultValueId {
        self.register_tax_field(record_type, field);
        let id = DefaultValueId::new();
        self.default_values.push(DefaultValue {
            id,
            record_type: record_type.into(),
            field: field.into(),
            value,
        });
        id
    }
}
