//! Command-line parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ledgerwright_core::reconcile::{ReconcileMode, ReconcileRequest, WriteOff};
use ledgerwright_core::tax_update::TaxUse;
use ledgerwright_shared::types::{AccountId, JournalId, LedgerLineId, TaxId, UpdateConfigId};

#[derive(Debug, Parser)]
#[command(name = "ledgerwright", about = "Run reconciliation and tax update steps on a snapshot")]
pub struct Cli {
    /// JSON snapshot read before and written after the command
    pub snapshot: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

/// A step to run against the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Reconcile ledger lines, possibly over several accounts
    Reconcile(ReconcileArgs),
    /// Create the replacement taxes of a configuration
    Confirm { config: UpdateConfigId },
    /// Rewrite defaults and references of one tax use
    SetDefaults {
        config: UpdateConfigId,
        #[arg(value_parser = parse_tax_use)]
        tax_use: TaxUse,
    },
    /// Deactivate the replaced taxes of one tax use
    SetInactive {
        config: UpdateConfigId,
        #[arg(value_parser = parse_tax_use)]
        tax_use: TaxUse,
    },
    /// Copy a single tax
    CopyTax {
        tax: TaxId,
        name: String,
        /// Duplicate the tax codes and mark the originals as legacy
        #[arg(long)]
        duplicate_codes: bool,
    },
    /// Write a demonstration snapshot
    SeedDemo,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ReconcileArgs {
    /// Record the native reconciliation as manual
    #[arg(long)]
    pub manual: bool,
    /// Account receiving a remaining difference
    #[arg(long, value_name = "ACCOUNT_ID")]
    pub write_off: Option<AccountId>,
    /// Journal of the write-off entry
    #[arg(long, value_name = "JOURNAL_ID")]
    pub write_off_journal: Option<JournalId>,
    #[arg(required = true, value_name = "LINE_ID")]
    pub lines: Vec<LedgerLineId>,
}

impl ReconcileArgs {
    /// Parameters forwarded to every native reconciliation.
    pub fn request(&self) -> ReconcileRequest {
        ReconcileRequest {
            mode: if self.manual {
                ReconcileMode::Manual
            } else {
                ReconcileMode::Auto
            },
            write_off: WriteOff {
                account_id: self.write_off,
                period_id: None,
                journal_id: self.write_off_journal,
            },
        }
    }
}

fn parse_tax_use(value: &str) -> Result<TaxUse, String> {
    TaxUse::parse(value).ok_or_else(|| format!("invalid tax use: {value} (sale|purchase)"))
}
