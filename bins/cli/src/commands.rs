//! Runs one parsed command against a store.

use ledgerwright_core::reconcile::{MixedAccountReconciler, ReconcileOptions};
use ledgerwright_core::tax::{DuplicationContext, TaxDuplicator, TaxPatch};
use ledgerwright_core::tax_update::{ActionContext, ConfigBook, StepOutcome, TaxUpdateService};
use ledgerwright_shared::AppConfig;
use ledgerwright_store::MemoryStore;
use serde_json::json;
use tracing::info;

use crate::args::Command;
use crate::seed::seed_demo;

/// Executes a command and returns the report to print.
pub fn execute(
    store: &mut MemoryStore,
    command: Command,
    config: &AppConfig,
) -> anyhow::Result<String> {
    match command {
        Command::Reconcile(args) => {
            let selected = store.lines_by_id(&args.lines)?;
            let reconciler =
                MixedAccountReconciler::new(ReconcileOptions::from(&config.reconcile));
            let outcome = reconciler.reconcile(store, &selected, &args.request())?;
            Ok(serde_json::to_string_pretty(&outcome)?)
        }
        Command::Confirm { config: id } => {
            let outcome = TaxUpdateService::confirm(store, &[id])?;
            step_report(store, &outcome)
        }
        Command::SetDefaults {
            config: id,
            tax_use,
        } => {
            let outcome = TaxUpdateService::set_defaults(
                store,
                &[id],
                &ActionContext::for_tax_use(tax_use),
                &config.tax_update.reference_fields,
            )?;
            step_report(store, &outcome)
        }
        Command::SetInactive {
            config: id,
            tax_use,
        } => {
            let outcome =
                TaxUpdateService::set_inactive(store, &[id], &ActionContext::for_tax_use(tax_use))?;
            step_report(store, &outcome)
        }
        Command::CopyTax {
            tax,
            name,
            duplicate_codes,
        } => {
            let mut ctx = duplicate_codes
                .then(|| DuplicationContext::new(config.tax_update.default_legacy_prefix.clone()));
            let copy =
                TaxDuplicator::copy_tax(store, tax, &TaxPatch::default().name(name), ctx.as_mut())?;
            info!(source = %tax, %copy, "copied tax");
            let duplicated = ctx.map_or(0, |c| c.tax_codes.len());
            Ok(serde_json::to_string_pretty(&json!({
                "tax_id": copy,
                "duplicated_tax_codes": duplicated,
            }))?)
        }
        Command::SeedDemo => seed_demo(store),
    }
}

fn step_report(store: &MemoryStore, outcome: &StepOutcome) -> anyhow::Result<String> {
    let config = store.config(outcome.config_id)?;
    Ok(format!(
        "{}\n{}",
        serde_json::to_string_pretty(outcome)?,
        config.log
    ))
}
