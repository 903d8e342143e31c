//! Tax update workflow service.
//!
//! Drives a configuration through its steps: confirm creates the replacement
//! taxes, set defaults points stored defaults and records at them, and set
//! inactive archives the replaced taxes.

use ledgerwright_shared::AppError;
use ledgerwright_shared::config::ReferenceField;
use ledgerwright_shared::types::{UpdateConfigId, UpdateConfigLineId};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::tax::{DuplicationContext, TaxBook, TaxDuplicator, TaxPatch, legacy_label};
use crate::tax_update::audit::AuditLog;
use crate::tax_update::collaborators::{
    ConfigBook, DefaultValueStore, SchemaCatalog, TaxReferenceIndex,
};
use crate::tax_update::error::TaxUpdateError;
use crate::tax_update::remap::{TaxMap, format_ids, rewrite_default};
use crate::tax_update::types::{
    ActionContext, ConfigLineView, ConfigState, NewConfigLine, StepOutcome, TaxUse,
    UpdateTaxConfig, UpdateTaxConfigLine, resolve_new_amount,
};

/// Label of a freshly copied tax before it takes over the old name.
const NEW_TAX_LABEL: &str = "new";

/// Stateless service for the tax update workflow.
///
/// Every step acts on exactly one configuration and returns the
/// configuration to reopen.
pub struct TaxUpdateService;

impl TaxUpdateService {
    /// Create a draft configuration.
    ///
    /// # Errors
    /// * `TaxUpdateError::EmptyName` if the name is blank
    /// * `TaxUpdateError::Store` if the name is taken
    pub fn create_config<B: ConfigBook>(
        book: &mut B,
        name: &str,
        default_amount: Option<Decimal>,
        duplicate_tax_code: bool,
    ) -> Result<UpdateConfigId, TaxUpdateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaxUpdateError::EmptyName);
        }
        let mut config = UpdateTaxConfig::new(name);
        config.default_amount = default_amount;
        config.duplicate_tax_code = duplicate_tax_code;
        book.create_config(&config)?;
        info!(config = %config.id, name, "created tax update configuration");
        Ok(config.id)
    }

    /// Add a tax to replace.
    pub fn add_line<B: ConfigBook>(
        book: &mut B,
        config_id: UpdateConfigId,
        tax_use: TaxUse,
        line: NewConfigLine,
    ) -> Result<UpdateConfigLineId, TaxUpdateError> {
        let mut config = book.config(config_id)?;
        if !config.state.is_editable() {
            return Err(TaxUpdateError::NotEditable(config.state));
        }
        let id = UpdateConfigLineId::new();
        config.lines_mut(tax_use).push(UpdateTaxConfigLine {
            id,
            source_tax_id: line.source_tax_id,
            target_tax_id: None,
            amount_new: line.amount_new,
            target_tax_description: line.target_tax_description,
        });
        book.save_config(&config)?;
        Ok(id)
    }

    /// Remove a tax to replace.
    pub fn remove_line<B: ConfigBook>(
        book: &mut B,
        config_id: UpdateConfigId,
        line_id: UpdateConfigLineId,
    ) -> Result<(), TaxUpdateError> {
        let mut config = book.config(config_id)?;
        if !config.state.is_editable() {
            return Err(TaxUpdateError::NotEditable(config.state));
        }
        let mut removed = false;
        for tax_use in TaxUse::ALL {
            let lines = config.lines_mut(tax_use);
            let before = lines.len();
            lines.retain(|l| l.id != line_id);
            removed |= lines.len() != before;
        }
        if !removed {
            return Err(AppError::not_found("configuration line", line_id).into());
        }
        book.save_config(&config)?;
        Ok(())
    }

    /// A line with the values derived from its source tax and configuration.
    pub fn line_view<B: ConfigBook + TaxBook>(
        book: &B,
        config_id: UpdateConfigId,
        line_id: UpdateConfigLineId,
    ) -> Result<ConfigLineView, TaxUpdateError> {
        let config = book.config(config_id)?;
        let line = config
            .line(line_id)
            .ok_or_else(|| AppError::not_found("configuration line", line_id))?;
        let source = book.tax(line.source_tax_id)?;
        Ok(ConfigLineView {
            id: line.id,
            source_tax_id: line.source_tax_id,
            source_tax_description: source.description,
            amount_old: source.amount,
            target_tax_id: line.target_tax_id,
            amount_new: line.amount_new,
            state: config.state,
        })
    }

    /// Create the replacement taxes and lock the configuration.
    ///
    /// Every source tax is renamed to `[name] old name` and copied under its
    /// old name with the new amount. Fiscal position mappings from a source
    /// tax are copied to the replacement; their destination follows only if
    /// it was replaced too.
    ///
    /// # Errors
    /// * `TaxUpdateError::ExpectedSingleConfig` unless exactly one target is given
    /// * `TaxUpdateError::InvalidTransition` if the configuration is not a draft
    pub fn confirm<B: ConfigBook + TaxBook>(
        book: &mut B,
        targets: &[UpdateConfigId],
    ) -> Result<StepOutcome, TaxUpdateError> {
        let mut config = book.config(ensure_one(targets)?)?;
        if config.state != ConfigState::Draft {
            return Err(TaxUpdateError::InvalidTransition {
                from: config.state,
                to: ConfigState::Confirm,
            });
        }

        let prefix = config.name.clone();
        let default_amount = config.default_amount;
        let mut duplication = config
            .duplicate_tax_code
            .then(|| DuplicationContext::new(prefix.clone()));
        let mut tax_map = TaxMap::default();
        let mut changes = 0;

        let mut log = AuditLog::resume(&config.log);
        log.section("Confirmed with the following taxes:");

        for tax_use in TaxUse::ALL {
            for line in config.lines_mut(tax_use) {
                let source = book.tax(line.source_tax_id)?;
                log.line(&format!(" - {}", describe(&source.name, source.description.as_deref())));

                let old_name = source.name;
                let old_description = source.description;
                book.write_tax(
                    source.id,
                    &TaxPatch::default()
                        .name(legacy_label(&prefix, &old_name))
                        .description(old_description.as_deref().map(|d| legacy_label(&prefix, d))),
                )?;

                let amount = resolve_new_amount(source.amount, line.amount_new, default_amount);
                let target = TaxDuplicator::copy_tax(
                    book,
                    source.id,
                    &TaxPatch::default()
                        .name(legacy_label(NEW_TAX_LABEL, &old_name))
                        .amount(amount),
                    duplication.as_mut(),
                )?;
                book.write_tax(
                    target,
                    &TaxPatch::default()
                        .name(old_name.clone())
                        .description(line.target_tax_description.clone().or(old_description)),
                )?;

                debug!(source = %source.id, %target, %amount, name = %old_name, "replaced tax");
                tax_map.insert(source.id, target);
                line.target_tax_id = Some(target);
                changes += 1;
            }
        }

        for mapping in book.mappings_from(&tax_map.sources())? {
            let copy = book.copy_mapping(
                mapping.id,
                tax_map.remap(mapping.tax_src_id),
                mapping.tax_dest_id.map(|d| tax_map.remap(d)),
            )?;
            let position = book.fiscal_position(copy.position_id)?;
            let src = book.tax(copy.tax_src_id)?;
            let dest = match copy.tax_dest_id {
                Some(id) => {
                    let tax = book.tax(id)?;
                    describe(&tax.name, tax.description.as_deref())
                }
                None => "(none)".to_string(),
            };
            log.line("")
                .line(&format!("Create new tax mapping on position {}:", position.name))
                .line(&describe(&src.name, src.description.as_deref()))
                .line(&format!("=> {dest}"));
            changes += 1;
        }

        config.state = ConfigState::Confirm;
        config.log = log.finish();
        book.save_config(&config)?;

        info!(config = %config.id, changes, "confirmed tax update configuration");
        Ok(StepOutcome {
            config_id: config.id,
            state: config.state,
            changes,
        })
    }

    /// Point stored defaults and tax references of one tax use at the
    /// replacement taxes.
    ///
    /// Default entries of every tax relation field in the catalog are
    /// rewritten; so are the id sets of `reference_fields`, including
    /// records that are inactive.
    ///
    /// # Errors
    /// * `TaxUpdateError::ExpectedSingleConfig` unless exactly one target is given
    /// * `TaxUpdateError::MissingTaxUse` if the context has no tax use
    /// * `TaxUpdateError::InvalidTransition` unless the configuration is confirmed
    pub fn set_defaults<B>(
        book: &mut B,
        targets: &[UpdateConfigId],
        ctx: &ActionContext,
        reference_fields: &[ReferenceField],
    ) -> Result<StepOutcome, TaxUpdateError>
    where
        B: ConfigBook + DefaultValueStore + SchemaCatalog + TaxReferenceIndex,
    {
        let config_id = ensure_one(targets)?;
        let tax_use = ctx.type_tax_use.ok_or(TaxUpdateError::MissingTaxUse)?;
        let mut config = book.config(config_id)?;
        let next = tax_use.updated_state();
        if !config.state.accepts_updates() {
            return Err(TaxUpdateError::InvalidTransition {
                from: config.state,
                to: next,
            });
        }

        let tax_map = TaxMap::from_lines(config.lines(tax_use));
        let mut changes = 0;
        let mut log = AuditLog::resume(&config.log);
        log.section(&format!("Writing default {tax_use} taxes:"));

        let fields: Vec<_> = book.list_fields().filter(|f| f.references_taxes()).collect();
        for field in &fields {
            for entry in book.defaults_for(&field.record_type, &field.field_name)? {
                let Some((old, new)) = rewrite_default(&entry.value, &tax_map) else {
                    continue;
                };
                let value = serde_json::to_string(&new).map_err(AppError::from)?;
                book.write_default(entry.id, value)?;
                debug!(record_type = %field.record_type, field = %field.field_name, "rewrote default");
                log.line(&format!(
                    "Default ({old} => {new}) for {},{}",
                    field.record_type, field.field_name
                ));
                changes += 1;
            }
        }

        log.line("")
            .line(&format!("Replacing {tax_use} taxes on accounts and products"));
        let sources = tax_map.sources();
        for reference in reference_fields {
            let records =
                book.records_referencing(&reference.record_type, &reference.field, &sources)?;
            for record in records {
                let Some(new) = tax_map.remap_all(&record.tax_ids) else {
                    continue;
                };
                book.replace_tax_refs(
                    &reference.record_type,
                    &reference.field,
                    record.record_id,
                    &new,
                )?;
                log.line(&format!(
                    "Value ({} => {}) for {},{},{}",
                    format_ids(&record.tax_ids),
                    format_ids(&new),
                    reference.record_type,
                    reference.field,
                    record.record_id
                ));
                changes += 1;
            }
        }

        config.mark_defaults_set(tax_use);
        config.state = config.state.advance_to(next);
        config.log = log.finish();
        book.save_config(&config)?;

        info!(config = %config.id, %tax_use, changes, "set tax defaults");
        Ok(StepOutcome {
            config_id: config.id,
            state: config.state,
            changes,
        })
    }

    /// Deactivate the replaced taxes of one tax use.
    ///
    /// # Errors
    /// * `TaxUpdateError::ExpectedSingleConfig` unless exactly one target is given
    /// * `TaxUpdateError::MissingTaxUse` if the context has no tax use
    /// * `TaxUpdateError::InvalidTransition` unless the configuration is confirmed
    /// * `TaxUpdateError::DefaultsNotSet` before `set_defaults` ran for the tax use
    pub fn set_inactive<B: ConfigBook + TaxBook>(
        book: &mut B,
        targets: &[UpdateConfigId],
        ctx: &ActionContext,
    ) -> Result<StepOutcome, TaxUpdateError> {
        let config_id = ensure_one(targets)?;
        let tax_use = ctx.type_tax_use.ok_or(TaxUpdateError::MissingTaxUse)?;
        let mut config = book.config(config_id)?;
        if !config.state.accepts_updates() {
            return Err(TaxUpdateError::InvalidTransition {
                from: config.state,
                to: ConfigState::Done,
            });
        }
        if !config.defaults_set(tax_use) {
            return Err(TaxUpdateError::DefaultsNotSet(tax_use));
        }

        let sources: Vec<_> = config.lines(tax_use).iter().map(|l| l.source_tax_id).collect();
        let active = book.active_taxes(&sources)?;
        for id in &active {
            book.write_tax(*id, &TaxPatch::default().active(false))?;
        }

        let mut log = AuditLog::resume(&config.log);
        log.section(&format!("Setting {} {tax_use} taxes inactive", active.len()));

        config.mark_inactive_set(tax_use);
        if config.all_inactive_set() {
            config.state = ConfigState::Done;
        }
        config.log = log.finish();
        book.save_config(&config)?;

        info!(config = %config.id, %tax_use, count = active.len(), "set taxes inactive");
        Ok(StepOutcome {
            config_id: config.id,
            state: config.state,
            changes: active.len(),
        })
    }
}

/// The single configuration a step acts on.
fn ensure_one(targets: &[UpdateConfigId]) -> Result<UpdateConfigId, TaxUpdateError> {
    match targets {
        [id] => Ok(*id),
        _ => Err(TaxUpdateError::ExpectedSingleConfig(targets.len())),
    }
}

fn describe(name: &str, description: Option<&str>) -> String {
    match description {
        Some(description) => format!("{name} ({description})"),
        None => name.to_string(),
    }
}
