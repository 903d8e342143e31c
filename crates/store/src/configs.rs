//! Configurations, default values, the field catalog and tax references.

use ledgerwright_core::tax_update::{
    ConfigBook, DefaultValue, DefaultValueStore, FieldDescriptor, SchemaCatalog, TaxReference,
    TaxReferenceIndex, UpdateTaxConfig,
};
use ledgerwright_shared::types::{DefaultValueId, RecordId, TaxId, UpdateConfigId};
use ledgerwright_shared::{AppError, AppResult};

use crate::memory::MemoryStore;

impl ConfigBook for MemoryStore {
    fn create_config(&mut self, config: &UpdateTaxConfig) -> AppResult<()> {
        if self.configs.iter().any(|c| c.name == config.name) {
            return Err(AppError::Conflict(format!(
                "configuration name {} must be unique",
                config.name
            )));
        }
        self.configs.push(config.clone());
        Ok(())
    }

    fn config(&self, id: UpdateConfigId) -> AppResult<UpdateTaxConfig> {
        self.configs
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("configuration", id))
    }

    fn save_config(&mut self, config: &UpdateTaxConfig) -> AppResult<()> {
        let stored = self
            .configs
            .iter_mut()
            .find(|c| c.id == config.id)
            .ok_or_else(|| AppError::not_found("configuration", config.id))?;
        stored.clone_from(config);
        Ok(())
    }
}

impl DefaultValueStore for MemoryStore {
    fn defaults_for(&self, record_type: &str, field: &str) -> AppResult<Vec<DefaultValue>> {
        Ok(self
            .default_values
            .iter()
            .filter(|d| d.record_type == record_type && d.field == field)
            .cloned()
            .collect())
    }

    fn write_default(&mut self, id: DefaultValueId, value: String) -> AppResult<()> {
        let entry = self
            .default_values
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("default value", id))?;
        entry.value = value;
        Ok(())
    }
}

impl SchemaCatalog for MemoryStore {
    fn list_fields(&self) -> impl Iterator<Item = FieldDescriptor> + '_ {
        self.fields.iter().cloned()
    }
}

impl TaxReferenceIndex for MemoryStore {
    fn records_referencing(
        &self,
        record_type: &str,
        field: &str,
        taxes: &[TaxId],
    ) -> AppResult<Vec<TaxReference>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.record_type == record_type)
            .filter_map(|r| {
                let ids = r.taxes.get(field)?;
                ids.iter().any(|id| taxes.contains(id)).then(|| TaxReference {
                    record_id: r.id,
                    tax_ids: ids.clone(),
                })
            })
            .collect())
    }

    fn replace_tax_refs(
        &mut self,
        record_type: &str,
        field: &str,
        record_id: RecordId,
        taxes: &[TaxId],
    ) -> AppResult<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == record_id && r.record_type == record_type)
            .ok_or_else(|| AppError::not_found("record", record_id))?;
        record.taxes.insert(field.to_string(), taxes.to_vec());
        Ok(())
    }
}
