//! Record-layer primitives consumed by the tax update workflow.

use ledgerwright_shared::AppResult;
use ledgerwright_shared::types::{DefaultValueId, RecordId, TaxId, UpdateConfigId};
use serde::{Deserialize, Serialize};

use super::types::UpdateTaxConfig;

/// Record type name of taxes in the schema catalog.
pub const TAX_RECORD_TYPE: &str = "account.tax";

/// Storage of tax update configurations.
pub trait ConfigBook {
    /// Stores a new configuration. Names are unique (`AppError::Conflict`).
    fn create_config(&mut self, config: &UpdateTaxConfig) -> AppResult<()>;

    /// Reads a configuration.
    fn config(&self, id: UpdateConfigId) -> AppResult<UpdateTaxConfig>;

    /// Writes a configuration back.
    fn save_config(&mut self, config: &UpdateTaxConfig) -> AppResult<()>;
}

/// A stored default value for a field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValue {
    /// The entry ID.
    pub id: DefaultValueId,
    /// Record type the default applies to.
    pub record_type: String,
    /// Field the default applies to.
    pub field: String,
    /// Serialized JSON value.
    pub value: String,
}

/// Store of default field values.
pub trait DefaultValueStore {
    /// Default entries of a (record type, field) pair.
    fn defaults_for(&self, record_type: &str, field: &str) -> AppResult<Vec<DefaultValue>>;

    /// Replaces an entry's serialized value.
    fn write_default(&mut self, id: DefaultValueId, value: String) -> AppResult<()>;
}

/// Shape of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain value.
    Scalar,
    /// Reference to records of another type.
    Relation {
        /// Referenced record type.
        target: String,
        /// Whether the field holds a set of references.
        multiple: bool,
    },
}

/// One field of one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Record type.
    pub record_type: String,
    /// Field name.
    pub field_name: String,
    /// Field shape.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Returns true if the field references taxes.
    #[must_use]
    pub fn references_taxes(&self) -> bool {
        matches!(&self.kind, FieldKind::Relation { target, .. } if target == TAX_RECORD_TYPE)
    }
}

/// Catalog of every field of every record type, inherited fields included.
pub trait SchemaCatalog {
    /// Iterates all fields.
    fn list_fields(&self) -> impl Iterator<Item = FieldDescriptor> + '_;
}

/// A record whose field holds tax ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReference {
    /// The record.
    pub record_id: RecordId,
    /// Tax ids held by the field.
    pub tax_ids: Vec<TaxId>,
}

/// Index of records referencing taxes through id-set fields.
pub trait TaxReferenceIndex {
    /// Records, active or not, whose field contains any of `taxes`.
    fn records_referencing(
        &self,
        record_type: &str,
        field: &str,
        taxes: &[TaxId],
    ) -> AppResult<Vec<TaxReference>>;

    /// Replaces the id set of a record's field.
    fn replace_tax_refs(
        &mut self,
        record_type: &str,
        field: &str,
        record_id: RecordId,
        taxes: &[TaxId],
    ) -> AppResult<()>;
}
