//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Mixed-account reconciliation configuration.
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    /// Tax update workflow configuration.
    #[serde(default)]
    pub tax_update: TaxUpdateConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "ledgerwright=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

/// Mixed-account reconciliation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// Name given to the journal entry holding balancing lines.
    #[serde(default = "default_balancing_move_name")]
    pub balancing_move_name: String,
    /// Net the residuals of a partner's receivable and payable accounts.
    #[serde(default)]
    pub net_receivable_payable: bool,
}

fn default_balancing_move_name() -> String {
    "Account Reconcile Balancing".to_string()
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            balancing_move_name: default_balancing_move_name(),
            net_receivable_payable: false,
        }
    }
}

/// Tax update workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxUpdateConfig {
    /// Prefix for renamed tax codes when a single tax is copied outside a configuration.
    #[serde(default = "default_legacy_prefix")]
    pub default_legacy_prefix: String,
    /// Record fields holding tax id sets that are rewritten in place.
    #[serde(default = "default_reference_fields")]
    pub reference_fields: Vec<ReferenceField>,
}

/// A (record type, field) pair holding a set of tax ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferenceField {
    /// Record type, e.g. `product.product`.
    pub record_type: String,
    /// Field name, e.g. `taxes_id`.
    pub field: String,
}

impl ReferenceField {
    /// Creates a reference field entry.
    #[must_use]
    pub fn new(record_type: &str, field: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            field: field.to_string(),
        }
    }
}

fn default_legacy_prefix() -> String {
    "legacy".to_string()
}

fn default_reference_fields() -> Vec<ReferenceField> {
    vec![
        ReferenceField::new("account.account", "tax_ids"),
        ReferenceField::new("product.product", "supplier_taxes_id"),
        ReferenceField::new("product.product", "taxes_id"),
        ReferenceField::new("product.template", "supplier_taxes_id"),
        ReferenceField::new("product.template", "taxes_id"),
    ]
}

impl Default for TaxUpdateConfig {
    fn default() -> Self {
        Self {
            default_legacy_prefix: default_legacy_prefix(),
            reference_fields: default_reference_fields(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERWRIGHT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = temp_env::with_vars_unset(
            [
                "LEDGERWRIGHT__RECONCILE__NET_RECEIVABLE_PAYABLE",
                "LEDGERWRIGHT__LOGGING__JSON",
            ],
            AppConfig::load,
        )
        .unwrap();

        assert_eq!(config.logging.filter, "ledgerwright=info");
        assert!(!config.logging.json);
        assert_eq!(
            config.reconcile.balancing_move_name,
            "Account Reconcile Balancing"
        );
        assert!(!config.reconcile.net_receivable_payable);
        assert_eq!(config.tax_update.default_legacy_prefix, "legacy");
        assert_eq!(config.tax_update.reference_fields.len(), 5);
    }

    #[test]
    fn test_environment_overrides() {
        let config = temp_env::with_vars(
            [
                ("LEDGERWRIGHT__RECONCILE__NET_RECEIVABLE_PAYABLE", Some("true")),
                ("LEDGERWRIGHT__LOGGING__JSON", Some("true")),
            ],
            AppConfig::load,
        )
        .unwrap();

        assert!(config.reconcile.net_receivable_payable);
        assert!(config.logging.json);
    }

    #[test]
    fn test_default_reference_fields_cover_accounts_and_products() {
        let fields = TaxUpdateConfig::default().reference_fields;
        assert!(fields.contains(&ReferenceField::new("account.account", "tax_ids")));
        assert!(fields.contains(&ReferenceField::new("product.template", "taxes_id")));
        assert!(fields.contains(&ReferenceField::new(
            "product.product",
            "supplier_taxes_id"
        )));
    }
}
