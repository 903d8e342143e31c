//! Tax update workflow domain types.
//!
//! A configuration collects the taxes to replace, split by tax use, and
//! tracks how far the replacement has progressed.

use ledgerwright_shared::types::{TaxId, UpdateConfigId, UpdateConfigLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration status.
///
/// The valid transitions are:
/// - Draft → Confirm (confirm)
/// - Confirm/UpdateSales/UpdatePurchase → UpdateSales or UpdatePurchase (set defaults)
/// - any confirmed status → Done (set inactive, once every used tax use is inactive)
///
/// The status never moves backwards; see [`ConfigState::advance_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigState {
    /// Lines may be added and edited.
    #[default]
    Draft = 0,
    /// Replacement taxes exist; lines are locked.
    Confirm = 1,
    /// Sales defaults were rewritten.
    UpdateSales = 2,
    /// Purchase defaults were rewritten.
    UpdatePurchase = 3,
    /// Old taxes were deactivated.
    Done = 4,
}

impl ConfigState {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Confirm => "confirm",
            Self::UpdateSales => "update_sales",
            Self::UpdatePurchase => "update_purchase",
            Self::Done => "done",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "confirm" => Some(Self::Confirm),
            "update_sales" => Some(Self::UpdateSales),
            "update_purchase" => Some(Self::UpdatePurchase),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Returns true if lines can be added or changed.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if defaults may be rewritten or taxes deactivated.
    #[must_use]
    pub fn accepts_updates(&self) -> bool {
        matches!(self, Self::Confirm | Self::UpdateSales | Self::UpdatePurchase)
    }

    /// Returns the later of the current and the proposed status.
    #[must_use]
    pub fn advance_to(self, next: Self) -> Self {
        self.max(next)
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side of the business a set of taxes is used on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxUse {
    /// Sales taxes.
    Sale,
    /// Purchase taxes.
    Purchase,
}

impl TaxUse {
    /// Both tax uses, sales first.
    pub const ALL: [Self; 2] = [Self::Sale, Self::Purchase];

    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
        }
    }

    /// Parses a tax use from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sale" => Some(Self::Sale),
            "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }

    /// Status reached once this tax use's defaults were rewritten.
    #[must_use]
    pub fn updated_state(&self) -> ConfigState {
        match self {
            Self::Sale => ConfigState::UpdateSales,
            Self::Purchase => ConfigState::UpdatePurchase,
        }
    }
}

impl fmt::Display for TaxUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request-scoped parameters of a workflow step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionContext {
    /// Tax use the step applies to. Required by the per-tax-use steps.
    pub type_tax_use: Option<TaxUse>,
}

impl ActionContext {
    /// Context for a tax use.
    #[must_use]
    pub fn for_tax_use(tax_use: TaxUse) -> Self {
        Self {
            type_tax_use: Some(tax_use),
        }
    }
}

/// One tax to replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaxConfigLine {
    /// The line ID.
    pub id: UpdateConfigLineId,
    /// Tax being replaced.
    pub source_tax_id: TaxId,
    /// Replacement tax, set on confirm.
    #[serde(default)]
    pub target_tax_id: Option<TaxId>,
    /// New amount; zero or absent falls back to the configuration default.
    #[serde(default)]
    pub amount_new: Option<Decimal>,
    /// New description; absent keeps the old one.
    #[serde(default)]
    pub target_tax_description: Option<String>,
}

/// Input for adding a line to a draft configuration.
#[derive(Debug, Clone)]
pub struct NewConfigLine {
    /// Tax being replaced.
    pub source_tax_id: TaxId,
    /// New amount.
    pub amount_new: Option<Decimal>,
    /// New description.
    pub target_tax_description: Option<String>,
}

/// A batch of taxes to replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaxConfig {
    /// The configuration ID.
    pub id: UpdateConfigId,
    /// Legacy label put in front of replaced taxes; unique.
    pub name: String,
    /// Human-readable audit log.
    #[serde(default)]
    pub log: String,
    /// Workflow status.
    #[serde(default)]
    pub state: ConfigState,
    /// New amount used by lines without their own.
    #[serde(default)]
    pub default_amount: Option<Decimal>,
    /// Duplicate the tax codes of replaced taxes.
    #[serde(default)]
    pub duplicate_tax_code: bool,
    /// Sales taxes to replace.
    #[serde(default)]
    pub sale_lines: Vec<UpdateTaxConfigLine>,
    /// Purchase taxes to replace.
    #[serde(default)]
    pub purchase_lines: Vec<UpdateTaxConfigLine>,
    /// Sales tax defaults have been set.
    #[serde(default)]
    pub sale_set_defaults: bool,
    /// Purchase tax defaults have been set.
    #[serde(default)]
    pub purchase_set_defaults: bool,
    /// Sales taxes have been set inactive.
    #[serde(default)]
    pub sale_set_inactive: bool,
    /// Purchase taxes have been set inactive.
    #[serde(default)]
    pub purchase_set_inactive: bool,
}

impl UpdateTaxConfig {
    /// Creates an empty draft configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UpdateConfigId::new(),
            name: name.into(),
            log: String::new(),
            state: ConfigState::Draft,
            default_amount: None,
            duplicate_tax_code: false,
            sale_lines: Vec::new(),
            purchase_lines: Vec::new(),
            sale_set_defaults: false,
            purchase_set_defaults: false,
            sale_set_inactive: false,
            purchase_set_inactive: false,
        }
    }

    /// Lines of a tax use.
    #[must_use]
    pub fn lines(&self, tax_use: TaxUse) -> &[UpdateTaxConfigLine] {
        match tax_use {
            TaxUse::Sale => &self.sale_lines,
            TaxUse::Purchase => &self.purchase_lines,
        }
    }

    /// Lines of a tax use, mutably.
    pub fn lines_mut(&mut self, tax_use: TaxUse) -> &mut Vec<UpdateTaxConfigLine> {
        match tax_use {
            TaxUse::Sale => &mut self.sale_lines,
            TaxUse::Purchase => &mut self.purchase_lines,
        }
    }

    /// Finds a line of either tax use.
    #[must_use]
    pub fn line(&self, id: UpdateConfigLineId) -> Option<&UpdateTaxConfigLine> {
        self.sale_lines
            .iter()
            .chain(&self.purchase_lines)
            .find(|l| l.id == id)
    }

    /// Returns whether a tax use's defaults have been set.
    #[must_use]
    pub fn defaults_set(&self, tax_use: TaxUse) -> bool {
        match tax_use {
            TaxUse::Sale => self.sale_set_defaults,
            TaxUse::Purchase => self.purchase_set_defaults,
        }
    }

    /// Marks a tax use's defaults as set.
    pub fn mark_defaults_set(&mut self, tax_use: TaxUse) {
        match tax_use {
            TaxUse::Sale => self.sale_set_defaults = true,
            TaxUse::Purchase => self.purchase_set_defaults = true,
        }
    }

    /// Returns whether a tax use's taxes have been set inactive.
    #[must_use]
    pub fn inactive_set(&self, tax_use: TaxUse) -> bool {
        match tax_use {
            TaxUse::Sale => self.sale_set_inactive,
            TaxUse::Purchase => self.purchase_set_inactive,
        }
    }

    /// Marks a tax use's taxes as set inactive.
    pub fn mark_inactive_set(&mut self, tax_use: TaxUse) {
        match tax_use {
            TaxUse::Sale => self.sale_set_inactive = true,
            TaxUse::Purchase => self.purchase_set_inactive = true,
        }
    }

    /// Returns true once every tax use with lines has been set inactive.
    #[must_use]
    pub fn all_inactive_set(&self) -> bool {
        TaxUse::ALL
            .iter()
            .all(|u| self.lines(*u).is_empty() || self.inactive_set(*u))
    }
}

/// Read-only view of a configuration line with its derived values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigLineView {
    /// The line ID.
    pub id: UpdateConfigLineId,
    /// Tax being replaced.
    pub source_tax_id: TaxId,
    /// Current description of the source tax.
    pub source_tax_description: Option<String>,
    /// Current amount of the source tax.
    pub amount_old: Decimal,
    /// Replacement tax, once confirmed.
    pub target_tax_id: Option<TaxId>,
    /// Requested new amount.
    pub amount_new: Option<Decimal>,
    /// Status of the owning configuration.
    pub state: ConfigState,
}

/// Result of a workflow step: the configuration to reopen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// The configuration.
    pub config_id: UpdateConfigId,
    /// Status after the step.
    pub state: ConfigState,
    /// Number of records written by the step.
    pub changes: usize,
}

/// Tax amounts that must never be replaced: full pass-through and zero rates.
#[must_use]
pub fn is_sentinel_amount(amount: Decimal) -> bool {
    amount == Decimal::ONE || amount == Decimal::NEGATIVE_ONE || amount.is_zero()
}

/// Amount of the replacement tax.
///
/// Sentinel amounts are kept. Otherwise the line's amount wins, then the
/// configuration default, then the old amount; zero counts as unset.
#[must_use]
pub fn resolve_new_amount(
    old_amount: Decimal,
    line_amount: Option<Decimal>,
    default_amount: Option<Decimal>,
) -> Decimal {
    if is_sentinel_amount(old_amount) {
        return old_amount;
    }
    line_amount
        .filter(|a| !a.is_zero())
        .or_else(|| default_amount.filter(|a| !a.is_zero()))
        .unwrap_or(old_amount)
}
