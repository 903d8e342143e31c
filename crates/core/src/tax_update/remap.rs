//! Old → new tax id substitution in stored values.

use std::collections::HashMap;
use std::fmt;

use ledgerwright_shared::types::TaxId;
use serde::{Deserialize, Serialize};

use super::types::UpdateTaxConfigLine;

/// Old tax → replacement tax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxMap {
    inner: HashMap<TaxId, TaxId>,
}

impl TaxMap {
    /// Builds the map from the lines that have a replacement.
    #[must_use]
    pub fn from_lines(lines: &[UpdateTaxConfigLine]) -> Self {
        Self {
            inner: lines
                .iter()
                .filter_map(|l| l.target_tax_id.map(|t| (l.source_tax_id, t)))
                .collect(),
        }
    }

    /// Records a replacement.
    pub fn insert(&mut self, old: TaxId, new: TaxId) {
        self.inner.insert(old, new);
    }

    /// Returns the replacement of a tax, if any.
    #[must_use]
    pub fn get(&self, old: TaxId) -> Option<TaxId> {
        self.inner.get(&old).copied()
    }

    /// Returns the replacement of a tax, or the tax itself.
    #[must_use]
    pub fn remap(&self, id: TaxId) -> TaxId {
        self.get(id).unwrap_or(id)
    }

    /// Replaced taxes, in id order.
    #[must_use]
    pub fn sources(&self) -> Vec<TaxId> {
        let mut sources: Vec<TaxId> = self.inner.keys().copied().collect();
        sources.sort();
        sources
    }

    /// Remaps a list, keeping order. Returns `None` if nothing was replaced.
    #[must_use]
    pub fn remap_all(&self, ids: &[TaxId]) -> Option<Vec<TaxId>> {
        if !ids.iter().any(|id| self.inner.contains_key(id)) {
            return None;
        }
        Some(ids.iter().map(|id| self.remap(*id)).collect())
    }

    /// Number of replacements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there is nothing to replace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Serialized value of a tax default entry: one tax or a list of taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultPayload {
    /// A single tax.
    Single(TaxId),
    /// A set of taxes.
    Many(Vec<TaxId>),
}

impl DefaultPayload {
    /// Remaps the payload. Returns `None` if nothing was replaced.
    #[must_use]
    pub fn remap(&self, map: &TaxMap) -> Option<Self> {
        match self {
            Self::Single(id) => map.get(*id).map(Self::Single),
            Self::Many(ids) => map.remap_all(ids).map(Self::Many),
        }
    }
}

impl fmt::Display for DefaultPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(id) => write!(f, "{id}"),
            Self::Many(ids) => write!(f, "{}", format_ids(ids)),
        }
    }
}

/// Formats tax ids as `[a, b]`.
#[must_use]
pub fn format_ids(ids: &[TaxId]) -> String {
    let joined: Vec<String> = ids.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join(", "))
}

/// Rewrites a serialized default value through the map.
///
/// Values that do not parse as a tax payload are skipped, as are empty lists
/// and values holding no replaced tax. Returns the old and new payloads.
#[must_use]
pub fn rewrite_default(raw: &str, map: &TaxMap) -> Option<(DefaultPayload, DefaultPayload)> {
    let old: DefaultPayload = serde_json::from_str(raw).ok()?;
    let new = old.remap(map)?;
    Some((old, new))
}
