//! Tax copying with optional tax code duplication.
//!
//! Several taxes often share tax codes. When taxes are replaced, each shared
//! code is duplicated once and every new tax is pointed at the duplicate, so
//! the old and the new taxes report into separate buckets.

use std::collections::HashMap;

use ledgerwright_shared::AppResult;
use ledgerwright_shared::types::{TaxCodeId, TaxId};
use tracing::debug;

use super::book::TaxBook;
use super::types::{TaxCodeRefs, TaxCodeSlot, TaxPatch, legacy_label};

/// Old tax code → duplicated tax code.
#[derive(Debug, Clone, Default)]
pub struct TaxCodeMap {
    inner: HashMap<TaxCodeId, TaxCodeId>,
}

impl TaxCodeMap {
    /// Returns the duplicate of a tax code, if one was made.
    #[must_use]
    pub fn get(&self, old: TaxCodeId) -> Option<TaxCodeId> {
        self.inner.get(&old).copied()
    }

    /// Number of duplicated tax codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing was duplicated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// State shared by all tax copies of one batch.
#[derive(Debug, Clone)]
pub struct DuplicationContext {
    /// Label put in front of the names of the original tax codes.
    pub legacy_prefix: String,
    /// Tax codes duplicated so far.
    pub tax_codes: TaxCodeMap,
}

impl DuplicationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new(legacy_prefix: impl Into<String>) -> Self {
        Self {
            legacy_prefix: legacy_prefix.into(),
            tax_codes: TaxCodeMap::default(),
        }
    }
}

/// Stateless service copying taxes and their tax codes.
pub struct TaxDuplicator;

impl TaxDuplicator {
    /// Give a tax its own copies of its tax codes.
    ///
    /// For every non-empty slot, a code not seen before in `ctx` is renamed to
    /// `[prefix] name` and copied under its old name; a code seen before is
    /// replaced by the copy made the first time. The tax is then written to
    /// point at the copies.
    pub fn duplicate_tax_codes<B: TaxBook>(
        book: &mut B,
        tax_id: TaxId,
        ctx: &mut DuplicationContext,
    ) -> AppResult<TaxCodeRefs> {
        let tax = book.tax(tax_id)?;
        let mut codes = tax.codes;

        for slot in TaxCodeSlot::ALL {
            let Some(old) = tax.codes.get(slot) else {
                continue;
            };
            let new = match ctx.tax_codes.get(old) {
                Some(new) => new,
                None => {
                    let old_name = book.tax_code(old)?.name;
                    book.rename_tax_code(old, &legacy_label(&ctx.legacy_prefix, &old_name))?;
                    let new = book.copy_tax_code(old, &old_name)?;
                    ctx.tax_codes.inner.insert(old, new);
                    debug!(%old, %new, name = %old_name, "duplicated tax code");
                    new
                }
            };
            codes.set(slot, Some(new));
        }

        book.write_tax(tax_id, &TaxPatch::default().codes(codes))?;
        Ok(codes)
    }

    /// Copy a tax, optionally duplicating its tax codes.
    pub fn copy_tax<B: TaxBook>(
        book: &mut B,
        tax_id: TaxId,
        overrides: &TaxPatch,
        duplicate_codes: Option<&mut DuplicationContext>,
    ) -> AppResult<TaxId> {
        let new_tax = book.copy_tax(tax_id, overrides)?;
        if let Some(ctx) = duplicate_codes {
            Self::duplicate_tax_codes(book, new_tax, ctx)?;
        }
        Ok(new_tax)
    }
}
