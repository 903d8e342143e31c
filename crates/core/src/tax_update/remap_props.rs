//! Property-based tests for tax id substitution.
//!
//! - Remapping never changes the length or order of a list
//! - No replaced tax survives a remap
//! - Sentinel amounts are never replaced

use proptest::prelude::*;
use rust_decimal::Decimal;

use ledgerwright_shared::types::TaxId;

use super::remap::{DefaultPayload, TaxMap, rewrite_default};
use super::types::{is_sentinel_amount, resolve_new_amount};

/// Strategy to generate a list of `replaced` old taxes and `kept` other taxes.
fn taxes() -> impl Strategy<Value = (Vec<TaxId>, Vec<TaxId>)> {
    (1usize..6, 0usize..6).prop_map(|(replaced, kept)| {
        (
            (0..replaced).map(|_| TaxId::new()).collect(),
            (0..kept).map(|_| TaxId::new()).collect(),
        )
    })
}

/// Strategy to generate amounts with four decimals (-2.0000 to 2.0000).
fn amount() -> impl Strategy<Value = Decimal> {
    (-20_000i64..=20_000i64).prop_map(|n| Decimal::new(n, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* list holding a replaced tax, the remapped list keeps its
    /// length and order and holds no replaced tax anymore.
    #[test]
    fn prop_remap_replaces_every_old_tax((replaced, kept) in taxes(), rotate in 0usize..12) {
        let mut map = TaxMap::default();
        for old in &replaced {
            map.insert(*old, TaxId::new());
        }
        let mut ids: Vec<TaxId> = replaced.iter().chain(&kept).copied().collect();
        let len = ids.len();
        ids.rotate_left(rotate % len);

        let remapped = map.remap_all(&ids).unwrap();

        prop_assert_eq!(remapped.len(), ids.len());
        for (before, after) in ids.iter().zip(&remapped) {
            prop_assert_eq!(*after, map.remap(*before));
            prop_assert!(!replaced.contains(after));
        }

        let raw = serde_json::to_string(&ids).unwrap();
        let (_, new) = rewrite_default(&raw, &map).unwrap();
        prop_assert_eq!(new, DefaultPayload::Many(remapped));
    }

    /// *For any* old amount, sentinel amounts come back unchanged.
    #[test]
    fn prop_sentinel_amounts_are_kept(
        old in amount(),
        line in proptest::option::of(amount()),
        default in proptest::option::of(amount()),
    ) {
        let new = resolve_new_amount(old, line, default);
        if is_sentinel_amount(old) {
            prop_assert_eq!(new, old);
        } else {
            prop_assert!(!new.is_zero());
        }
    }
}
