//! Typed IDs for type-safe record references.
//!
//! Using typed IDs prevents accidentally passing a `TaxCodeId` where a `TaxId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a company.");
typed_id!(PartnerId, "Unique identifier for a partner.");
typed_id!(AccountId, "Unique identifier for a ledger account.");
typed_id!(JournalId, "Unique identifier for a journal.");
typed_id!(PeriodId, "Unique identifier for an accounting period.");
typed_id!(MoveId, "Unique identifier for a journal entry (move).");
typed_id!(LedgerLineId, "Unique identifier for a ledger line.");
typed_id!(
    ReconciliationId,
    "Unique identifier for a native reconciliation record."
);
typed_id!(TaxId, "Unique identifier for a tax.");
typed_id!(TaxCodeId, "Unique identifier for a tax code.");
typed_id!(FiscalPositionId, "Unique identifier for a fiscal position.");
typed_id!(
    FiscalPositionTaxId,
    "Unique identifier for a fiscal position tax mapping."
);
typed_id!(UpdateConfigId, "Unique identifier for a tax update configuration.");
typed_id!(
    UpdateConfigLineId,
    "Unique identifier for a tax update configuration line."
);
typed_id!(DefaultValueId, "Unique identifier for a stored default value.");
typed_id!(
    RecordId,
    "Identifier of an arbitrary record holding tax references (product, account, ...)."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = TaxId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_id_display_round_trips_through_from_str() {
        let id = PartnerId::new();
        assert_eq!(PartnerId::from_str(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_typed_id_from_str_error() {
        assert!(AccountId::from_str("invalid").is_err());
    }

    #[test]
    fn test_typed_id_serializes_as_plain_string() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&TaxId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
