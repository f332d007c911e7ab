//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `DetailLedgerId` where a
//! `SubsidiaryLedgerId` is expected. All ids are database-generated 64-bit keys.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw database key.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(DetailLedgerId, "Unique identifier for a detail ledger (DL).");
typed_id!(
    SubsidiaryLedgerId,
    "Unique identifier for a subsidiary ledger (SL)."
);
typed_id!(VoucherId, "Unique identifier for a voucher.");
typed_id!(VoucherLineId, "Unique identifier for a voucher line.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
