//! Registry request types.

use serde::{Deserialize, Serialize};
use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId};

use crate::ledger::LedgerError;

/// Input for creating a detail ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDetailLedgerInput {
    /// Unique code.
    pub code: String,
    /// Unique title.
    pub title: String,
}

/// Input for updating a detail ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDetailLedgerInput {
    /// The DL to update.
    pub id: DetailLedgerId,
    /// New code.
    pub code: String,
    /// New title.
    pub title: String,
    /// The version the caller last read.
    pub version: i64,
}

/// Input for creating a subsidiary ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubsidiaryLedgerInput {
    /// Unique code.
    pub code: String,
    /// Unique title.
    pub title: String,
    /// Whether lines posting to this SL must carry a DL.
    #[serde(default)]
    pub requires_detail: bool,
}

/// Input for updating a subsidiary ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubsidiaryLedgerInput {
    /// The SL to update.
    pub id: SubsidiaryLedgerId,
    /// New code.
    pub code: String,
    /// New title.
    pub title: String,
    /// New detail requirement.
    #[serde(default)]
    pub requires_detail: bool,
    /// The version the caller last read.
    pub version: i64,
}

/// Identifies a registry record for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEntry {
    /// A detail ledger.
    Detail(DetailLedgerId),
    /// A subsidiary ledger.
    Subsidiary(SubsidiaryLedgerId),
}

impl RegistryEntry {
    /// The not-found error for this record.
    #[must_use]
    pub const fn not_found(self) -> LedgerError {
        match self {
            Self::Detail(id) => LedgerError::DetailLedgerNotFound(id),
            Self::Subsidiary(id) => LedgerError::SubsidiaryLedgerNotFound(id),
        }
    }
}
