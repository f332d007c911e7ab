//! Double-entry bookkeeping logic.
//!
//! This module implements the core voucher functionality:
//! - Domain types for voucher creation and three-way line updates
//! - Business rule validation
//! - Error types for ledger operations
//! - Ledger service for voucher validation

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    CreateVoucherInput, DeleteVoucherInput, MAX_FIELD_LENGTH, MAX_VOUCHER_LINES,
    MIN_VOUCHER_LINES, PersistedLine, SubsidiaryLedgerInfo, UpdateVoucherInput,
    VoucherLineChanges, VoucherLineInput, VoucherLineUpdate, VoucherState, VoucherTotals,
};
