//! Ledger error types for validation, conflict, and reference errors.
//!
//! Every failure a registry or the voucher engine can report is a variant of
//! [`LedgerError`]. Each variant belongs to exactly one [`ErrorKind`], which is
//! what callers branch on.

use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId, VoucherId, VoucherLineId};
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Code is empty or longer than 64 characters.
    #[error("Code cannot be empty or more than 64 characters")]
    CodeEmptyOrTooLong,

    /// Title is empty or longer than 64 characters.
    #[error("Title cannot be empty or more than 64 characters")]
    TitleEmptyOrTooLong,

    /// Voucher number is empty or longer than 64 characters.
    #[error("Number cannot be empty or more than 64 characters")]
    NumberEmptyOrTooLong,

    /// Voucher would end up with fewer than 2 or more than 500 lines.
    #[error("Voucher must have between 2 and 500 lines, got {0}")]
    ItemsCountOutOfRange(i64),

    /// Line does not have exactly one strictly positive side.
    #[error("One and only one of debit or credit must be greater than 0")]
    DebitOrCreditInvalid,

    /// Debits and credits do not balance.
    #[error("Debits and credits must be equal. Debit: {debit}, Credit: {credit}")]
    DebitCreditMismatch {
        /// Total (or net change of) debit.
        debit: i128,
        /// Total (or net change of) credit.
        credit: i128,
    },

    /// The same line id appears more than once across updated/deleted changes.
    #[error("Voucher line {0} is changed more than once in the same request")]
    DuplicateLineChange(VoucherLineId),

    // ========== Conflict Errors ==========
    /// Another record already uses this code.
    #[error("Code should be unique")]
    CodeAlreadyExists,

    /// Another record already uses this title.
    #[error("Title should be unique")]
    TitleAlreadyExists,

    /// Another voucher already uses this number.
    #[error("Voucher number '{0}' already exists")]
    NumberAlreadyExists(String),

    /// The caller's version no longer matches the stored version.
    #[error("Version {expected} is outdated")]
    VersionOutdated {
        /// The version supplied by the caller.
        expected: i64,
    },

    // ========== Not Found Errors ==========
    /// Detail ledger not found.
    #[error("DL not found: {0}")]
    DetailLedgerNotFound(DetailLedgerId),

    /// Subsidiary ledger not found.
    #[error("SL not found: {0}")]
    SubsidiaryLedgerNotFound(SubsidiaryLedgerId),

    /// Voucher not found.
    #[error("Voucher not found: {0}")]
    VoucherNotFound(VoucherId),

    /// Voucher line not found on the voucher being changed.
    #[error("Voucher line not found: {0}")]
    LineNotFound(VoucherLineId),

    // ========== Referential Errors ==========
    /// The record is still referenced by at least one voucher line.
    #[error("Record is referenced by a voucher line")]
    ReferencedByVoucherLine,

    /// The SL requires a DL but the line carries none.
    #[error("SL {0} requires a DL")]
    DlIdRequired(SubsidiaryLedgerId),

    /// The SL does not take a DL but the line carries one.
    #[error("SL {0} does not allow a DL")]
    DlNotAllowed(SubsidiaryLedgerId),

    // ========== Infrastructure Errors ==========
    /// Storage failure. Details are logged where the failure is mapped.
    #[error("Something went wrong")]
    Unexpected,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CodeEmptyOrTooLong => "CODE_EMPTY_OR_TOO_LONG",
            Self::TitleEmptyOrTooLong => "TITLE_EMPTY_OR_TOO_LONG",
            Self::NumberEmptyOrTooLong => "NUMBER_EMPTY_OR_TOO_LONG",
            Self::ItemsCountOutOfRange(_) => "ITEMS_COUNT_OUT_OF_RANGE",
            Self::DebitOrCreditInvalid => "DEBIT_OR_CREDIT_INVALID",
            Self::DebitCreditMismatch { .. } => "DEBIT_CREDIT_MISMATCH",
            Self::DuplicateLineChange(_) => "DUPLICATE_LINE_CHANGE",
            Self::CodeAlreadyExists => "CODE_ALREADY_EXISTS",
            Self::TitleAlreadyExists => "TITLE_ALREADY_EXISTS",
            Self::NumberAlreadyExists(_) => "NUMBER_ALREADY_EXISTS",
            Self::VersionOutdated { .. } => "VERSION_OUTDATED",
            Self::DetailLedgerNotFound(_) => "DL_NOT_FOUND",
            Self::SubsidiaryLedgerNotFound(_) => "SL_NOT_FOUND",
            Self::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::ReferencedByVoucherLine => "REFERENCED_BY_VOUCHER_LINE",
            Self::DlIdRequired(_) => "DL_ID_REQUIRED",
            Self::DlNotAllowed(_) => "DL_NOT_ALLOWED",
            Self::Unexpected => "UNEXPECTED_ERROR",
        }
    }

    /// Returns the kind this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CodeEmptyOrTooLong
            | Self::TitleEmptyOrTooLong
            | Self::NumberEmptyOrTooLong
            | Self::ItemsCountOutOfRange(_)
            | Self::DebitOrCreditInvalid
            | Self::DebitCreditMismatch { .. }
            | Self::DuplicateLineChange(_) => ErrorKind::Validation,

            Self::CodeAlreadyExists
            | Self::TitleAlreadyExists
            | Self::NumberAlreadyExists(_)
            | Self::VersionOutdated { .. } => ErrorKind::Conflict,

            Self::DetailLedgerNotFound(_)
            | Self::SubsidiaryLedgerNotFound(_)
            | Self::VoucherNotFound(_)
            | Self::LineNotFound(_) => ErrorKind::NotFound,

            Self::ReferencedByVoucherLine | Self::DlIdRequired(_) | Self::DlNotAllowed(_) => {
                ErrorKind::Referential
            }

            Self::Unexpected => ErrorKind::Unexpected,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Returns true if refetching and resubmitting can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionOutdated { .. })
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}
