//! Business rule validation shared by the registries and the voucher engine.
//!
//! One function per concern. Create and update paths call the same checks so
//! that a rule is only ever written once.

use tally_shared::types::DetailLedgerId;

use super::error::LedgerError;
use super::types::{
    MAX_FIELD_LENGTH, MAX_VOUCHER_LINES, MIN_VOUCHER_LINES, SubsidiaryLedgerInfo, VoucherTotals,
};

/// Returns true if `value` is non-empty and at most 64 characters.
#[must_use]
pub fn is_valid_length(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= MAX_FIELD_LENGTH
}

/// Validates code and title lengths, code first.
///
/// # Errors
///
/// Returns `CodeEmptyOrTooLong` or `TitleEmptyOrTooLong`.
pub fn validate_code_and_title(code: &str, title: &str) -> Result<(), LedgerError> {
    if !is_valid_length(code) {
        return Err(LedgerError::CodeEmptyOrTooLong);
    }
    if !is_valid_length(title) {
        return Err(LedgerError::TitleEmptyOrTooLong);
    }
    Ok(())
}

/// Validates a voucher number's length.
///
/// # Errors
///
/// Returns `NumberEmptyOrTooLong`.
pub fn validate_number(number: &str) -> Result<(), LedgerError> {
    if is_valid_length(number) {
        Ok(())
    } else {
        Err(LedgerError::NumberEmptyOrTooLong)
    }
}

/// Validates that a voucher's live line count is within [2, 500].
///
/// # Errors
///
/// Returns `ItemsCountOutOfRange` with the offending count.
pub fn validate_line_count(count: i64) -> Result<(), LedgerError> {
    if (MIN_VOUCHER_LINES..=MAX_VOUCHER_LINES).contains(&count) {
        Ok(())
    } else {
        Err(LedgerError::ItemsCountOutOfRange(count))
    }
}

/// Validates that exactly one side of a line is strictly positive.
///
/// # Errors
///
/// Returns `DebitOrCreditInvalid` for zero/zero, both-positive, or any negative side.
pub fn validate_debit_credit(debit: i64, credit: i64) -> Result<(), LedgerError> {
    let single_sided = (debit > 0 && credit == 0) || (debit == 0 && credit > 0);
    if single_sided {
        Ok(())
    } else {
        Err(LedgerError::DebitOrCreditInvalid)
    }
}

/// Validates the SL/DL pairing of a line.
///
/// # Errors
///
/// Returns `DlIdRequired` or `DlNotAllowed`.
pub fn validate_detail_requirement(
    sl: &SubsidiaryLedgerInfo,
    dl_id: Option<DetailLedgerId>,
) -> Result<(), LedgerError> {
    match (sl.requires_detail, dl_id) {
        (true, None) => Err(LedgerError::DlIdRequired(sl.id)),
        (false, Some(_)) => Err(LedgerError::DlNotAllowed(sl.id)),
        _ => Ok(()),
    }
}

/// Validates that totals (or a delta of totals) balance.
///
/// # Errors
///
/// Returns `DebitCreditMismatch` carrying both sides.
pub fn validate_balance(totals: &VoucherTotals) -> Result<(), LedgerError> {
    if totals.is_balanced() {
        Ok(())
    } else {
        Err(LedgerError::DebitCreditMismatch {
            debit: totals.debit,
            credit: totals.credit,
        })
    }
}

/// Validates the caller's version against the stored one.
///
/// # Errors
///
/// Returns `VersionOutdated`.
pub fn validate_version(expected: i64, stored: i64) -> Result<(), LedgerError> {
    if expected == stored {
        Ok(())
    } else {
        Err(LedgerError::VersionOutdated { expected })
    }
}

/// Validates code/title uniqueness against records that share either value.
///
/// `conflicts` yields `(code, title)` of every *other* record matching the
/// code or the title. A code clash is reported before a title clash.
///
/// # Errors
///
/// Returns `CodeAlreadyExists` or `TitleAlreadyExists`.
pub fn validate_uniqueness<'a>(
    conflicts: impl IntoIterator<Item = (&'a str, &'a str)>,
    code: &str,
    title: &str,
) -> Result<(), LedgerError> {
    let mut title_taken = false;
    for (other_code, other_title) in conflicts {
        if other_code == code {
            return Err(LedgerError::CodeAlreadyExists);
        }
        title_taken |= other_title == title;
    }
    if title_taken {
        return Err(LedgerError::TitleAlreadyExists);
    }
    Ok(())
}

/// Validates that nothing references the record about to change.
///
/// # Errors
///
/// Returns `ReferencedByVoucherLine` if `reference_count > 0`.
pub fn validate_unreferenced(reference_count: u64) -> Result<(), LedgerError> {
    if reference_count == 0 {
        Ok(())
    } else {
        Err(LedgerError::ReferencedByVoucherLine)
    }
}
