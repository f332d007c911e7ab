//! Ledger service for voucher validation.
//!
//! This module provides the core business logic for validating voucher
//! creation and three-way line updates before they are persisted.

use std::collections::{HashMap, HashSet};

use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId, VoucherLineId};

use super::error::LedgerError;
use super::types::{
    CreateVoucherInput, DeleteVoucherInput, PersistedLine, SubsidiaryLedgerInfo,
    UpdateVoucherInput, VoucherLineInput, VoucherState, VoucherTotals, len_i64,
};
use super::validation;

/// Ledger service for voucher validation.
///
/// This service contains pure business logic with no database dependencies.
/// Everything it needs from storage is handed in by the caller, either as a
/// snapshot or as a lookup closure.
pub struct LedgerService;

impl LedgerService {
    /// Validate a new voucher before persisting.
    ///
    /// Checks run in this order, first failure wins:
    /// 1. Number length
    /// 2. Line count within [2, 500]
    /// 3. Number uniqueness
    /// 4. Total debit equals total credit
    /// 5. Per line, in input order: debit/credit shape, SL exists, SL/DL
    ///    pairing, DL exists
    ///
    /// # Arguments
    ///
    /// * `input` - The voucher to validate
    /// * `number_taken` - Whether another voucher already uses `input.number`
    /// * `sl_lookup` - Function to look up a subsidiary ledger
    /// * `dl_exists` - Function to check a detail ledger exists
    ///
    /// # Returns
    ///
    /// The voucher totals on success.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn validate_create<S, D>(
        input: &CreateVoucherInput,
        number_taken: bool,
        sl_lookup: S,
        dl_exists: D,
    ) -> Result<VoucherTotals, LedgerError>
    where
        S: Fn(SubsidiaryLedgerId) -> Option<SubsidiaryLedgerInfo>,
        D: Fn(DetailLedgerId) -> bool,
    {
        validation::validate_number(&input.number)?;
        validation::validate_line_count(len_i64(input.lines.len()))?;

        if number_taken {
            return Err(LedgerError::NumberAlreadyExists(input.number.clone()));
        }

        let totals = VoucherTotals::of_lines(&input.lines);
        validation::validate_balance(&totals)?;

        for line in &input.lines {
            Self::validate_line(line, &sl_lookup, &dl_exists)?;
        }

        Ok(totals)
    }

    /// Validate a voucher update against the voucher's current state.
    ///
    /// `state` is `None` when the voucher does not exist. Checks run in this
    /// order, first failure wins:
    /// 1. Number length
    /// 2. Voucher exists
    /// 3. Version matches
    /// 4. Resulting line count within [2, 500]
    /// 5. Inserted lines pass the per-line checks
    /// 6. Updated lines belong to the voucher, are named once, and their new
    ///    values pass the per-line checks
    /// 7. Deleted lines belong to the voucher and are named once
    /// 8. The net change of debit equals the net change of credit
    /// 9. Number not used by another voucher
    ///
    /// Because the persisted voucher is balanced, step 8 holds iff the
    /// resulting voucher is balanced.
    ///
    /// # Returns
    ///
    /// The net change of the voucher totals on success.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn validate_update<S, D>(
        input: &UpdateVoucherInput,
        state: Option<&VoucherState>,
        number_taken: bool,
        sl_lookup: S,
        dl_exists: D,
    ) -> Result<VoucherTotals, LedgerError>
    where
        S: Fn(SubsidiaryLedgerId) -> Option<SubsidiaryLedgerInfo>,
        D: Fn(DetailLedgerId) -> bool,
    {
        validation::validate_number(&input.number)?;

        let state = state.ok_or(LedgerError::VoucherNotFound(input.id))?;
        validation::validate_version(input.version, state.version)?;

        let changes = &input.lines;
        validation::validate_line_count(len_i64(state.lines.len()) + changes.count_delta())?;

        let current: HashMap<VoucherLineId, &PersistedLine> =
            state.lines.iter().map(|line| (line.id, line)).collect();
        let mut touched = HashSet::with_capacity(changes.updated.len() + changes.deleted.len());
        let mut delta = VoucherTotals::default();

        for line in &changes.inserted {
            Self::validate_line(line, &sl_lookup, &dl_exists)?;
            delta.add(line.debit, line.credit);
        }

        for update in &changes.updated {
            let old = Self::claim_line(update.id, &current, &mut touched)?;
            Self::validate_line(&update.line, &sl_lookup, &dl_exists)?;
            delta.replace(
                (old.debit, old.credit),
                (update.line.debit, update.line.credit),
            );
        }

        for &id in &changes.deleted {
            let old = Self::claim_line(id, &current, &mut touched)?;
            delta.remove(old.debit, old.credit);
        }

        validation::validate_balance(&delta)?;

        if number_taken {
            return Err(LedgerError::NumberAlreadyExists(input.number.clone()));
        }

        Ok(delta)
    }

    /// Validate a voucher deletion.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` or `VersionOutdated`.
    pub fn validate_delete(
        input: &DeleteVoucherInput,
        stored_version: Option<i64>,
    ) -> Result<(), LedgerError> {
        let stored = stored_version.ok_or(LedgerError::VoucherNotFound(input.id))?;
        validation::validate_version(input.version, stored)
    }

    /// Per-line checks shared by create, inserted and updated lines.
    fn validate_line<S, D>(
        line: &VoucherLineInput,
        sl_lookup: &S,
        dl_exists: &D,
    ) -> Result<(), LedgerError>
    where
        S: Fn(SubsidiaryLedgerId) -> Option<SubsidiaryLedgerInfo>,
        D: Fn(DetailLedgerId) -> bool,
    {
        validation::validate_debit_credit(line.debit, line.credit)?;

        let sl = sl_lookup(line.sl_id).ok_or(LedgerError::SubsidiaryLedgerNotFound(line.sl_id))?;
        validation::validate_detail_requirement(&sl, line.dl_id)?;

        if let Some(dl_id) = line.dl_id
            && !dl_exists(dl_id)
        {
            return Err(LedgerError::DetailLedgerNotFound(dl_id));
        }

        Ok(())
    }

    /// Resolves a line id against the voucher's current lines, rejecting ids
    /// already named by an earlier change.
    fn claim_line<'a>(
        id: VoucherLineId,
        current: &HashMap<VoucherLineId, &'a PersistedLine>,
        touched: &mut HashSet<VoucherLineId>,
    ) -> Result<&'a PersistedLine, LedgerError> {
        let line = current
            .get(&id)
            .copied()
            .ok_or(LedgerError::LineNotFound(id))?;
        if !touched.insert(id) {
            return Err(LedgerError::DuplicateLineChange(id));
        }
        Ok(line)
    }
}
