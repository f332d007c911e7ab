//! Ledger domain types for voucher creation and mutation.
//!
//! This module defines the request shapes the voucher engine accepts and the
//! snapshot types it validates them against.

use serde::{Deserialize, Serialize};
use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId, VoucherId, VoucherLineId};

/// Maximum length, in characters, of codes, titles and voucher numbers.
pub const MAX_FIELD_LENGTH: usize = 64;

/// Minimum number of live lines on a voucher.
pub const MIN_VOUCHER_LINES: i64 = 2;

/// Maximum number of live lines on a voucher.
pub const MAX_VOUCHER_LINES: i64 = 500;

/// Input for a single voucher line.
///
/// Exactly one of `debit` / `credit` must be strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherLineInput {
    /// The subsidiary ledger to post to.
    pub sl_id: SubsidiaryLedgerId,
    /// The detail ledger, required iff the SL requires detail.
    pub dl_id: Option<DetailLedgerId>,
    /// Debit amount (0 if credit).
    pub debit: i64,
    /// Credit amount (0 if debit).
    pub credit: i64,
}

impl VoucherLineInput {
    /// A debit line without a DL.
    #[must_use]
    pub const fn debit(sl_id: SubsidiaryLedgerId, amount: i64) -> Self {
        Self {
            sl_id,
            dl_id: None,
            debit: amount,
            credit: 0,
        }
    }

    /// A credit line without a DL.
    #[must_use]
    pub const fn credit(sl_id: SubsidiaryLedgerId, amount: i64) -> Self {
        Self {
            sl_id,
            dl_id: None,
            debit: 0,
            credit: amount,
        }
    }

    /// Attaches a detail ledger to this line.
    #[must_use]
    pub const fn with_detail(mut self, dl_id: DetailLedgerId) -> Self {
        self.dl_id = Some(dl_id);
        self
    }
}

/// Input for creating a voucher with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVoucherInput {
    /// Voucher number (unique, 1..=64 characters).
    pub number: String,
    /// The voucher lines, in insertion order.
    pub lines: Vec<VoucherLineInput>,
}

/// New values for an existing voucher line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherLineUpdate {
    /// The line being replaced in place.
    pub id: VoucherLineId,
    /// Its new values.
    #[serde(flatten)]
    pub line: VoucherLineInput,
}

/// The three-way delta applied to a voucher's lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherLineChanges {
    /// Lines to add.
    #[serde(default)]
    pub inserted: Vec<VoucherLineInput>,
    /// Lines to replace in place.
    #[serde(default)]
    pub updated: Vec<VoucherLineUpdate>,
    /// Lines to remove.
    #[serde(default)]
    pub deleted: Vec<VoucherLineId>,
}

impl VoucherLineChanges {
    /// Net change to the number of live lines.
    #[must_use]
    pub fn count_delta(&self) -> i64 {
        len_i64(self.inserted.len()) - len_i64(self.deleted.len())
    }
}

/// Input for updating a voucher header and its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVoucherInput {
    /// The voucher to update.
    pub id: VoucherId,
    /// The version the caller last read.
    pub version: i64,
    /// New voucher number.
    pub number: String,
    /// Line changes.
    #[serde(default)]
    pub lines: VoucherLineChanges,
}

/// Input for deleting a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteVoucherInput {
    /// The voucher to delete.
    pub id: VoucherId,
    /// The version the caller last read.
    pub version: i64,
}

/// What the engine needs to know about a subsidiary ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsidiaryLedgerInfo {
    /// The SL id.
    pub id: SubsidiaryLedgerId,
    /// Whether lines posting to this SL must carry a DL.
    pub requires_detail: bool,
}

/// A line as currently persisted, reduced to what delta validation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedLine {
    /// The line id.
    pub id: VoucherLineId,
    /// Stored debit.
    pub debit: i64,
    /// Stored credit.
    pub credit: i64,
}

/// Snapshot of a voucher taken inside the updating transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherState {
    /// The voucher id.
    pub id: VoucherId,
    /// The stored version.
    pub version: i64,
    /// All live lines of the voucher.
    pub lines: Vec<PersistedLine>,
}

/// Debit and credit sums, tracked independently.
///
/// Used both for absolute totals (create) and for net changes (update). Sums
/// are widened to `i128` so that 500 lines of `i64::MAX` cannot overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherTotals {
    /// Total (or net change of) debit.
    pub debit: i128,
    /// Total (or net change of) credit.
    pub credit: i128,
}

impl VoucherTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub const fn new(debit: i128, credit: i128) -> Self {
        Self { debit, credit }
    }

    /// Sums the given lines.
    #[must_use]
    pub fn of_lines<'a>(lines: impl IntoIterator<Item = &'a VoucherLineInput>) -> Self {
        lines.into_iter().fold(Self::default(), |mut totals, line| {
            totals.add(line.debit, line.credit);
            totals
        })
    }

    /// Adds a line's amounts.
    pub fn add(&mut self, debit: i64, credit: i64) {
        self.debit += i128::from(debit);
        self.credit += i128::from(credit);
    }

    /// Removes a line's amounts.
    pub fn remove(&mut self, debit: i64, credit: i64) {
        self.debit -= i128::from(debit);
        self.credit -= i128::from(credit);
    }

    /// Replaces `old` amounts with `new` amounts.
    pub fn replace(&mut self, old: (i64, i64), new: (i64, i64)) {
        self.remove(old.0, old.1);
        self.add(new.0, new.1);
    }

    /// Whether debits equal credits.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub const fn difference(&self) -> i128 {
        self.debit - self.credit
    }
}

/// Converts a collection length to the signed count domain.
#[must_use]
pub(crate) fn len_i64(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
