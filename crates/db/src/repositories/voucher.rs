//! Voucher repository for voucher and voucher line database operations.
//!
//! Each mutating operation reads everything it validates against inside its
//! own transaction, validates through [`LedgerService`], and only then writes.
//! The voucher's current lines are read once per transaction and shared by
//! validation and application. Line deltas are applied in the order
//! delete, insert, update, and the header is compare-and-set last.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use tally_core::ledger::{
    CreateVoucherInput, DeleteVoucherInput, LedgerError, LedgerService, PersistedLine,
    SubsidiaryLedgerInfo, UpdateVoucherInput, VoucherLineInput, VoucherState, VoucherTotals,
};
use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId, VoucherId, VoucherLineId};
use tracing::{debug, info};

use super::support::{begin, finish, unexpected, within_deadline};
use crate::entities::{detail_ledgers, subsidiary_ledgers, voucher_lines, vouchers};

/// Voucher with its lines, ordered by line id.
#[derive(Debug, Clone, Serialize)]
pub struct VoucherWithLines {
    /// Voucher header.
    pub voucher: vouchers::Model,
    /// Voucher lines.
    pub lines: Vec<voucher_lines::Model>,
}

impl VoucherWithLines {
    /// Debit and credit totals over the lines.
    #[must_use]
    pub fn totals(&self) -> VoucherTotals {
        self.lines
            .iter()
            .fold(VoucherTotals::default(), |mut totals, line| {
                totals.add(line.debit, line.credit);
                totals
            })
    }
}

/// Voucher repository for the voucher engine operations.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    db: DatabaseConnection,
    timeout: Option<Duration>,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db, timeout: None }
    }

    /// Sets the deadline applied to every operation.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a voucher with all its lines atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The number is empty, too long or already used
    /// - The line count is outside [2, 500]
    /// - Debits and credits do not balance
    /// - A line is not single-sided, or its SL/DL is missing or mismatched
    pub async fn create_voucher(
        &self,
        input: CreateVoucherInput,
    ) -> Result<VoucherWithLines, LedgerError> {
        let created = within_deadline(self.timeout, "create_voucher", async {
            let txn = begin(&self.db).await?;
            let result = Self::insert_voucher(&txn, &input).await;
            finish(txn, result).await
        })
        .await?;

        info!(
            voucher_id = created.voucher.id,
            number = %created.voucher.number,
            lines = created.lines.len(),
            "Voucher created"
        );
        Ok(created)
    }

    /// Updates the voucher number and applies a three-way line delta.
    ///
    /// Returns the updated header with its version incremented by one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The number is empty, too long or used by another voucher
    /// - The voucher does not exist or the version is outdated
    /// - The resulting line count is outside [2, 500]
    /// - A changed line fails the per-line checks
    /// - An updated or deleted line is not on this voucher, or is named twice
    /// - The net change of debit differs from the net change of credit
    pub async fn update_voucher(
        &self,
        input: UpdateVoucherInput,
    ) -> Result<vouchers::Model, LedgerError> {
        let updated = within_deadline(self.timeout, "update_voucher", async {
            let txn = begin(&self.db).await?;
            let result = Self::apply_update(&txn, &input).await;
            finish(txn, result).await
        })
        .await?;

        info!(
            voucher_id = updated.id,
            version = updated.version,
            inserted = input.lines.inserted.len(),
            updated = input.lines.updated.len(),
            deleted = input.lines.deleted.len(),
            "Voucher updated"
        );
        Ok(updated)
    }

    /// Deletes a voucher and all of its lines.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` or `VersionOutdated`.
    pub async fn delete_voucher(&self, input: DeleteVoucherInput) -> Result<(), LedgerError> {
        let removed_lines = within_deadline(self.timeout, "delete_voucher", async {
            let txn = begin(&self.db).await?;
            let result = Self::remove_voucher(&txn, &input).await;
            finish(txn, result).await
        })
        .await?;

        info!(voucher_id = %input.id, removed_lines, "Voucher deleted");
        Ok(())
    }

    /// Gets a voucher with its lines.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound`.
    pub async fn get_voucher(&self, id: VoucherId) -> Result<VoucherWithLines, LedgerError> {
        within_deadline(self.timeout, "get_voucher", async {
            let txn = begin(&self.db).await?;
            let result = Self::find_voucher(&txn, id).await;
            finish(txn, result).await
        })
        .await
    }

    async fn insert_voucher(
        txn: &DatabaseTransaction,
        input: &CreateVoucherInput,
    ) -> Result<VoucherWithLines, LedgerError> {
        let number_taken = number_in_use(txn, &input.number, None).await?;
        let sls = load_subsidiary_ledgers(txn, input.lines.iter()).await?;
        let dls = load_detail_ledger_ids(txn, input.lines.iter()).await?;

        LedgerService::validate_create(
            input,
            number_taken,
            |id| sls.get(&id).copied(),
            |id| dls.contains(&id),
        )
        .inspect_err(|e| debug!(code = e.error_code(), "Voucher create rejected"))?;

        let now = chrono::Utc::now().into();
        let voucher = vouchers::ActiveModel {
            id: NotSet,
            number: Set(input.number.clone()),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(unexpected)?;

        insert_lines(txn, voucher.id, &input.lines, now).await?;
        let lines = find_lines(txn, voucher.id).await?;

        Ok(VoucherWithLines { voucher, lines })
    }

    async fn apply_update(
        txn: &DatabaseTransaction,
        input: &UpdateVoucherInput,
    ) -> Result<vouchers::Model, LedgerError> {
        let id = input.id.into_inner();
        let header = vouchers::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(unexpected)?;
        let current = if header.is_some() {
            find_lines(txn, id).await?
        } else {
            Vec::new()
        };
        let state = header.as_ref().map(|voucher| VoucherState {
            id: input.id,
            version: voucher.version,
            lines: current
                .iter()
                .map(|line| PersistedLine {
                    id: VoucherLineId::new(line.id),
                    debit: line.debit,
                    credit: line.credit,
                })
                .collect(),
        });

        let changes = &input.lines;
        let changed_lines = || {
            changes
                .inserted
                .iter()
                .chain(changes.updated.iter().map(|update| &update.line))
        };
        let number_taken = number_in_use(txn, &input.number, Some(input.id)).await?;
        let sls = load_subsidiary_ledgers(txn, changed_lines()).await?;
        let dls = load_detail_ledger_ids(txn, changed_lines()).await?;

        let delta = LedgerService::validate_update(
            input,
            state.as_ref(),
            number_taken,
            |sl_id| sls.get(&sl_id).copied(),
            |dl_id| dls.contains(&dl_id),
        )
        .inspect_err(|e| debug!(voucher_id = id, code = e.error_code(), "Voucher update rejected"))?;

        debug!(
            voucher_id = id,
            debit_delta = %delta.debit,
            credit_delta = %delta.credit,
            "Voucher update validated"
        );

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        if !changes.deleted.is_empty() {
            voucher_lines::Entity::delete_many()
                .filter(voucher_lines::Column::VoucherId.eq(id))
                .filter(
                    voucher_lines::Column::Id
                        .is_in(changes.deleted.iter().map(|line_id| line_id.into_inner())),
                )
                .exec(txn)
                .await
                .map_err(unexpected)?;
        }

        insert_lines(txn, id, &changes.inserted, now).await?;

        let line_versions: HashMap<i64, i64> =
            current.iter().map(|line| (line.id, line.version)).collect();
        update_lines(txn, input, &line_versions, now).await?;

        let result = vouchers::Entity::update_many()
            .col_expr(vouchers::Column::Number, Expr::value(input.number.clone()))
            .col_expr(
                vouchers::Column::Version,
                Expr::col(vouchers::Column::Version).add(1),
            )
            .col_expr(vouchers::Column::UpdatedAt, Expr::value(now))
            .filter(vouchers::Column::Id.eq(id))
            .filter(vouchers::Column::Version.eq(input.version))
            .exec(txn)
            .await
            .map_err(unexpected)?;

        if result.rows_affected != 1 {
            return Err(LedgerError::VersionOutdated {
                expected: input.version,
            });
        }

        vouchers::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(unexpected)?
            .ok_or(LedgerError::VoucherNotFound(input.id))
    }

    async fn remove_voucher(
        txn: &DatabaseTransaction,
        input: &DeleteVoucherInput,
    ) -> Result<u64, LedgerError> {
        let id = input.id.into_inner();
        let header = vouchers::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(unexpected)?;

        LedgerService::validate_delete(input, header.map(|voucher| voucher.version))
            .inspect_err(|e| debug!(voucher_id = id, code = e.error_code(), "Voucher delete rejected"))?;

        let lines = voucher_lines::Entity::delete_many()
            .filter(voucher_lines::Column::VoucherId.eq(id))
            .exec(txn)
            .await
            .map_err(unexpected)?;

        let result = vouchers::Entity::delete_many()
            .filter(vouchers::Column::Id.eq(id))
            .filter(vouchers::Column::Version.eq(input.version))
            .exec(txn)
            .await
            .map_err(unexpected)?;

        if result.rows_affected == 1 {
            Ok(lines.rows_affected)
        } else {
            Err(LedgerError::VersionOutdated {
                expected: input.version,
            })
        }
    }

    async fn find_voucher(
        txn: &DatabaseTransaction,
        id: VoucherId,
    ) -> Result<VoucherWithLines, LedgerError> {
        let voucher = vouchers::Entity::find_by_id(id.into_inner())
            .one(txn)
            .await
            .map_err(unexpected)?
            .ok_or(LedgerError::VoucherNotFound(id))?;
        let lines = find_lines(txn, voucher.id).await?;

        Ok(VoucherWithLines { voucher, lines })
    }
}

/// Whether a voucher other than `exclude` already uses `number`.
async fn number_in_use<C: ConnectionTrait>(
    conn: &C,
    number: &str,
    exclude: Option<VoucherId>,
) -> Result<bool, LedgerError> {
    let mut query = vouchers::Entity::find().filter(vouchers::Column::Number.eq(number));
    if let Some(id) = exclude {
        query = query.filter(vouchers::Column::Id.ne(id.into_inner()));
    }
    let count = query.count(conn).await.map_err(unexpected)?;
    Ok(count > 0)
}

/// Loads the subsidiary ledgers referenced by `lines`, keyed by id.
async fn load_subsidiary_ledgers<'a, C: ConnectionTrait>(
    conn: &C,
    lines: impl Iterator<Item = &'a VoucherLineInput>,
) -> Result<HashMap<SubsidiaryLedgerId, SubsidiaryLedgerInfo>, LedgerError> {
    let ids: BTreeSet<i64> = lines.map(|line| line.sl_id.into_inner()).collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let found = subsidiary_ledgers::Entity::find()
        .filter(subsidiary_ledgers::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(unexpected)?;

    Ok(found
        .into_iter()
        .map(|sl| {
            let id = SubsidiaryLedgerId::new(sl.id);
            (
                id,
                SubsidiaryLedgerInfo {
                    id,
                    requires_detail: sl.requires_detail,
                },
            )
        })
        .collect())
}

/// Loads which of the detail ledgers referenced by `lines` exist.
async fn load_detail_ledger_ids<'a, C: ConnectionTrait>(
    conn: &C,
    lines: impl Iterator<Item = &'a VoucherLineInput>,
) -> Result<HashSet<DetailLedgerId>, LedgerError> {
    let ids: BTreeSet<i64> = lines
        .filter_map(|line| line.dl_id.map(DetailLedgerId::into_inner))
        .collect();
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let found = detail_ledgers::Entity::find()
        .filter(detail_ledgers::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(unexpected)?;

    Ok(found
        .into_iter()
        .map(|dl| DetailLedgerId::new(dl.id))
        .collect())
}

/// Inserts `lines` for a voucher in one batch.
async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    voucher_id: i64,
    lines: &[VoucherLineInput],
    now: DateTimeWithTimeZone,
) -> Result<(), LedgerError> {
    if lines.is_empty() {
        return Ok(());
    }

    let models = lines.iter().map(|line| voucher_lines::ActiveModel {
        id: NotSet,
        voucher_id: Set(voucher_id),
        sl_id: Set(line.sl_id.into_inner()),
        dl_id: Set(line.dl_id.map(DetailLedgerId::into_inner)),
        debit: Set(line.debit),
        credit: Set(line.credit),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    });

    voucher_lines::Entity::insert_many(models)
        .exec(conn)
        .await
        .map_err(unexpected)?;
    Ok(())
}

/// Replaces updated lines in place, bumping each line's version.
///
/// Each write is compare-and-set on the line version read earlier in the
/// same transaction.
async fn update_lines<C: ConnectionTrait>(
    conn: &C,
    input: &UpdateVoucherInput,
    line_versions: &HashMap<i64, i64>,
    now: DateTimeWithTimeZone,
) -> Result<(), LedgerError> {
    for update in &input.lines.updated {
        let Some(&line_version) = line_versions.get(&update.id.into_inner()) else {
            return Err(LedgerError::LineNotFound(update.id));
        };
        let result = voucher_lines::Entity::update_many()
            .col_expr(
                voucher_lines::Column::SlId,
                Expr::value(update.line.sl_id.into_inner()),
            )
            .col_expr(
                voucher_lines::Column::DlId,
                Expr::value(update.line.dl_id.map(DetailLedgerId::into_inner)),
            )
            .col_expr(voucher_lines::Column::Debit, Expr::value(update.line.debit))
            .col_expr(voucher_lines::Column::Credit, Expr::value(update.line.credit))
            .col_expr(
                voucher_lines::Column::Version,
                Expr::col(voucher_lines::Column::Version).add(1),
            )
            .col_expr(voucher_lines::Column::UpdatedAt, Expr::value(now))
            .filter(voucher_lines::Column::Id.eq(update.id.into_inner()))
            .filter(voucher_lines::Column::VoucherId.eq(input.id.into_inner()))
            .filter(voucher_lines::Column::Version.eq(line_version))
            .exec(conn)
            .await
            .map_err(unexpected)?;

        if result.rows_affected != 1 {
            return Err(LedgerError::VersionOutdated {
                expected: input.version,
            });
        }
    }
    Ok(())
}

/// All lines of a voucher, ordered by id.
async fn find_lines<C: ConnectionTrait>(
    conn: &C,
    voucher_id: i64,
) -> Result<Vec<voucher_lines::Model>, LedgerError> {
    voucher_lines::Entity::find()
        .filter(voucher_lines::Column::VoucherId.eq(voucher_id))
        .order_by_asc(voucher_lines::Column::Id)
        .all(conn)
        .await
        .map_err(unexpected)
}
