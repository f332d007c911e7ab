//! Detail ledger repository.
//!
//! Every mutation runs its checks and its write inside one transaction.
//! Updates and deletes are compare-and-set on `version`.

use std::time::Duration;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, Set,
};
use tally_core::ledger::LedgerError;
use tally_core::registry::{
    CreateDetailLedgerInput, RegistryEntry, RegistryService, UpdateDetailLedgerInput,
};
use tally_shared::types::DetailLedgerId;
use tracing::{debug, info};

use super::registry::{count_references, find_conflicts};
use super::support::{begin, finish, unexpected, within_deadline};
use crate::entities::detail_ledgers;

/// Detail ledger repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct DetailLedgerRepository {
    db: DatabaseConnection,
    timeout: Option<Duration>,
}

impl DetailLedgerRepository {
    /// Creates a new detail ledger repository.
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

    /// Creates a detail ledger at version 0.
    ///
    /// # Errors
    ///
    /// Returns a length error, `CodeAlreadyExists` or `TitleAlreadyExists`.
    pub async fn create_detail_ledger(
        &self,
        input: CreateDetailLedgerInput,
    ) -> Result<detail_ledgers::Model, LedgerError> {
        let created = within_deadline(self.timeout, "create_detail_ledger", async {
            let txn = begin(&self.db).await?;
            let result = Self::insert(&txn, &input).await;
            finish(txn, result).await
        })
        .await?;

        info!(dl_id = created.id, code = %created.code, "Detail ledger created");
        Ok(created)
    }

    /// Updates code and title, bumping the version by one.
    ///
    /// # Errors
    ///
    /// Returns a length error, `DetailLedgerNotFound`, `VersionOutdated`,
    /// `CodeAlreadyExists` or `TitleAlreadyExists`.
    pub async fn update_detail_ledger(
        &self,
        input: UpdateDetailLedgerInput,
    ) -> Result<detail_ledgers::Model, LedgerError> {
        let updated = within_deadline(self.timeout, "update_detail_ledger", async {
            let txn = begin(&self.db).await?;
            let result = Self::update(&txn, &input).await;
            finish(txn, result).await
        })
        .await?;

        info!(dl_id = updated.id, version = updated.version, "Detail ledger updated");
        Ok(updated)
    }

    /// Hard-deletes an unreferenced detail ledger.
    ///
    /// # Errors
    ///
    /// Returns `DetailLedgerNotFound`, `VersionOutdated` or
    /// `ReferencedByVoucherLine`.
    pub async fn delete_detail_ledger(
        &self,
        id: DetailLedgerId,
        version: i64,
    ) -> Result<(), LedgerError> {
        within_deadline(self.timeout, "delete_detail_ledger", async {
            let txn = begin(&self.db).await?;
            let result = Self::delete(&txn, id, version).await;
            finish(txn, result).await
        })
        .await?;

        info!(dl_id = %id, "Detail ledger deleted");
        Ok(())
    }

    /// Gets a detail ledger by id.
    ///
    /// # Errors
    ///
    /// Returns `DetailLedgerNotFound`.
    pub async fn get_detail_ledger(
        &self,
        id: DetailLedgerId,
    ) -> Result<detail_ledgers::Model, LedgerError> {
        within_deadline(self.timeout, "get_detail_ledger", async {
            detail_ledgers::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await
                .map_err(unexpected)?
                .ok_or(LedgerError::DetailLedgerNotFound(id))
        })
        .await
    }

    async fn insert(
        txn: &DatabaseTransaction,
        input: &CreateDetailLedgerInput,
    ) -> Result<detail_ledgers::Model, LedgerError> {
        let conflicts =
            find_conflicts::<detail_ledgers::Entity, _>(txn, &input.code, &input.title, None)
                .await?;
        RegistryService::validate_create(
            &input.code,
            &input.title,
            conflicts.iter().map(|m| (m.code.as_str(), m.title.as_str())),
        )
        .inspect_err(|e| debug!(code = e.error_code(), "Detail ledger create rejected"))?;

        let now = chrono::Utc::now().into();
        let dl = detail_ledgers::ActiveModel {
            id: NotSet,
            code: Set(input.code.clone()),
            title: Set(input.title.clone()),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        dl.insert(txn).await.map_err(unexpected)
    }

    async fn update(
        txn: &DatabaseTransaction,
        input: &UpdateDetailLedgerInput,
    ) -> Result<detail_ledgers::Model, LedgerError> {
        let id = input.id.into_inner();
        let stored = detail_ledgers::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(unexpected)?;
        let conflicts =
            find_conflicts::<detail_ledgers::Entity, _>(txn, &input.code, &input.title, Some(id)).await?;

        RegistryService::validate_update(
            RegistryEntry::Detail(input.id),
            &input.code,
            &input.title,
            input.version,
            stored.map(|m| m.version),
            conflicts.iter().map(|m| (m.code.as_str(), m.title.as_str())),
            0,
        )
        .inspect_err(|e| debug!(dl_id = id, code = e.error_code(), "Detail ledger update rejected"))?;

        let result = detail_ledgers::Entity::update_many()
            .col_expr(detail_ledgers::Column::Code, Expr::value(input.code.clone()))
            .col_expr(detail_ledgers::Column::Title, Expr::value(input.title.clone()))
            .col_expr(
                detail_ledgers::Column::Version,
                Expr::col(detail_ledgers::Column::Version).add(1),
            )
            .col_expr(
                detail_ledgers::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(detail_ledgers::Column::Id.eq(id))
            .filter(detail_ledgers::Column::Version.eq(input.version))
            .exec(txn)
            .await
            .map_err(unexpected)?;

        if result.rows_affected != 1 {
            return Err(LedgerError::VersionOutdated {
                expected: input.version,
            });
        }

        detail_ledgers::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(unexpected)?
            .ok_or(LedgerError::DetailLedgerNotFound(input.id))
    }

    async fn delete(
        txn: &DatabaseTransaction,
        id: DetailLedgerId,
        version: i64,
    ) -> Result<(), LedgerError> {
        let stored = detail_ledgers::Entity::find_by_id(id.into_inner())
            .one(txn)
            .await
            .map_err(unexpected)?;
        let references = count_references::<detail_ledgers::Entity, _>(txn, id.into_inner()).await?;

        RegistryService::validate_delete(
            RegistryEntry::Detail(id),
            version,
            stored.map(|m| m.version),
            references,
        )
        .inspect_err(|e| debug!(dl_id = %id, code = e.error_code(), "Detail ledger delete rejected"))?;

        let result = detail_ledgers::Entity::delete_many()
            .filter(detail_ledgers::Column::Id.eq(id.into_inner()))
            .filter(detail_ledgers::Column::Version.eq(version))
            .exec(txn)
            .await
            .map_err(unexpected)?;

        if result.rows_affected == 1 {
            Ok(())
        } else {
            Err(LedgerError::VersionOutdated { expected: version })
        }
    }
}
