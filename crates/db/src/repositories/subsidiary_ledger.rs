//! Subsidiary ledger repository.
//!
//! Same contract as the detail ledger repository, plus the `requires_detail`
//! flag. A referenced SL can be neither updated nor deleted.

use std::time::Duration;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, Set,
};
use tally_core::ledger::LedgerError;
use tally_core::registry::{
    CreateSubsidiaryLedgerInput, RegistryEntry, RegistryService, UpdateSubsidiaryLedgerInput,
};
use tally_shared::types::SubsidiaryLedgerId;
use tracing::{debug, info};

use super::registry::{count_references, find_conflicts};
use super::support::{begin, finish, unexpected, within_deadline};
use crate::entities::subsidiary_ledgers;

/// Subsidiary ledger repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SubsidiaryLedgerRepository {
    db: DatabaseConnection,
    timeout: Option<Duration>,
}

impl SubsidiaryLedgerRepository {
    /// Creates a new subsidiary ledger repository.
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

    /// Creates a subsidiary ledger at version 0.
    ///
    /// # Errors
    ///
    /// Returns a length error, `CodeAlreadyExists` or `TitleAlreadyExists`.
    pub async fn create_subsidiary_ledger(
        &self,
        input: CreateSubsidiaryLedgerInput,
    ) -> Result<subsidiary_ledgers::Model, LedgerError> {
        let created = within_deadline(self.timeout, "create_subsidiary_ledger", async {
            let txn = begin(&self.db).await?;
            let result = Self::insert(&txn, &input).await;
            finish(txn, result).await
        })
        .await?;

        info!(
            sl_id = created.id,
            code = %created.code,
            requires_detail = created.requires_detail,
            "Subsidiary ledger created"
        );
        Ok(created)
    }

    /// Updates code, title and detail requirement of an unreferenced SL.
    ///
    /// # Errors
    ///
    /// Returns a length error, `SubsidiaryLedgerNotFound`, `VersionOutdated`,
    /// `CodeAlreadyExists`, `TitleAlreadyExists` or `ReferencedByVoucherLine`.
    pub async fn update_subsidiary_ledger(
        &self,
        input: UpdateSubsidiaryLedgerInput,
    ) -> Result<subsidiary_ledgers::Model, LedgerError> {
        let updated = within_deadline(self.timeout, "update_subsidiary_ledger", async {
            let txn = begin(&self.db).await?;
            let result = Self::update(&txn, &input).await;
            finish(txn, result).await
        })
        .await?;

        info!(sl_id = updated.id, version = updated.version, "Subsidiary ledger updated");
        Ok(updated)
    }

    /// Hard-deletes an unreferenced subsidiary ledger.
    ///
    /// # Errors
    ///
    /// Returns `SubsidiaryLedgerNotFound`, `VersionOutdated` or
    /// `ReferencedByVoucherLine`.
    pub async fn delete_subsidiary_ledger(
        &self,
        id: SubsidiaryLedgerId,
        version: i64,
    ) -> Result<(), LedgerError> {
        within_deadline(self.timeout, "delete_subsidiary_ledger", async {
            let txn = begin(&self.db).await?;
            let result = Self::delete(&txn, id, version).await;
            finish(txn, result).await
        })
        .await?;

        info!(sl_id = %id, "Subsidiary ledger deleted");
        Ok(())
    }

    /// Gets a subsidiary ledger by id.
    ///
    /// # Errors
    ///
    /// Returns `SubsidiaryLedgerNotFound`.
    pub async fn get_subsidiary_ledger(
        &self,
        id: SubsidiaryLedgerId,
    ) -> Result<subsidiary_ledgers::Model, LedgerError> {
        within_deadline(self.timeout, "get_subsidiary_ledger", async {
            subsidiary_ledgers::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await
                .map_err(unexpected)?
                .ok_or(LedgerError::SubsidiaryLedgerNotFound(id))
        })
        .await
    }

    async fn insert(
        txn: &DatabaseTransaction,
        input: &CreateSubsidiaryLedgerInput,
    ) -> Result<subsidiary_ledgers::Model, LedgerError> {
        let conflicts =
            find_conflicts::<subsidiary_ledgers::Entity, _>(txn, &input.code, &input.title, None)
                .await?;
        RegistryService::validate_create(
            &input.code,
            &input.title,
            conflicts.iter().map(|m| (m.code.as_str(), m.title.as_str())),
        )
        .inspect_err(|e| debug!(code = e.error_code(), "Subsidiary ledger create rejected"))?;

        let now = chrono::Utc::now().into();
        let sl = subsidiary_ledgers::ActiveModel {
            id: NotSet,
            code: Set(input.code.clone()),
            title: Set(input.title.clone()),
            requires_detail: Set(input.requires_detail),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        sl.insert(txn).await.map_err(unexpected)
    }

    async fn update(
        txn: &DatabaseTransaction,
        input: &UpdateSubsidiaryLedgerInput,
    ) -> Result<subsidiary_ledgers::Model, LedgerError> {
        let id = input.id.into_inner();
        let stored = subsidiary_ledgers::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(unexpected)?;
        let conflicts =
            find_conflicts::<subsidiary_ledgers::Entity, _>(txn, &input.code, &input.title, Some(id)).await?;
        let references = count_references::<subsidiary_ledgers::Entity, _>(txn, id).await?;

        RegistryService::validate_update(
            RegistryEntry::Subsidiary(input.id),
            &input.code,
            &input.title,
            input.version,
            stored.map(|m| m.version),
            conflicts.iter().map(|m| (m.code.as_str(), m.title.as_str())),
            references,
        )
        .inspect_err(|e| debug!(sl_id = id, code = e.error_code(), "Subsidiary ledger update rejected"))?;

        let result = subsidiary_ledgers::Entity::update_many()
            .col_expr(subsidiary_ledgers::Column::Code, Expr::value(input.code.clone()))
            .col_expr(subsidiary_ledgers::Column::Title, Expr::value(input.title.clone()))
            .col_expr(
                subsidiary_ledgers::Column::RequiresDetail,
                Expr::value(input.requires_detail),
            )
            .col_expr(
                subsidiary_ledgers::Column::Version,
                Expr::col(subsidiary_ledgers::Column::Version).add(1),
            )
            .col_expr(
                subsidiary_ledgers::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(subsidiary_ledgers::Column::Id.eq(id))
            .filter(subsidiary_ledgers::Column::Version.eq(input.version))
            .exec(txn)
            .await
            .map_err(unexpected)?;

        if result.rows_affected != 1 {
            return Err(LedgerError::VersionOutdated {
                expected: input.version,
            });
        }

        subsidiary_ledgers::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(unexpected)?
            .ok_or(LedgerError::SubsidiaryLedgerNotFound(input.id))
    }

    async fn delete(
        txn: &DatabaseTransaction,
        id: SubsidiaryLedgerId,
        version: i64,
    ) -> Result<(), LedgerError> {
        let stored = subsidiary_ledgers::Entity::find_by_id(id.into_inner())
            .one(txn)
            .await
            .map_err(unexpected)?;
        let references = count_references::<subsidiary_ledgers::Entity, _>(txn, id.into_inner()).await?;

        RegistryService::validate_delete(
            RegistryEntry::Subsidiary(id),
            version,
            stored.map(|m| m.version),
            references,
        )
        .inspect_err(|e| debug!(sl_id = %id, code = e.error_code(), "Subsidiary ledger delete rejected"))?;

        let result = subsidiary_ledgers::Entity::delete_many()
            .filter(subsidiary_ledgers::Column::Id.eq(id.into_inner()))
            .filter(subsidiary_ledgers::Column::Version.eq(version))
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
