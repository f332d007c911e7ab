//! Transaction and error plumbing shared by the ledger repositories.

use std::future::Future;
use std::time::Duration;

use sea_orm::{DatabaseTransaction, DbErr, TransactionTrait};
use tally_core::ledger::LedgerError;
use tracing::{error, warn};

/// Maps a storage failure to the opaque `Unexpected` error, logging the cause.
pub(crate) fn unexpected(err: DbErr) -> LedgerError {
    error!(error = %err, "Database operation failed");
    LedgerError::Unexpected
}

/// Commits on success, rolls back on failure.
pub(crate) async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, LedgerError>,
) -> Result<T, LedgerError> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(unexpected)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

/// Runs `operation` under the configured deadline.
///
/// On expiry the future is dropped, which rolls back any open transaction.
pub(crate) async fn within_deadline<T>(
    timeout: Option<Duration>,
    operation: &'static str,
    future: impl Future<Output = Result<T, LedgerError>>,
) -> Result<T, LedgerError> {
    let Some(limit) = timeout else {
        return future.await;
    };

    if let Ok(result) = tokio::time::timeout(limit, future).await {
        result
    } else {
        warn!(operation, timeout = ?limit, "Ledger operation timed out");
        Err(LedgerError::Unexpected)
    }
}

/// Begins a transaction on any connection.
pub(crate) async fn begin<C: TransactionTrait>(db: &C) -> Result<DatabaseTransaction, LedgerError> {
    db.begin().await.map_err(unexpected)
}
