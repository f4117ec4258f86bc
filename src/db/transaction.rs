/*!
 * Transaction Helper Utilities
 *
 * Every service operation opens exactly one transaction with [`begin`] or
 * [`begin_read_only`], runs its repository calls against it and hands the
 * outcome to [`finish`], which commits on success and rolls back on error.
 */

use metrics::counter;
use sea_orm::{AccessMode, ConnectionTrait, DatabaseTransaction, DbBackend, TransactionTrait};
use tracing::{debug, warn};

use super::DbPool;
use crate::errors::ServiceError;

/// Opens a read-write transaction.
pub async fn begin(db: &DbPool) -> Result<DatabaseTransaction, ServiceError> {
    let txn = db.begin().await?;
    counter!("warehouse_db.transaction.started", 1);
    debug!("Started read-write transaction");
    Ok(txn)
}

/// Opens a read-only transaction where the backend supports access modes.
/// SQLite has no such mode and gets a plain transaction.
pub async fn begin_read_only(db: &DbPool) -> Result<DatabaseTransaction, ServiceError> {
    let supports_access_mode = matches!(
        db.get_database_backend(),
        DbBackend::Postgres | DbBackend::MySql
    );
    let txn = if supports_access_mode {
        db.begin_with_config(None, Some(AccessMode::ReadOnly))
            .await?
    } else {
        db.begin().await?
    };
    counter!("warehouse_db.transaction.started", 1, "mode" => "read_only");
    debug!("Started read-only transaction");
    Ok(txn)
}

/// Commits `txn` when `result` is `Ok`, rolls it back otherwise.
///
/// The original error is returned even if the rollback itself fails.
pub async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            counter!("warehouse_db.transaction.committed", 1);
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            counter!("warehouse_db.transaction.rolled_back", 1);
            debug!(error = %err, "Transaction rolled back");
            Err(err)
        }
    }
}
