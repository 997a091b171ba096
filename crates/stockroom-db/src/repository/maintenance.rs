//! # Maintenance Repository
//!
//! Bulk clear: empties whole relations on request.
//!
//! Each flag is independent and nothing cascades. Clearing `items` while
//! `sales` still point at them is allowed and leaves those lines dangling;
//! reports skip them. All requested deletions commit together or not at all.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info};

use stockroom_core::{ClearDataFlags, ClearSummary};

use crate::error::{DbError, DbResult};

/// Repository for bulk maintenance operations.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    pool: SqlitePool,
}

impl MaintenanceRepository {
    /// Creates a new MaintenanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaintenanceRepository { pool }
    }

    /// Deletes every row of each flagged relation.
    ///
    /// ## Returns
    /// Rows removed per relation; unflagged relations report 0.
    pub async fn clear_data(&self, flags: ClearDataFlags) -> DbResult<ClearSummary> {
        if !flags.any() {
            debug!("Clear requested with no relations flagged");
            return Ok(ClearSummary::default());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut summary = ClearSummary::default();

        if flags.clear_items {
            summary.items = delete_all(&mut *tx, "items").await?;
        }
        if flags.clear_sales {
            summary.sales = delete_all(&mut *tx, "sales").await?;
        }
        if flags.clear_customers {
            summary.customers = delete_all(&mut *tx, "customers").await?;
        }
        if flags.clear_dealers {
            summary.dealers = delete_all(&mut *tx, "dealers").await?;
        }

        tx.commit().await.map_err(|e| {
            error!(error = %e, "Bulk clear commit failed");
            DbError::TransactionFailed(e.to_string())
        })?;

        info!(
            items = summary.items,
            sales = summary.sales,
            customers = summary.customers,
            dealers = summary.dealers,
            "Bulk clear committed"
        );

        Ok(summary)
    }
}

/// `table` is always one of the fixed relation names above, never input.
async fn delete_all(conn: &mut SqliteConnection, table: &'static str) -> DbResult<u64> {
    let result = sqlx::query(&format!("DELETE FROM {table}"))
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!(error = %e, table, "Bulk clear failed");
            DbError::from(e)
        })?;

    debug!(table, rows = result.rows_affected(), "Cleared relation");
    Ok(result.rows_affected())
}
