//! # Maintenance Commands

use serde::Serialize;
use tracing::warn;

use stockroom_core::{ClearDataFlags, ClearSummary};
use stockroom_db::Database;

use crate::cli::ClearArgs;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub healthy: bool,
    pub migrations_embedded: usize,
    pub migrations_applied: usize,
}

/// Opening the database already migrated it; this reports the result.
pub async fn init(db: &Database) -> Result<StatusResponse, ApiError> {
    let (embedded, applied) = db.migration_status().await?;

    Ok(StatusResponse {
        healthy: db.health_check().await,
        migrations_embedded: embedded,
        migrations_applied: applied,
    })
}

pub async fn clear(db: &Database, args: ClearArgs) -> Result<ClearSummary, ApiError> {
    let flags = if args.all {
        ClearDataFlags::all()
    } else {
        ClearDataFlags {
            clear_items: args.items,
            clear_sales: args.sales,
            clear_customers: args.customers,
            clear_dealers: args.dealers,
        }
    };

    if !flags.any() {
        return Err(ApiError::validation(
            "nothing to clear: pass --items, --sales, --customers, --dealers or --all",
        ));
    }

    if flags.clear_items && !flags.clear_sales {
        warn!("Clearing items while keeping sales leaves sale lines without their lot");
    }

    Ok(db.clear_data(flags).await?)
}
