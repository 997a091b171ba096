//! # Sale Commands

use serde::Serialize;
use tracing::info;

use stockroom_core::{CustomerInfo, Money, SaleRequest};
use stockroom_db::Database;

use crate::cli::SellArgs;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub customer_id: i64,
    pub sale_ids: Vec<i64>,
    pub quantity_per_line: i64,
    #[serde(serialize_with = "crate::commands::decimal::serialize")]
    pub total_price: Money,
}

/// Sells `quantity` units from every listed lot, or nothing at all.
pub async fn sell(db: &Database, args: SellArgs) -> Result<SaleResponse, ApiError> {
    let request = SaleRequest::from_parallel(
        args.product_ids,
        args.batch_nos,
        args.quantity,
        args.total_price,
        CustomerInfo::new(args.customer_name, args.phone, args.address),
    )?;

    let receipt = db.sell(&request).await?;

    info!(
        customer_id = receipt.customer_id,
        lines = receipt.lines.len(),
        "sell command completed"
    );

    Ok(SaleResponse {
        customer_id: receipt.customer_id,
        sale_ids: receipt.lines.iter().map(|line| line.id).collect(),
        quantity_per_line: request.quantity_per_line,
        total_price: request.total_price,
    })
}
