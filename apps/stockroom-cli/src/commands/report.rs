//! # Report Commands

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use stockroom_core::{ActivityReport, Money, ReportEntry, ReportFilters};
use stockroom_db::Database;

use crate::cli::ReportArgs;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub date: NaiveDate,
    pub added_products: Vec<ReportRecord>,
    pub sold_products: Vec<ReportRecord>,
    #[serde(serialize_with = "crate::commands::decimal::serialize")]
    pub sold_total: Money,
}

/// One event, in the shape shared by both lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub item: String,
    pub quantity: i64,
    pub batch_no: String,
    pub manufacture_date: NaiveDate,
    pub dealer_name: Option<String>,
    pub date: DateTime<Utc>,
    pub customer_name: Option<String>,
    #[serde(serialize_with = "crate::commands::decimal::serialize_option")]
    pub total_price: Option<Money>,
}

impl From<ReportEntry> for ReportRecord {
    fn from(entry: ReportEntry) -> Self {
        ReportRecord {
            item: entry.item,
            quantity: entry.quantity,
            batch_no: entry.batch_no,
            manufacture_date: entry.manufacture_date,
            dealer_name: entry.dealer_name,
            date: entry.event_at,
            customer_name: entry.customer_name,
            total_price: entry.total_price,
        }
    }
}

impl From<ActivityReport> for ReportResponse {
    fn from(report: ActivityReport) -> Self {
        let sold_total = report.sold_total();
        ReportResponse {
            date: report.date,
            added_products: report.added_products.into_iter().map(Into::into).collect(),
            sold_products: report.sold_products.into_iter().map(Into::into).collect(),
            sold_total,
        }
    }
}

/// Builds the activity report; the day defaults to today (UTC).
pub async fn build_report(db: &Database, args: ReportArgs) -> Result<ReportResponse, ApiError> {
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let filters = ReportFilters {
        dealer_name: args.dealer_name,
        customer_name: args.customer_name,
        start_date: args.start_date,
        end_date: args.end_date,
    };

    let report = db.report(date, &filters).await?;
    Ok(report.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SellArgs;
    use crate::commands::sale::sell;
    use crate::commands::stock::add_item;
    use crate::commands::test_support::{db, lot};

    fn args_for(date: Option<NaiveDate>) -> ReportArgs {
        ReportArgs {
            date,
            dealer_name: None,
            customer_name: None,
            start_date: None,
            end_date: None,
        }
    }

    #[tokio::test]
    async fn test_today_report_in_wire_shape() {
        let db = db().await;
        let item = add_item(&db, lot("Paracetamol", "B1", 10)).await.unwrap();
        sell(
            &db,
            SellArgs {
                product_ids: vec![item.id],
                batch_nos: vec!["B1".to_string()],
                quantity: 2,
                total_price: Money::from_cents(500),
                customer_name: "Alice".to_string(),
                phone: String::new(),
                address: String::new(),
            },
        )
        .await
        .unwrap();

        let response = build_report(&db, args_for(None)).await.unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["addedProducts"].as_array().unwrap().len(), 1);
        assert_eq!(json["soldProducts"].as_array().unwrap().len(), 1);
        assert!(json["addedProducts"][0]["customerName"].is_null());
        assert!(json["soldProducts"][0]["dealerName"].is_null());
        assert!(json["addedProducts"][0]["totalPrice"].is_null());
        assert_eq!(json["soldProducts"][0]["totalPrice"], "5.00");
        assert_eq!(json["soldTotal"], "5.00");
    }

    #[tokio::test]
    async fn test_quiet_day_is_empty() {
        let db = db().await;
        add_item(&db, lot("Paracetamol", "B1", 10)).await.unwrap();

        let response = build_report(&db, args_for(NaiveDate::from_ymd_opt(2001, 1, 1)))
            .await
            .unwrap();

        assert!(response.added_products.is_empty());
        assert!(response.sold_products.is_empty());
    }
}
