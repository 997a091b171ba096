//! # Report Repository
//!
//! Builds the daily activity report: lots added and sale lines recorded on
//! one calendar day (UTC).
//!
//! ## Filter Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  added:  items                                                          │
//! │          WHERE date(added_at) = :date                                   │
//! │          [AND date(added_at) BETWEEN :start AND :end]  both bounds only │
//! │          [AND dealer_name = :dealer]                                    │
//! │                                                                         │
//! │  sold:   sales ⋈ items ⋈ customers                                      │
//! │          WHERE date(sale_date) = :date                                  │
//! │          [AND date(sale_date) BETWEEN :start AND :end]                  │
//! │          [AND customers.name = :customer]                               │
//! │                                                                         │
//! │  The range narrows the day, it never replaces it: a range that does    │
//! │  not contain :date yields an empty report.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sale lines whose lot or customer has been bulk-cleared have nothing to
//! join against and drop out of the sold list.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, error};

use stockroom_core::{ActivityReport, ReportEntry, ReportFilters};

use crate::error::DbResult;

/// Repository for activity reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Builds the report for `date`.
    ///
    /// A day with no activity yields two empty lists, not an error. If
    /// either query fails the whole report fails.
    pub async fn build(&self, date: NaiveDate, filters: &ReportFilters) -> DbResult<ActivityReport> {
        debug!(%date, ?filters, "Building activity report");

        let added = self.added_entries(date, filters).await.map_err(|e| {
            error!(error = %e, %date, "Added-products query failed");
            e
        })?;
        let sold = self.sold_entries(date, filters).await.map_err(|e| {
            error!(error = %e, %date, "Sold-products query failed");
            e
        })?;

        debug!(added = added.len(), sold = sold.len(), "Activity report built");

        Ok(ActivityReport::from_entries(date, added.into_iter().chain(sold)))
    }

    async fn added_entries(&self, date: NaiveDate, filters: &ReportFilters) -> DbResult<Vec<ReportEntry>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT
                'added'            AS kind,
                i.name             AS item,
                i.quantity         AS quantity,
                i.batch_no         AS batch_no,
                i.manufacture_date AS manufacture_date,
                i.dealer_name      AS dealer_name,
                i.added_at         AS event_at,
                NULL               AS customer_name,
                NULL               AS total_price
            FROM items i
            WHERE date(i.added_at) = "#,
        );
        query.push_bind(date);

        if let Some((start, end)) = filters.date_range() {
            query
                .push(" AND date(i.added_at) BETWEEN ")
                .push_bind(start)
                .push(" AND ")
                .push_bind(end);
        }

        if let Some(dealer) = filters.dealer_name() {
            query.push(" AND i.dealer_name = ").push_bind(dealer);
        }

        query.push(" ORDER BY i.id");

        let entries = query
            .build_query_as::<ReportEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn sold_entries(&self, date: NaiveDate, filters: &ReportFilters) -> DbResult<Vec<ReportEntry>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT
                'sold'             AS kind,
                i.name             AS item,
                s.quantity         AS quantity,
                i.batch_no         AS batch_no,
                i.manufacture_date AS manufacture_date,
                NULL               AS dealer_name,
                s.sale_date        AS event_at,
                c.name             AS customer_name,
                s.total_price      AS total_price
            FROM sales s
            JOIN items i ON i.id = s.product_id
            JOIN customers c ON c.id = s.customer_id
            WHERE date(s.sale_date) = "#,
        );
        query.push_bind(date);

        if let Some((start, end)) = filters.date_range() {
            query
                .push(" AND date(s.sale_date) BETWEEN ")
                .push_bind(start)
                .push(" AND ")
                .push_bind(end);
        }

        if let Some(customer) = filters.customer_name() {
            query.push(" AND c.name = ").push_bind(customer);
        }

        query.push(" ORDER BY s.id");

        let entries = query
            .build_query_as::<ReportEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use stockroom_core::{ClearDataFlags, CustomerInfo, EventKind, Item, Money, NewItem, SaleRequest};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn add_lot(db: &Database, name: &str, dealer: &str, quantity: i64) -> Item {
        db.items()
            .add_item(&NewItem {
                name: name.to_string(),
                quantity,
                batch_no: format!("{}-1", &name[..3]),
                manufacture_date: day(2024, 1, 1),
                expiry_date: day(2026, 1, 1),
                dealer_name: dealer.to_string(),
                price: Money::from_cents(1000),
            })
            .await
            .unwrap()
    }

    async fn sell(db: &Database, item: &Item, customer: &str, total_cents: i64) -> i64 {
        db.sell(&SaleRequest {
            lines: vec![item.key()],
            quantity_per_line: 1,
            total_price: Money::from_cents(total_cents),
            customer: CustomerInfo::new(customer, "", ""),
        })
        .await
        .unwrap()
        .customer_id
    }

    /// Moves every lot and sale line to noon UTC on `date`.
    async fn backdate_all(db: &Database, date: NaiveDate) {
        let at = Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap());
        sqlx::query("UPDATE items SET added_at = ?1")
            .bind(at)
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("UPDATE sales SET sale_date = ?1")
            .bind(at)
            .execute(db.pool())
            .await
            .unwrap();
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let para = add_lot(&db, "Paracetamol", "Himal Pharma", 10).await;
        let cet = add_lot(&db, "Cetirizine", "Everest Distributors", 10).await;
        sell(&db, &para, "Alice", 250).await;
        sell(&db, &cet, "Bob", 400).await;
        backdate_all(&db, day(2024, 5, 1)).await;
        db
    }

    #[tokio::test]
    async fn test_day_without_activity_is_empty() {
        let db = seeded().await;

        let report = db
            .report(day(2024, 5, 2), &ReportFilters::default())
            .await
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.date, day(2024, 5, 2));
    }

    #[tokio::test]
    async fn test_partitions_added_and_sold() {
        let db = seeded().await;

        let report = db
            .report(day(2024, 5, 1), &ReportFilters::default())
            .await
            .unwrap();

        let added: Vec<_> = report.added_products.iter().map(|e| e.item.as_str()).collect();
        assert_eq!(added, vec!["Paracetamol", "Cetirizine"]);
        assert_eq!(report.sold_products.len(), 2);

        for entry in &report.added_products {
            assert_eq!(entry.kind, EventKind::Added);
            assert!(entry.dealer_name.is_some());
            assert!(entry.customer_name.is_none());
            assert!(entry.total_price.is_none());
        }

        let first_sold = &report.sold_products[0];
        assert_eq!(first_sold.kind, EventKind::Sold);
        assert_eq!(first_sold.item, "Paracetamol");
        assert_eq!(first_sold.quantity, 1);
        assert_eq!(first_sold.batch_no, "Par-1");
        assert_eq!(first_sold.customer_name.as_deref(), Some("Alice"));
        assert_eq!(first_sold.total_price, Some(Money::from_cents(250)));
        assert!(first_sold.dealer_name.is_none());

        assert_eq!(report.sold_total(), Money::from_cents(650));
    }

    #[tokio::test]
    async fn test_dealer_filter_narrows_added_only() {
        let db = seeded().await;

        let filters = ReportFilters {
            dealer_name: Some("Himal Pharma".to_string()),
            ..Default::default()
        };
        let report = db.report(day(2024, 5, 1), &filters).await.unwrap();

        assert_eq!(report.added_products.len(), 1);
        assert_eq!(report.added_products[0].item, "Paracetamol");
        assert_eq!(report.sold_products.len(), 2);
    }

    #[tokio::test]
    async fn test_customer_filter_narrows_sold_only() {
        let db = seeded().await;

        let filters = ReportFilters {
            customer_name: Some("Bob".to_string()),
            ..Default::default()
        };
        let report = db.report(day(2024, 5, 1), &filters).await.unwrap();

        assert_eq!(report.added_products.len(), 2);
        assert_eq!(report.sold_products.len(), 1);
        assert_eq!(report.sold_products[0].item, "Cetirizine");
    }

    #[tokio::test]
    async fn test_empty_name_filters_are_ignored() {
        let db = seeded().await;

        let filters = ReportFilters {
            dealer_name: Some(String::new()),
            customer_name: Some(String::new()),
            ..Default::default()
        };
        let report = db.report(day(2024, 5, 1), &filters).await.unwrap();

        assert_eq!(report.added_products.len(), 2);
        assert_eq!(report.sold_products.len(), 2);
    }

    #[tokio::test]
    async fn test_range_is_anded_with_date() {
        let db = seeded().await;

        // A later lot inside the range but on another day.
        let late = add_lot(&db, "Amoxicillin", "Himal Pharma", 3).await;
        let later = Utc.from_utc_datetime(&day(2024, 5, 10).and_hms_opt(9, 0, 0).unwrap());
        sqlx::query("UPDATE items SET added_at = ?1 WHERE id = ?2")
            .bind(later)
            .bind(late.id)
            .execute(db.pool())
            .await
            .unwrap();

        let may = ReportFilters {
            start_date: Some(day(2024, 5, 1)),
            end_date: Some(day(2024, 5, 31)),
            ..Default::default()
        };
        let report = db.report(day(2024, 5, 1), &may).await.unwrap();
        let added: Vec<_> = report.added_products.iter().map(|e| e.item.as_str()).collect();
        assert_eq!(added, vec!["Paracetamol", "Cetirizine"]);
        assert_eq!(report.sold_products.len(), 2);

        let report = db.report(day(2024, 5, 10), &may).await.unwrap();
        assert_eq!(report.added_products.len(), 1);
        assert!(report.sold_products.is_empty());

        let june = ReportFilters {
            start_date: Some(day(2024, 6, 1)),
            end_date: Some(day(2024, 6, 30)),
            ..Default::default()
        };
        let report = db.report(day(2024, 5, 1), &june).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_single_bound_is_ignored() {
        let db = seeded().await;

        let only_start = ReportFilters {
            start_date: Some(day(2024, 6, 1)),
            ..Default::default()
        };
        let report = db.report(day(2024, 5, 1), &only_start).await.unwrap();
        assert_eq!(report.added_products.len(), 2);
        assert_eq!(report.sold_products.len(), 2);

        let only_end = ReportFilters {
            end_date: Some(day(2024, 4, 1)),
            ..Default::default()
        };
        let report = db.report(day(2024, 5, 1), &only_end).await.unwrap();
        assert_eq!(report.added_products.len(), 2);
    }

    #[tokio::test]
    async fn test_cleared_lots_drop_sales_from_report() {
        let db = seeded().await;

        db.clear_data(ClearDataFlags {
            clear_items: true,
            ..Default::default()
        })
        .await
        .unwrap();

        let report = db
            .report(day(2024, 5, 1), &ReportFilters::default())
            .await
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(db.sales().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_sold_query_fails_whole_report() {
        let db = seeded().await;

        sqlx::query("DROP TABLE customers")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db
            .report(day(2024, 5, 1), &ReportFilters::default())
            .await
            .unwrap_err();

        assert!(err.is_storage_failure());
    }
}
