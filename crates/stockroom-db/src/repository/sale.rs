//! # Sale Repository
//!
//! Records multi-line sales atomically and reads sale lines back.
//!
//! ## Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       sell(&SaleRequest)                                │
//! │                                                                         │
//! │  0. request.validate()          rejected here → nothing written        │
//! │                                                                         │
//! │  1. BEGIN                                                              │
//! │  2. INSERT customer             first write: takes the write lock      │
//! │  3. for each (product_id, batch_no) in order:                          │
//! │       a. ledger::get_quantity                                          │
//! │       b. missing or < qty  ──► ROLLBACK, InsufficientStock(id, batch)  │
//! │       c. INSERT sale line (qty, total_price)                           │
//! │       d. ledger::decrement                                             │
//! │  4. COMMIT                                                             │
//! │                                                                         │
//! │  Any storage error at any step rolls back everything.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Two sales against the same lot cannot both pass step 3b: the second one
//! blocks at step 2 (up to the connection's busy timeout) until the first
//! commits or rolls back, then reads the post-commit quantity.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use stockroom_core::{SaleLine, SaleReceipt, SaleRequest, StockKey};

use super::{customer, ledger};
use crate::error::{DbError, DbResult};

/// Repository for sale operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale: one customer, one line per requested lot, every lot
    /// reduced by `quantity_per_line`. All or nothing.
    ///
    /// ## Errors
    /// - `Domain(Validation)` before any transaction opens
    /// - `Domain(InsufficientStock)` for the first lot that is missing or
    ///   short; the database is left exactly as it was
    /// - any other variant is a storage failure, also fully rolled back
    pub async fn sell(&self, request: &SaleRequest) -> DbResult<SaleReceipt> {
        request.validate()?;

        debug!(
            lines = request.lines.len(),
            quantity_per_line = request.quantity_per_line,
            total_price = %request.total_price,
            "Starting sale"
        );

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!(error = %e, "Could not open sale transaction");
            DbError::TransactionFailed(e.to_string())
        })?;

        match record_sale(&mut *tx, request).await {
            Ok(receipt) => {
                tx.commit().await.map_err(|e| {
                    error!(error = %e, "Sale commit failed");
                    DbError::TransactionFailed(e.to_string())
                })?;

                info!(
                    customer_id = receipt.customer_id,
                    lines = receipt.lines.len(),
                    "Sale committed"
                );
                Ok(receipt)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "Sale rollback failed");
                }

                if err.is_storage_failure() {
                    error!(error = %err, "Sale aborted by storage failure");
                } else {
                    warn!(error = %err, "Sale rejected");
                }
                Err(err)
            }
        }
    }

    /// Sale lines recorded for one customer row.
    pub async fn lines_for_customer(&self, customer_id: i64) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, product_id, customer_id, quantity, total_price, sale_date
            FROM sales
            WHERE customer_id = ?1
            ORDER BY id
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Number of sale lines on record.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Steps 2-3 of the sale, on the open transaction.
async fn record_sale(conn: &mut SqliteConnection, request: &SaleRequest) -> DbResult<SaleReceipt> {
    let customer_id = customer::insert(&mut *conn, &request.customer).await?;
    let sale_date = Utc::now();
    let quantity = request.quantity_per_line;

    let mut lines = Vec::with_capacity(request.lines.len());

    for key in &request.lines {
        match ledger::get_quantity(&mut *conn, key).await? {
            Some(on_hand) if on_hand >= quantity => {}
            _ => return Err(DbError::insufficient_stock(key.product_id, key.batch_no.clone())),
        }

        let line = insert_line(&mut *conn, key, customer_id, request, sale_date).await?;
        ledger::decrement(&mut *conn, key, quantity).await?;

        lines.push(line);
    }

    Ok(SaleReceipt { customer_id, lines })
}

async fn insert_line(
    conn: &mut SqliteConnection,
    key: &StockKey,
    customer_id: i64,
    request: &SaleRequest,
    sale_date: DateTime<Utc>,
) -> DbResult<SaleLine> {
    let result = sqlx::query(
        r#"
        INSERT INTO sales (product_id, customer_id, quantity, total_price, sale_date)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(key.product_id)
    .bind(customer_id)
    .bind(request.quantity_per_line)
    .bind(request.total_price)
    .bind(sale_date)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    debug!(id, product_id = key.product_id, customer_id, "Inserted sale line");

    Ok(SaleLine {
        id,
        product_id: key.product_id,
        customer_id,
        quantity: request.quantity_per_line,
        total_price: request.total_price,
        sale_date,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use stockroom_core::{CoreError, CustomerInfo, Item, Money, NewItem};

    async fn add_lot(db: &Database, name: &str, batch_no: &str, quantity: i64) -> Item {
        db.items()
            .add_item(&NewItem {
                name: name.to_string(),
                quantity,
                batch_no: batch_no.to_string(),
                manufacture_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                expiry_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                dealer_name: "Himal Pharma".to_string(),
                price: Money::from_cents(2500),
            })
            .await
            .unwrap()
    }

    fn request(lines: Vec<StockKey>, quantity: i64, total_cents: i64) -> SaleRequest {
        SaleRequest {
            lines,
            quantity_per_line: quantity,
            total_price: Money::from_cents(total_cents),
            customer: CustomerInfo::new("Alice", "555-0100", "Lakeside"),
        }
    }

    async fn quantity_of(db: &Database, item: &Item) -> i64 {
        db.items().quantity(&item.key()).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_sell_single_line() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = add_lot(&db, "Paracetamol", "B1", 10).await;

        let receipt = db.sell(&request(vec![lot.key()], 4, 10000)).await.unwrap();

        assert_eq!(quantity_of(&db, &lot).await, 6);
        assert_eq!(receipt.lines.len(), 1);

        let stored = db.sales().lines_for_customer(receipt.customer_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].product_id, lot.id);
        assert_eq!(stored[0].quantity, 4);
        assert_eq!(stored[0].total_price, Money::from_cents(10000));

        let customer = db.customers().get_by_id(receipt.customer_id).await.unwrap().unwrap();
        assert_eq!(customer.name, "Alice");
    }

    #[tokio::test]
    async fn test_sell_multiple_lines_repeats_quantity_and_total() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = add_lot(&db, "Paracetamol", "B1", 10).await;
        let b = add_lot(&db, "Cetirizine", "C3", 5).await;

        let receipt = db
            .sell(&request(vec![a.key(), b.key()], 2, 900))
            .await
            .unwrap();

        assert_eq!(quantity_of(&db, &a).await, 8);
        assert_eq!(quantity_of(&db, &b).await, 3);
        assert_eq!(db.customers().count().await.unwrap(), 1);
        assert_eq!(db.sales().count().await.unwrap(), 2);
        assert!(receipt
            .lines
            .iter()
            .all(|line| line.quantity == 2 && line.total_price == Money::from_cents(900)));
    }

    #[tokio::test]
    async fn test_sell_more_than_on_hand_changes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = add_lot(&db, "Paracetamol", "B1", 10).await;

        let err = db.sell(&request(vec![lot.key()], 11, 10000)).await.unwrap_err();

        assert!(matches!(
            &err,
            DbError::Domain(CoreError::InsufficientStock { product_id, batch_no })
                if *product_id == lot.id && batch_no == "B1"
        ));
        assert_eq!(quantity_of(&db, &lot).await, 10);
        assert_eq!(db.customers().count().await.unwrap(), 0);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_later_short_line_rolls_back_earlier_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let first = add_lot(&db, "Paracetamol", "B1", 5).await;
        let second = add_lot(&db, "Cetirizine", "B2", 0).await;

        let err = db
            .sell(&request(vec![first.key(), second.key()], 1, 500))
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            DbError::Domain(CoreError::InsufficientStock { product_id, batch_no })
                if *product_id == second.id && batch_no == "B2"
        ));
        assert_eq!(quantity_of(&db, &first).await, 5);
        assert_eq!(db.customers().count().await.unwrap(), 0);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_lot_is_insufficient_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = add_lot(&db, "Paracetamol", "B1", 5).await;

        // right id, wrong batch
        let err = db
            .sell(&request(vec![StockKey::new(lot.id, "B7")], 1, 500))
            .await
            .unwrap_err();

        assert!(err.is_insufficient_stock());
        assert_eq!(quantity_of(&db, &lot).await, 5);
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_any_write() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = add_lot(&db, "Paracetamol", "B1", 5).await;

        let cases = vec![
            request(vec![], 1, 500),
            request(vec![lot.key()], 0, 500),
            request(vec![lot.key()], 1, -1),
            SaleRequest {
                customer: CustomerInfo::default(),
                ..request(vec![lot.key()], 1, 500)
            },
        ];

        for case in cases {
            let err = db.sell(&case).await.unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        }

        assert_eq!(quantity_of(&db, &lot).await, 5);
        assert_eq!(db.customers().count().await.unwrap(), 0);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_each_sale_creates_its_own_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = add_lot(&db, "Paracetamol", "B1", 5).await;

        let first = db.sell(&request(vec![lot.key()], 1, 100)).await.unwrap();
        let second = db.sell(&request(vec![lot.key()], 1, 100)).await.unwrap();

        assert_ne!(first.customer_id, second.customer_id);
        assert_eq!(db.customers().count().await.unwrap(), 2);
        assert_eq!(quantity_of(&db, &lot).await, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("stockroom.db")).max_connections(5);
        let db = Database::new(config).await.unwrap();

        const ON_HAND: i64 = 5;
        const BUYERS: usize = 12;
        let lot = add_lot(&db, "Paracetamol", "B1", ON_HAND).await;

        let mut handles = Vec::with_capacity(BUYERS);
        for _ in 0..BUYERS {
            let db = db.clone();
            let sale = request(vec![lot.key()], 1, 100);
            handles.push(tokio::spawn(async move { db.sell(&sale).await }));
        }

        let mut sold = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(err) => assert!(err.is_insufficient_stock(), "unexpected error: {err}"),
            }
        }

        let remaining = quantity_of(&db, &lot).await;
        assert_eq!(sold, ON_HAND);
        assert_eq!(remaining, 0);
        assert_eq!(db.sales().count().await.unwrap(), ON_HAND);
        assert_eq!(db.customers().count().await.unwrap(), ON_HAND);
    }

    #[tokio::test]
    async fn test_storage_failure_mid_sale_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = add_lot(&db, "Paracetamol", "B1", 5).await;

        // fails after the customer row and before any decrement
        sqlx::query(
            "CREATE TRIGGER reject_sale BEFORE INSERT ON sales \
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.sell(&request(vec![lot.key()], 2, 500)).await.unwrap_err();

        assert!(err.is_storage_failure());
        assert!(!err.is_insufficient_stock());
        assert!(matches!(err, DbError::QueryFailed(ref msg) if msg.contains("disk full")));
        assert_eq!(quantity_of(&db, &lot).await, 5);
        assert_eq!(db.customers().count().await.unwrap(), 0);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }
}
