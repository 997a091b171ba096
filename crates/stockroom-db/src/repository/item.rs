//! # Item Repository
//!
//! Stock lots: recording arrivals and looking lots up.
//!
//! A lot is identified by (id, batch_no). `id` is the row id handed out on
//! insert; the batch number travels with every sale line request so a stale
//! id cannot silently sell from a different batch.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use stockroom_core::{Item, NewItem, StockKey};

use super::{ledger, ITEM_COLUMNS};
use crate::error::DbResult;

/// Repository for stock lot operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Records a new stock lot stamped with the current time.
    ///
    /// ## Returns
    /// The stored lot including its generated id.
    pub async fn add_item(&self, new_item: &NewItem) -> DbResult<Item> {
        new_item.validate()?;

        let added_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO items (
                name, quantity, batch_no,
                manufacture_date, expiry_date,
                dealer_name, price, added_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&new_item.name)
        .bind(new_item.quantity)
        .bind(&new_item.batch_no)
        .bind(new_item.manufacture_date)
        .bind(new_item.expiry_date)
        .bind(&new_item.dealer_name)
        .bind(new_item.price)
        .bind(added_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        info!(
            id,
            name = %new_item.name,
            batch_no = %new_item.batch_no,
            quantity = new_item.quantity,
            "Stock lot added"
        );

        Ok(Item {
            id,
            name: new_item.name.clone(),
            quantity: new_item.quantity,
            batch_no: new_item.batch_no.clone(),
            manufacture_date: new_item.manufacture_date,
            expiry_date: new_item.expiry_date,
            dealer_name: new_item.dealer_name.clone(),
            price: new_item.price,
            added_at,
        })
    }

    /// Gets the lot for an exact (id, batch) pair.
    pub async fn get(&self, key: &StockKey) -> DbResult<Option<Item>> {
        debug!(product_id = key.product_id, batch_no = %key.batch_no, "Getting stock lot");

        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1 AND batch_no = ?2");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(key.product_id)
            .bind(&key.batch_no)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Lists every lot, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id");
        let items = sqlx::query_as::<_, Item>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed stock lots");
        Ok(items)
    }

    /// Current quantity of one lot, read outside any sale.
    pub async fn quantity(&self, key: &StockKey) -> DbResult<Option<i64>> {
        let mut conn = self.pool.acquire().await?;
        ledger::get_quantity(&mut conn, key).await
    }

    /// Number of lots on record.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
