//! # Stock Ledger
//!
//! Reads and decrements the quantity of one stock lot.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_quantity(conn, (id, batch))  → Some(qty) | None                   │
//! │                                                                         │
//! │  decrement(conn, (id, batch), n)                                       │
//! │     UPDATE items SET quantity = quantity - n                           │
//! │     WHERE id = ? AND batch_no = ? AND quantity >= n                    │
//! │                                                                         │
//! │     1 row  → Ok                                                        │
//! │     0 rows → InsufficientStock (nothing changed)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions run on the caller's connection, normally `&mut *tx` of
//! the sale transaction, so the check and the decrement see the same
//! snapshot. The guard in the UPDATE keeps quantity non-negative even when
//! a caller skips the check.

use sqlx::SqliteConnection;
use tracing::debug;

use stockroom_core::validation::validate_sale_quantity;
use stockroom_core::StockKey;

use crate::error::{DbError, DbResult};

/// Current quantity of the lot, or `None` when no such (id, batch) exists.
pub async fn get_quantity(conn: &mut SqliteConnection, key: &StockKey) -> DbResult<Option<i64>> {
    let quantity: Option<i64> =
        sqlx::query_scalar("SELECT quantity FROM items WHERE id = ?1 AND batch_no = ?2")
            .bind(key.product_id)
            .bind(&key.batch_no)
            .fetch_optional(&mut *conn)
            .await?;

    debug!(
        product_id = key.product_id,
        batch_no = %key.batch_no,
        ?quantity,
        "Read stock quantity"
    );

    Ok(quantity)
}

/// Takes `amount` units from the lot.
///
/// ## Errors
/// - `Validation` when `amount` is not positive
/// - `InsufficientStock` when the lot is missing or holds fewer than
///   `amount` units; the row is left untouched
pub async fn decrement(conn: &mut SqliteConnection, key: &StockKey, amount: i64) -> DbResult<()> {
    validate_sale_quantity(amount)?;

    let result = sqlx::query(
        r#"
        UPDATE items
        SET quantity = quantity - ?1
        WHERE id = ?2 AND batch_no = ?3 AND quantity >= ?1
        "#,
    )
    .bind(amount)
    .bind(key.product_id)
    .bind(&key.batch_no)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::insufficient_stock(key.product_id, key.batch_no.clone()));
    }

    debug!(
        product_id = key.product_id,
        batch_no = %key.batch_no,
        amount,
        "Decremented stock"
    );

    Ok(())
}
