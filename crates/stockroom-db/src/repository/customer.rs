//! # Customer Repository
//!
//! Customers are written only by a sale (see
//! [`SaleRepository::sell`](super::sale::SaleRepository::sell)), one row per
//! sale. This repository reads them back.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use stockroom_core::{Customer, CustomerInfo};

use crate::error::DbResult;

/// Inserts a customer on the caller's connection and returns its id.
///
/// Inside a sale this is the first write, which takes SQLite's write lock
/// for the rest of the transaction.
pub(crate) async fn insert(conn: &mut SqliteConnection, customer: &CustomerInfo) -> DbResult<i64> {
    let result = sqlx::query("INSERT INTO customers (name, phone, address) VALUES (?1, ?2, ?3)")
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .execute(&mut *conn)
        .await?;

    let id = result.last_insert_rowid();
    debug!(id, name = %customer.name, "Inserted customer");
    Ok(id)
}

/// Repository for customer reads.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Customer names in sale order. Repeat buyers appear once per sale.
    pub async fn list_names(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = names.len(), "Listed customer names");
        Ok(names)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
