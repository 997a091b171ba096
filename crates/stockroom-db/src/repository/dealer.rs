//! # Dealer Repository
//!
//! Suppliers stock lots are received from. Lots store the dealer's name as
//! free text, so nothing here is referenced by key.

use sqlx::SqlitePool;
use tracing::{debug, info};

use stockroom_core::{Dealer, NewDealer};

use crate::error::DbResult;

/// Repository for dealer operations.
#[derive(Debug, Clone)]
pub struct DealerRepository {
    pool: SqlitePool,
}

impl DealerRepository {
    /// Creates a new DealerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DealerRepository { pool }
    }

    /// Registers a dealer. Only the name is required.
    pub async fn add_dealer(&self, dealer: &NewDealer) -> DbResult<Dealer> {
        dealer.validate()?;

        let result = sqlx::query(
            r#"
            INSERT INTO dealers (name, address, phone, email, tax_id, registration_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&dealer.name)
        .bind(&dealer.address)
        .bind(&dealer.phone)
        .bind(&dealer.email)
        .bind(&dealer.tax_id)
        .bind(&dealer.registration_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, name = %dealer.name, "Dealer added");

        Ok(Dealer {
            id,
            name: dealer.name.clone(),
            address: dealer.address.clone(),
            phone: dealer.phone.clone(),
            email: dealer.email.clone(),
            tax_id: dealer.tax_id.clone(),
            registration_id: dealer.registration_id.clone(),
        })
    }

    pub async fn list(&self) -> DbResult<Vec<Dealer>> {
        let dealers = sqlx::query_as::<_, Dealer>(
            r#"
            SELECT id, name, address, phone, email, tax_id, registration_id
            FROM dealers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(dealers)
    }

    /// Dealer names in registration order, for filter pickers.
    pub async fn list_names(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM dealers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = names.len(), "Listed dealer names");
        Ok(names)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dealers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
