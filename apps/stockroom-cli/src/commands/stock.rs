//! # Stock Commands
//!
//! Recording lots and dealers, and listing what is on record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use stockroom_core::{Dealer, Item, Money, NewDealer, NewItem, StockKey};
use stockroom_db::Database;

use crate::cli::{AddDealerArgs, AddItemArgs, LotArgs};
use crate::error::ApiError;

/// A stock lot as printed by `add-item`, `item` and `products`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub batch_no: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub dealer_name: String,
    #[serde(serialize_with = "crate::commands::decimal::serialize")]
    pub price: Money,
    pub added_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        ItemResponse {
            id: item.id,
            name: item.name,
            quantity: item.quantity,
            batch_no: item.batch_no,
            manufacture_date: item.manufacture_date,
            expiry_date: item.expiry_date,
            dealer_name: item.dealer_name,
            price: item.price,
            added_at: item.added_at,
        }
    }
}

pub async fn add_item(db: &Database, args: AddItemArgs) -> Result<ItemResponse, ApiError> {
    let new_item = NewItem {
        name: args.name,
        quantity: args.quantity,
        batch_no: args.batch_no,
        manufacture_date: args.manufacture_date,
        expiry_date: args.expiry_date,
        dealer_name: args.dealer_name,
        price: args.price,
    };

    Ok(db.items().add_item(&new_item).await?.into())
}

pub async fn add_dealer(db: &Database, args: AddDealerArgs) -> Result<Dealer, ApiError> {
    let dealer = NewDealer {
        name: args.name,
        address: args.address,
        phone: args.phone,
        email: args.email,
        tax_id: args.tax_id,
        registration_id: args.registration_id,
    };

    Ok(db.dealers().add_dealer(&dealer).await?)
}

/// Looks up one lot by its (product id, batch no) pair.
pub async fn get_item(db: &Database, args: LotArgs) -> Result<ItemResponse, ApiError> {
    let key = StockKey::new(args.product_id, args.batch_no);
    debug!(product_id = key.product_id, batch_no = %key.batch_no, "get_item command");

    db.items().get(&key).await?.map(Into::into).ok_or_else(|| {
        ApiError::not_found(
            "Item",
            &format!("product ID {} batch no {}", key.product_id, key.batch_no),
        )
    })
}

pub async fn list_products(db: &Database) -> Result<Vec<ItemResponse>, ApiError> {
    let items = db.items().list().await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn dealer_names(db: &Database) -> Result<Vec<String>, ApiError> {
    Ok(db.dealers().list_names().await?)
}

pub async fn customer_names(db: &Database) -> Result<Vec<String>, ApiError> {
    Ok(db.customers().list_names().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{db, lot};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_then_get_item() {
        let db = db().await;

        let item = add_item(&db, lot("Paracetamol", "B1", 10)).await.unwrap();
        let fetched = get_item(
            &db,
            LotArgs {
                product_id: item.id,
                batch_no: "B1".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(fetched.quantity, 10);
        assert_eq!(list_products(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_price_printed_as_typed() {
        let db = db().await;
        let mut args = lot("Paracetamol", "B1", 10);
        args.price = "12.50".parse().unwrap();

        let item = add_item(&db, args).await.unwrap();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["price"], "12.50");
        assert_eq!(json["batchNo"], "B1");
    }

    #[tokio::test]
    async fn test_missing_item_is_not_found() {
        let db = db().await;

        let err = get_item(
            &db,
            LotArgs {
                product_id: 42,
                batch_no: "B1".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_invalid_lot_is_a_validation_error() {
        let db = db().await;

        let err = add_item(&db, lot("", "B1", 10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_dealer_names() {
        let db = db().await;

        add_dealer(
            &db,
            AddDealerArgs {
                name: "Himal Pharma".to_string(),
                address: String::new(),
                phone: String::new(),
                email: String::new(),
                tax_id: "PAN-300112".to_string(),
                registration_id: String::new(),
            },
        )
        .await
        .unwrap();

        assert_eq!(dealer_names(&db).await.unwrap(), vec!["Himal Pharma"]);
        assert!(customer_names(&db).await.unwrap().is_empty());
    }
}
