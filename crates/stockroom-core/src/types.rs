//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Item (lot)     │   │    SaleLine     │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id  ┐ identity │   │  id             │   │  id             │       │
//! │  │  batch_no ┘     │◄──│  product_id     │   │  name           │       │
//! │  │  quantity >= 0  │   │  customer_id ───┼──►│  phone          │       │
//! │  │  dealer_name    │   │  quantity       │   │  address        │       │
//! │  │  price          │   │  total_price    │   └─────────────────┘       │
//! │  │  added_at       │   │  sale_date      │                             │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │          ▲                                    │     Dealer      │       │
//! │          └──── dealer_name (free text) ·····  │  name, tax_id.. │       │
//! │                                               └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lot Identity
//! A stock lot is addressed by the pair (product id, batch no). The same
//! product name can be restocked under several batches, each with its own
//! quantity and dates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{self, ValidationResult};

// =============================================================================
// Stock Lots
// =============================================================================

/// A stock lot: one batch of a product received from a dealer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Product id (row id of the lot).
    pub id: i64,

    /// Display name of the product.
    pub name: String,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// Batch number printed on the lot.
    pub batch_no: String,

    pub manufacture_date: NaiveDate,

    pub expiry_date: NaiveDate,

    /// Dealer the lot came from. Free text, not a reference.
    pub dealer_name: String,

    /// Unit price.
    pub price: Money,

    /// When the lot was recorded.
    pub added_at: DateTime<Utc>,
}

impl Item {
    /// Returns the key addressing this lot.
    pub fn key(&self) -> StockKey {
        StockKey::new(self.id, self.batch_no.clone())
    }
}

/// Input for recording a new stock lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
    pub batch_no: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub dealer_name: String,
    pub price: Money,
}

impl NewItem {
    /// Runs every field rule for a new lot.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_new_item(self)
    }
}

/// The (product id, batch no) pair addressing exactly one stock lot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockKey {
    pub product_id: i64,
    pub batch_no: String,
}

impl StockKey {
    pub fn new(product_id: i64, batch_no: impl Into<String>) -> Self {
        StockKey {
            product_id,
            batch_no: batch_no.into(),
        }
    }
}

// =============================================================================
// Dealers
// =============================================================================

/// A supplier stock lots are received from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Dealer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Tax registration (PAN) number.
    pub tax_id: String,
    /// Drug/trade registration number.
    pub registration_id: String,
}

/// Input for registering a dealer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDealer {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
    pub registration_id: String,
}

impl NewDealer {
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_new_dealer(self)
    }
}

// =============================================================================
// Customers
// =============================================================================

/// A buyer. A fresh row is written for every sale, repeat buyers included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Customer details captured with a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CustomerInfo {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        CustomerInfo {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// One product line recorded by a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: i64,
    /// References the lot by id only; the batch is not stored.
    pub product_id: i64,
    pub customer_id: i64,
    /// Units taken from the lot.
    pub quantity: i64,
    /// Total of the whole sale, repeated on every line.
    pub total_price: Money,
    pub sale_date: DateTime<Utc>,
}

/// A multi-line sale as submitted by the caller.
///
/// `quantity_per_line` applies to every line and `total_price` covers the
/// whole sale. Per-line quantities and prices are deliberately not modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    /// Lots to sell from, in order. The first insufficient one aborts the sale.
    pub lines: Vec<StockKey>,
    pub quantity_per_line: i64,
    pub total_price: Money,
    pub customer: CustomerInfo,
}

impl SaleRequest {
    /// Builds a request from the parallel id / batch lists the wire format
    /// carries, pairing them index by index.
    ///
    /// ## Errors
    /// `ValidationError::LengthMismatch` when the lists differ in length, plus
    /// anything [`SaleRequest::validate`] rejects.
    pub fn from_parallel(
        product_ids: Vec<i64>,
        batch_nos: Vec<String>,
        quantity_per_line: i64,
        total_price: Money,
        customer: CustomerInfo,
    ) -> ValidationResult<Self> {
        if product_ids.len() != batch_nos.len() {
            return Err(ValidationError::LengthMismatch {
                left: "productIds".to_string(),
                right: "batchNo".to_string(),
                left_len: product_ids.len(),
                right_len: batch_nos.len(),
            });
        }

        let lines = product_ids
            .into_iter()
            .zip(batch_nos)
            .map(|(product_id, batch_no)| StockKey::new(product_id, batch_no))
            .collect();

        let request = SaleRequest {
            lines,
            quantity_per_line,
            total_price,
            customer,
        };
        request.validate()?;
        Ok(request)
    }

    /// Runs every rule that must hold before a sale transaction opens.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_sale_request(self)
    }
}

/// What a committed sale produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub customer_id: i64,
    pub lines: Vec<SaleLine>,
}

// =============================================================================
// Activity Reports
// =============================================================================

/// Which relation a report entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A stock lot was recorded.
    Added,
    /// A sale line was recorded.
    Sold,
}

/// Optional narrowing applied on top of the report date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    /// Only added events from this dealer (exact match).
    pub dealer_name: Option<String>,
    /// Only sold events to this customer (exact match).
    pub customer_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilters {
    /// Dealer filter, if one is set and non-empty.
    pub fn dealer_name(&self) -> Option<&str> {
        non_empty(self.dealer_name.as_deref())
    }

    /// Customer filter, if one is set and non-empty.
    pub fn customer_name(&self) -> Option<&str> {
        non_empty(self.customer_name.as_deref())
    }

    /// The closed date range, only when BOTH bounds are supplied.
    ///
    /// A lone bound is ignored. The range is ANDed with the report date,
    /// never substituted for it.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// One row of an activity report.
///
/// Added entries never carry `customer_name` / `total_price`; sold entries
/// never carry `dealer_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReportEntry {
    pub kind: EventKind,
    /// Product name.
    pub item: String,
    /// Lot quantity (added) or units sold (sold).
    pub quantity: i64,
    pub batch_no: String,
    pub manufacture_date: NaiveDate,
    pub dealer_name: Option<String>,
    /// `added_at` of the lot or `sale_date` of the line.
    pub event_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub total_price: Option<Money>,
}

/// Added and sold events for one day, partitioned by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub date: NaiveDate,
    pub added_products: Vec<ReportEntry>,
    pub sold_products: Vec<ReportEntry>,
}

impl ActivityReport {
    /// Splits merged entries into the added / sold lists, keeping order.
    pub fn from_entries(date: NaiveDate, entries: impl IntoIterator<Item = ReportEntry>) -> Self {
        let (added_products, sold_products) = entries
            .into_iter()
            .partition(|entry| entry.kind == EventKind::Added);

        ActivityReport {
            date,
            added_products,
            sold_products,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added_products.is_empty() && self.sold_products.is_empty()
    }

    /// Sum of the sold entries' totals.
    ///
    /// Lines of one multi-line sale each repeat the sale total, so this
    /// counts such a sale once per line.
    pub fn sold_total(&self) -> Money {
        self.sold_products
            .iter()
            .filter_map(|entry| entry.total_price)
            .sum()
    }
}

// =============================================================================
// Bulk Clear
// =============================================================================

/// Which relations a bulk clear should empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearDataFlags {
    pub clear_items: bool,
    pub clear_sales: bool,
    pub clear_customers: bool,
    pub clear_dealers: bool,
}

impl ClearDataFlags {
    pub fn all() -> Self {
        ClearDataFlags {
            clear_items: true,
            clear_sales: true,
            clear_customers: true,
            clear_dealers: true,
        }
    }

    pub fn any(&self) -> bool {
        self.clear_items || self.clear_sales || self.clear_customers || self.clear_dealers
    }
}

/// Rows removed per relation by a bulk clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearSummary {
    pub items: u64,
    pub sales: u64,
    pub customers: u64,
    pub dealers: u64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(kind: EventKind, item: &str) -> ReportEntry {
        ReportEntry {
            kind,
            item: item.to_string(),
            quantity: 1,
            batch_no: "B1".to_string(),
            manufacture_date: date(2024, 1, 1),
            dealer_name: None,
            event_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            customer_name: None,
            total_price: match kind {
                EventKind::Added => None,
                EventKind::Sold => Some(Money::from_cents(250)),
            },
        }
    }

    #[test]
    fn test_from_parallel_pairs_by_index() {
        let request = SaleRequest::from_parallel(
            vec![1, 2],
            vec!["B1".to_string(), "B2".to_string()],
            3,
            Money::from_cents(100),
            CustomerInfo::new("Alice", "555-0100", "Addr"),
        )
        .unwrap();

        assert_eq!(
            request.lines,
            vec![StockKey::new(1, "B1"), StockKey::new(2, "B2")]
        );
    }

    #[test]
    fn test_from_parallel_rejects_mismatched_lists() {
        let err = SaleRequest::from_parallel(
            vec![1, 2],
            vec!["B1".to_string()],
            1,
            Money::from_cents(100),
            CustomerInfo::new("Alice", "", ""),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::LengthMismatch {
                left_len: 2,
                right_len: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_date_range_needs_both_bounds() {
        let mut filters = ReportFilters {
            start_date: Some(date(2024, 5, 1)),
            ..Default::default()
        };
        assert_eq!(filters.date_range(), None);

        filters.end_date = Some(date(2024, 5, 31));
        assert_eq!(
            filters.date_range(),
            Some((date(2024, 5, 1), date(2024, 5, 31)))
        );
    }

    #[test]
    fn test_empty_name_filters_are_ignored() {
        let filters = ReportFilters {
            dealer_name: Some(String::new()),
            customer_name: Some("Alice".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.dealer_name(), None);
        assert_eq!(filters.customer_name(), Some("Alice"));
    }

    #[test]
    fn test_report_partitions_by_kind_keeping_order() {
        let report = ActivityReport::from_entries(
            date(2024, 5, 1),
            vec![
                entry(EventKind::Sold, "a"),
                entry(EventKind::Added, "b"),
                entry(EventKind::Sold, "c"),
            ],
        );

        let sold: Vec<_> = report.sold_products.iter().map(|e| e.item.as_str()).collect();
        assert_eq!(sold, vec!["a", "c"]);
        assert_eq!(report.added_products.len(), 1);
        assert_eq!(report.sold_total(), Money::from_cents(500));
    }

    #[test]
    fn test_report_entry_serializes_nulls() {
        let json = serde_json::to_value(entry(EventKind::Added, "Paracetamol")).unwrap();
        assert_eq!(json["kind"], "added");
        assert!(json["customer_name"].is_null());
        assert!(json["total_price"].is_null());
    }

    #[test]
    fn test_clear_flags() {
        assert!(!ClearDataFlags::default().any());
        assert!(ClearDataFlags::all().any());
    }
}
