//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and Transactions                        │
//! │                                                                         │
//! │  Database::sell(&request)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRepository::sell ── BEGIN ─────────────────────────────┐          │
//! │       │                                                     │          │
//! │       ├── customer::insert(&mut tx, ..)                     │  one     │
//! │       ├── ledger::get_quantity(&mut tx, key)                │  tx      │
//! │       ├── INSERT INTO sales ..                              │          │
//! │       └── ledger::decrement(&mut tx, key, qty)              │          │
//! │                                                     COMMIT ─┘          │
//! │                                                                         │
//! │  Functions taking `&mut SqliteConnection` never open their own         │
//! │  transaction; they run inside whichever one the caller holds.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Stock lots
//! - [`DealerRepository`](dealer::DealerRepository) - Dealers
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers
//! - [`SaleRepository`](sale::SaleRepository) - Atomic multi-line sales
//! - [`ReportRepository`](report::ReportRepository) - Daily activity reports
//! - [`MaintenanceRepository`](maintenance::MaintenanceRepository) - Bulk clear
//! - [`ledger`] - Stock quantity reads and guarded decrements

pub mod customer;
pub mod dealer;
pub mod item;
pub mod ledger;
pub mod maintenance;
pub mod report;
pub mod sale;

/// Column list shared by every `items` select.
pub(crate) const ITEM_COLUMNS: &str =
    "id, name, quantity, batch_no, manufacture_date, expiry_date, dealer_name, price, added_at";
