//! # stockroom-db: Database Layer for Stockroom
//!
//! Storage for stock lots, dealers, customers and sales, on SQLite via sqlx.
//! This crate owns every transaction: the Stock Ledger, the Sale Transaction
//! Coordinator, the Activity Report Builder and Bulk Clear all live here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  CLI command (sell / report / clear)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepo       │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo ──┐   │   │ 001_initial  │  │   │
//! │  │   │               │    │ ReportRepo │   │   │              │  │   │
//! │  │   └───────────────┘    │ ledger ◄───┘   │   └──────────────┘  │   │
//! │  │                        └────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories and the Stock Ledger
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//!
//! let receipt = db.sell(&request).await?;
//! let report = db.report(today, &ReportFilters::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::dealer::DealerRepository;
pub use repository::item::ItemRepository;
pub use repository::maintenance::MaintenanceRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
