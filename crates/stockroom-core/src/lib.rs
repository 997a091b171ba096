//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! Domain types, money arithmetic and validation rules for the inventory &
//! sales tracker. Nothing in this crate touches a database, file or socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stockroom CLI (collaborator)                    │   │
//! │  │    add-item, sell, report, clear ...                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ stockroom-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │ Item      │  │   Money   │  │ CoreError │  │   rules   │  │   │
//! │  │   │ SaleLine  │  │           │  │ Validation│  │  checks   │  │   │
//! │  │   │ Report    │  │           │  │   Error   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Database Layer)                   │   │
//! │  │     Stock Ledger, Sale Coordinator, Report Builder, Clear       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Dealer, Customer, SaleLine, reports)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation run before any transaction opens
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{CustomerInfo, Money, SaleRequest};
//!
//! let request = SaleRequest::from_parallel(
//!     vec![1, 2],
//!     vec!["B1".to_string(), "B2".to_string()],
//!     1,
//!     Money::from_major_minor(100, 0),
//!     CustomerInfo::new("Alice", "555-0100", "Addr"),
//! )
//! .unwrap();
//!
//! assert_eq!(request.lines.len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of (product, batch) lines accepted in one sale.
///
/// Keeps a single sale transaction (and the write lock it holds) short.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum length of free-text names (items, dealers, customers).
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a batch number.
pub const MAX_BATCH_NO_LEN: usize = 50;
