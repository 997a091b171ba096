//! # Validation Module
//!
//! Input validation for Stockroom operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Collaborator (CLI)                                           │
//! │  ├── Type parsing (ids, dates, amounts)                                │
//! │  └── Parallel list pairing (SaleRequest::from_parallel)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - field and request rules                        │
//! │  └── Runs before any transaction opens                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (quantity >= 0)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_batch_no, validate_sale_quantity};
//!
//! assert!(validate_batch_no("B1").is_ok());
//! assert!(validate_sale_quantity(0).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CustomerInfo, NewDealer, NewItem, SaleRequest};
use crate::{MAX_BATCH_NO_LEN, MAX_NAME_LEN, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text name.
///
/// ## Rules
/// - Must not be blank
/// - At most `MAX_NAME_LEN` characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a batch number.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_batch_no;
///
/// assert!(validate_batch_no("PCM-2024-07").is_ok());
/// assert!(validate_batch_no("  ").is_err());
/// ```
pub fn validate_batch_no(batch_no: &str) -> ValidationResult<()> {
    let batch_no = batch_no.trim();

    if batch_no.is_empty() {
        return Err(ValidationError::Required {
            field: "batch no".to_string(),
        });
    }

    if batch_no.len() > MAX_BATCH_NO_LEN {
        return Err(ValidationError::TooLong {
            field: "batch no".to_string(),
            max: MAX_BATCH_NO_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the per-line quantity of a sale.
///
/// Zero or negative would leave stock untouched or increase it.
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates the quantity a new lot arrives with. Zero is allowed.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a price or total. Zero is allowed (free goods).
///
/// ## Example
/// ```rust
/// use stockroom_core::money::Money;
/// use stockroom_core::validation::validate_price;
///
/// assert!(validate_price("price", Money::from_cents(0)).is_ok());
/// assert!(validate_price("price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

/// A lot cannot expire before it was made.
pub fn validate_lot_dates(manufacture: NaiveDate, expiry: NaiveDate) -> ValidationResult<()> {
    if expiry < manufacture {
        return Err(ValidationError::DateOrder {
            earlier: "manufacture date".to_string(),
            later: "expiry date".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a new stock lot.
pub fn validate_new_item(item: &NewItem) -> ValidationResult<()> {
    validate_name("item", &item.name)?;
    validate_stock_quantity(item.quantity)?;
    validate_batch_no(&item.batch_no)?;
    validate_lot_dates(item.manufacture_date, item.expiry_date)?;
    validate_name("dealer name", &item.dealer_name)?;
    validate_price("price", item.price)?;
    Ok(())
}

/// Validates a new dealer. Only the name is mandatory.
pub fn validate_new_dealer(dealer: &NewDealer) -> ValidationResult<()> {
    validate_name("dealer name", &dealer.name)
}

/// Validates the customer captured with a sale.
pub fn validate_customer(customer: &CustomerInfo) -> ValidationResult<()> {
    validate_name("customer name", &customer.name)
}

/// Validates a whole sale request.
///
/// ## Rules
/// - At least one line, at most `MAX_SALE_LINES`
/// - Every batch number present
/// - Positive quantity per line
/// - Non-negative total price
/// - Customer name present
pub fn validate_sale_request(request: &SaleRequest) -> ValidationResult<()> {
    if request.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "productIds".to_string(),
        });
    }

    if request.lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "sale lines".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    for line in &request.lines {
        validate_batch_no(&line.batch_no)?;
    }

    validate_sale_quantity(request.quantity_per_line)?;
    validate_price("total price", request.total_price)?;
    validate_customer(&request.customer)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
