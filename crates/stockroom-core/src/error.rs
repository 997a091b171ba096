//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures (+ wraps CoreError)           │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the caller sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule rejections.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale line asked for more than its stock lot holds.
    ///
    /// ## When This Occurs
    /// - The (product id, batch no) pair does not exist
    /// - The lot's quantity is below the requested quantity
    ///
    /// Identifies the FIRST failing line so the caller can correct it.
    #[error("Not enough quantity for product ID {product_id} and batch no {batch_no}")]
    InsufficientStock { product_id: i64, batch_no: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InsufficientStock error for a lot.
    pub fn insufficient_stock(product_id: i64, batch_no: impl Into<String>) -> Self {
        CoreError::InsufficientStock {
            product_id,
            batch_no: batch_no.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any transaction opens, so they never leave partial writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid date, invalid amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two parallel lists do not pair up index by index.
    #[error("{left} and {right} must be lists of the same length ({left_len} vs {right_len})")]
    LengthMismatch {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },

    /// A date comes before the date it must follow.
    #[error("{later} must not be before {earlier}")]
    DateOrder { earlier: String, later: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::insufficient_stock(2, "B2");
        assert_eq!(
            err.to_string(),
            "Not enough quantity for product ID 2 and batch no B2"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer name".to_string(),
        };
        assert_eq!(err.to_string(), "customer name is required");

        let err = ValidationError::LengthMismatch {
            left: "productIds".to_string(),
            right: "batchNo".to_string(),
            left_len: 2,
            right_len: 1,
        };
        assert_eq!(
            err.to_string(),
            "productIds and batchNo must be lists of the same length (2 vs 1)"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
