//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  kirana-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  kirana-store errors (separate crate)                               │
//! │  └── StoreError       - Persistence / import failures               │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → UI shell → user message        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, quantity, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every failing operation leaves the Store unchanged

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Stock Shortfall
// =============================================================================

/// One product's shortfall discovered during stock validation.
///
/// Checkout confirmation validates the whole cart before touching any stock,
/// so a single [`CoreError::InsufficientStock`] can carry several of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortfall {
    pub product_id: ProductId,
    pub name: String,
    pub available: u32,
    pub requested: u32,
}

impl std::fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: available {}, requested {}",
            self.name, self.available, self.requested
        )
    }
}

fn shortfall_list(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. All of them are
/// recoverable user-facing conditions: the operation is rejected, prior
/// state is retained, and control returns to the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A barcode is already taken by another product (or by the other
    /// barcode of the same product).
    ///
    /// ## When This Occurs
    /// Adding a product whose single or bulk barcode collides with any
    /// single or bulk barcode already in the catalog, in any of the four
    /// cross combinations.
    #[error("Barcode already exists: {barcode}")]
    DuplicateBarcode { barcode: String },

    /// Product cannot be found by barcode or id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Review item cannot be found.
    #[error("Review item not found: {0}")]
    ReviewNotFound(String),

    /// Cart line index is out of range.
    #[error("No cart line at index {index}")]
    LineNotFound { index: usize },

    /// Insufficient stock to complete the operation.
    ///
    /// ## User Workflow
    /// ```text
    /// Confirm payment
    ///      │
    ///      ▼
    /// Re-validate every cart line against current stock
    ///      │
    ///      ▼
    /// InsufficientStock [ Pens: available 3, requested 5 ]
    ///      │
    ///      ▼
    /// Nothing was debited; cart is intact for correction
    /// ```
    #[error("Insufficient stock: {}", shortfall_list(shortfalls))]
    InsufficientStock { shortfalls: Vec<StockShortfall> },

    /// Checkout was started with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout operation was called in the wrong state.
    ///
    /// ## When This Occurs
    /// - Selecting a payment mode before checkout began
    /// - Confirming before a payment mode was chosen
    #[error("Checkout is {current}, cannot perform operation")]
    InvalidCheckoutState { current: &'static str },

    /// The review item was already approved or rejected.
    /// Resolution is terminal; there is no re-opening.
    #[error("Review item {id} is already {status}")]
    AlreadyResolved { id: String, status: &'static str },

    /// A privileged action was attempted without the owner role.
    #[error("Only the owner can {action}")]
    Unauthorized { action: String },

    /// The product still has pending review items referencing it.
    /// Deletion is refused until those are approved or rejected.
    #[error("Product {0} has pending review items")]
    PendingReviews(ProductId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Builds an [`CoreError::InsufficientStock`] for a single product.
    pub fn short_stock(product_id: ProductId, name: &str, available: u32, requested: u32) -> Self {
        CoreError::InsufficientStock {
            shortfalls: vec![StockShortfall {
                product_id,
                name: name.to_string(),
                available,
                requested,
            }],
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
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

    /// Invalid format (e.g., characters a barcode may not contain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A destructive action's confirmation phrase did not match.
    #[error("Type '{expected}' to confirm")]
    ConfirmationMismatch { expected: &'static str },
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
    fn test_error_messages() {
        let err = CoreError::short_stock(ProductId::new(7), "Blue Pen", 3, 5);
        assert_eq!(
            err.to_string(),
            "Insufficient stock: Blue Pen: available 3, requested 5"
        );

        let err = CoreError::DuplicateBarcode {
            barcode: "8901234".to_string(),
        };
        assert_eq!(err.to_string(), "Barcode already exists: 8901234");
    }

    #[test]
    fn test_multi_shortfall_message() {
        let err = CoreError::InsufficientStock {
            shortfalls: vec![
                StockShortfall {
                    product_id: ProductId::new(1),
                    name: "Pen".to_string(),
                    available: 0,
                    requested: 2,
                },
                StockShortfall {
                    product_id: ProductId::new(2),
                    name: "Notebook".to_string(),
                    available: 4,
                    requested: 10,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock: Pen: available 0, requested 2; Notebook: available 4, requested 10"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_confirmation_mismatch_message() {
        let err = ValidationError::ConfirmationMismatch { expected: "RESET" };
        assert_eq!(err.to_string(), "Type 'RESET' to confirm");
    }
}
