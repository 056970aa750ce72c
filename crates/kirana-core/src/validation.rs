//! # Validation Module
//!
//! Input validation utilities for Kirana POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Frontend                                                  │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE                                               │
//! │  ├── Field validation before business rules run                     │
//! │  └── Typed ValidationError per failure                              │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Business rules (catalog, cart, checkout, review)          │
//! │  └── Duplicate barcodes, stock checks, state machine guards         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use kirana_core::validation::validate_barcode;
///
/// assert!(validate_barcode("8901234-A").is_ok());
/// assert!(validate_barcode("").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 50,
        });
    }

    if !barcode
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates units-per-pack for a new product.
///
/// Zero would make bulk conversion meaningless, so it is rejected up front.
pub fn validate_bulk_quantity(bulk_quantity: u32) -> ValidationResult<()> {
    if bulk_quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "bulk_quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for free items)
pub fn validate_price(price: crate::money::Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Confirmation Phrases
// =============================================================================

/// Compares a typed confirmation phrase against the expected one, verbatim.
///
/// Destructive operations (cash reset, store reset) refuse to run unless
/// the exact phrase was entered.
pub fn require_confirmation(input: &str, expected: &'static str) -> ValidationResult<()> {
    if input != expected {
        return Err(ValidationError::ConfirmationMismatch { expected });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
