//! # Cart
//!
//! The cart is the transient staging area for a pending sale. It holds
//! price snapshots, not live product references, and it never reserves
//! stock: availability is checked when a line is added and re-checked at
//! payment confirmation, because arbitrary user-paced delay separates the
//! two.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                │
//! │                                                                     │
//! │  Scan barcode ───────────► add_line() ─────► merge or push          │
//! │                                                                     │
//! │  Remove button ──────────► remove_line(i) ─► lines.remove(i)        │
//! │                                                                     │
//! │  Clear button ───────────► clear() ────────► lines.clear()          │
//! │                                                                     │
//! │  Checkout ───────────────► compute_total() ─ (read only)            │
//! │                                                                     │
//! │  NOTE: No operation here touches stock. Stock moves exactly once,   │
//! │        at checkout confirmation.                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProductId, UnitKind};
use crate::validation;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the pending sale.
///
/// ## Design Notes
/// - `product_id`: reference back into the catalog (for the confirm-time
///   stock re-check)
/// - everything else is a frozen snapshot taken at add time, so the cart
///   displays consistent data even if the product is edited afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: ProductId,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// The barcode that was scanned.
    pub barcode: String,

    /// Whether this line counts single units or bulk packs.
    pub unit: UnitKind,

    /// Count of units or packs, matching `unit`.
    pub quantity: u32,

    /// Single-unit price at time of adding (frozen).
    pub single_price: Money,

    /// Bulk-pack price at time of adding (frozen).
    pub bulk_price: Money,

    /// Base units per pack at time of adding.
    pub bulk_quantity: u32,
}

impl CartLine {
    /// The price charged per unit of this line's kind.
    #[inline]
    pub fn unit_price(&self) -> Money {
        match self.unit {
            UnitKind::Single => self.single_price,
            UnitKind::Bulk => self.bulk_price,
        }
    }

    /// `unit_price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().times(self.quantity)
    }

    /// Base units this line will debit at confirmation.
    #[inline]
    pub fn base_units(&self) -> u32 {
        match self.unit {
            UnitKind::Single => self.quantity,
            UnitKind::Bulk => self.quantity * self.bulk_quantity,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The pending sale being assembled at the counter.
///
/// ## Invariants
/// - Lines are unique by `(product_id, unit)`; adding the same pairing
///   again increases the quantity instead
/// - Quantities stay within 1..=MAX_LINE_QUANTITY
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Adds a scanned barcode to the cart, merging with an existing line
    /// of the same product and unit kind.
    ///
    /// Stock is checked against the catalog but NOT reserved; the same
    /// units can be promised to the cart twice until confirmation
    /// re-validates the whole thing.
    ///
    /// ## Errors
    /// - `ProductNotFound` if no product carries the barcode
    /// - `InsufficientStock` if the requested quantity alone exceeds
    ///   what is currently on the shelf
    /// - `Validation` for a zero/oversized quantity or an overfull cart
    pub fn add_line(&mut self, catalog: &Catalog, barcode: &str, quantity: u32) -> CoreResult<()> {
        validation::validate_quantity(quantity)?;

        let (product, unit) = catalog
            .resolve_barcode(barcode)
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;

        let units_needed = product.units_for(unit, quantity);
        if units_needed > product.current_stock {
            return Err(CoreError::short_stock(
                product.id,
                &product.name,
                product.current_stock,
                units_needed,
            ));
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id && l.unit == unit)
        {
            let merged = line.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(crate::error::ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: MAX_LINE_QUANTITY as i64,
                }
                .into());
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(crate::error::ValidationError::OutOfRange {
                field: "cart lines".to_string(),
                min: 0,
                max: MAX_CART_LINES as i64,
            }
            .into());
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            barcode: barcode.to_string(),
            unit,
            quantity,
            single_price: product.single_price,
            bulk_price: product.bulk_price,
            bulk_quantity: product.bulk_quantity,
        });
        Ok(())
    }

    /// Removes one line by index. No stock side effects.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound { index });
        }
        Ok(self.lines.remove(index))
    }

    /// Discards every line. No stock side effects.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The canonical pending-sale total.
    ///
    /// Checkout freezes exactly this value; nothing else re-derives it,
    /// so the displayed and the charged amount cannot drift apart.
    pub fn compute_total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Base units required per product, aggregated across lines.
    ///
    /// A product can appear twice (a single line and a bulk line); the
    /// confirm-time stock check has to see the combined demand.
    pub fn required_units(&self) -> HashMap<ProductId, u32> {
        let mut required = HashMap::new();
        for line in &self.lines {
            *required.entry(line.product_id).or_insert(0) += line.base_units();
        }
        required
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
