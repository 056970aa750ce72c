//! # Domain Types
//!
//! Core domain types used throughout Kirana POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (ProductId) │   │  id (UUID)      │   │  product_id     │   │
//! │  │  two barcodes   │   │  kind (tagged)  │   │  name snapshot  │   │
//! │  │  two prices     │   │  total          │   │  unit, quantity │   │
//! │  │  current_stock  │   │  lines          │   │  frozen prices  │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐                         │
//! │  │    UnitKind     │   │  PaymentMethod  │                         │
//! │  │  ─────────────  │   │  ─────────────  │                         │
//! │  │  Single         │   │  Cash           │                         │
//! │  │  Bulk           │   │  Upi            │                         │
//! │  └─────────────────┘   │  Card           │                         │
//! │                        └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! - Products get sequential `ProductId`s from the catalog counter - they
//!   are referenced all over the ledger and review queue, and short ids
//!   read well on receipts (`prod_004`).
//! - Sales and review items get UUID v4 strings - they are only ever
//!   looked up, never enumerated by a human.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Sequential product identifier, assigned once and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(u64);

impl ProductId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        ProductId(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prod_{:03}", self.0)
    }
}

// =============================================================================
// Unit Kind
// =============================================================================

/// How a quantity is expressed: loose single units or full bulk packs.
///
/// A "box" of a product holds `bulk_quantity` base units; stock is always
/// counted in base units, and this enum decides the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// The smallest sellable quantity.
    Single,
    /// A fixed-size bundle sold under its own barcode and price.
    Bulk,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment modes accepted at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// UPI transfer.
    Upi,
    /// Card payment on external terminal.
    Card,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "CARD",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale, in single units and bulk packs.
///
/// ## Invariants
/// - `current_stock` is in base units and can never go negative (enforced
///   by the type and by validated debits in the catalog)
/// - both barcodes are unique across the whole catalog, including against
///   each other
/// - `bulk_quantity` is positive and immutable after creation; editing it
///   retroactively would corrupt the meaning of recorded stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier, monotonically assigned, immutable.
    pub id: ProductId,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Barcode scanned when selling single units.
    pub single_barcode: String,

    /// Barcode scanned when selling full bulk packs.
    pub bulk_barcode: String,

    /// Price of one single unit.
    pub single_price: Money,

    /// Price of one bulk pack. Independent of the single price; a pack is
    /// not required to cost `bulk_quantity × single_price`.
    pub bulk_price: Money,

    /// Base units per bulk pack.
    pub bulk_quantity: u32,

    /// Current stock level in base units.
    pub current_stock: u32,

    /// When the product was created.
    #[ts(as = "String")]
    pub date_added: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Converts a quantity of the given unit kind into base units.
    ///
    /// This is the single conversion function used everywhere stock is
    /// debited or credited; unit-mismatch bugs die here.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // bulk_quantity = 12
    /// assert_eq!(product.units_for(UnitKind::Single, 5), 5);
    /// assert_eq!(product.units_for(UnitKind::Bulk, 2), 24);
    /// ```
    #[inline]
    pub fn units_for(&self, unit: UnitKind, quantity: u32) -> u32 {
        match unit {
            UnitKind::Single => quantity,
            UnitKind::Bulk => quantity * self.bulk_quantity,
        }
    }

    /// Returns the applicable price for one unit of the given kind.
    #[inline]
    pub fn unit_price(&self, unit: UnitKind) -> Money {
        match unit {
            UnitKind::Single => self.single_price,
            UnitKind::Bulk => self.bulk_price,
        }
    }

    /// Returns the line total for a quantity of the given unit kind.
    #[inline]
    pub fn line_total(&self, unit: UnitKind, quantity: u32) -> Money {
        self.unit_price(unit).times(quantity)
    }

    /// Human-readable stock breakdown, e.g. `"2 boxes + 3 units"`.
    pub fn stock_display(&self) -> String {
        let full_boxes = self.current_stock / self.bulk_quantity;
        let remaining_units = self.current_stock % self.bulk_quantity;

        if full_boxes > 0 && remaining_units > 0 {
            format!("{} boxes + {} units", full_boxes, remaining_units)
        } else if full_boxes > 0 {
            format!("{} boxes", full_boxes)
        } else {
            format!("{} units", remaining_units)
        }
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a recorded sale.
///
/// Uses the snapshot pattern to freeze product data at the time of sale:
/// the name and prices here stay valid for history display even if the
/// product is later edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub product_id: ProductId,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Which price applied.
    pub unit: UnitKind,
    /// Count of units or packs, matching `unit`.
    pub quantity: u32,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub line_total: Money,
}

// =============================================================================
// Sale Kind
// =============================================================================

/// What a ledger entry settles.
///
/// Each variant carries exactly the fields that kind of entry needs; there
/// is no optional-flag soup where a record is simultaneously "maybe a
/// return" and "maybe a replacement".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaleKind {
    /// A regular counter sale, paid through one of the accepted modes.
    Sale { payment: PaymentMethod },

    /// An approved return; the sale total is negative (a refund).
    Return { reason: String },

    /// An approved replacement's price-difference settlement. The total
    /// can be positive or negative. A pure swap produces no entry at all.
    Replacement {
        old_product: ProductId,
        old_name: String,
        new_product: ProductId,
        new_name: String,
        quantity: u32,
    },
}

// =============================================================================
// Sale
// =============================================================================

/// One entry in the append-only sales ledger.
///
/// Once recorded, amount and lines are never edited - corrections happen
/// through further entries (returns, replacement settlements).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Snapshot of the cart lines (or the returned line). Never aliases
    /// the live cart.
    pub lines: Vec<SaleLine>,
    /// Amount that moved through the drawer. Negative for returns.
    pub total: Money,
    pub kind: SaleKind,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub cashier: String,
}

impl Sale {
    #[inline]
    pub fn is_sale(&self) -> bool {
        matches!(self.kind, SaleKind::Sale { .. })
    }

    #[inline]
    pub fn is_return(&self) -> bool {
        matches!(self.kind, SaleKind::Return { .. })
    }

    #[inline]
    pub fn is_replacement(&self) -> bool {
        matches!(self.kind, SaleKind::Replacement { .. })
    }

    /// Payment method for regular sales, `None` for corrective entries.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        match self.kind {
            SaleKind::Sale { payment } => Some(payment),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with(bulk_quantity: u32, stock: u32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Blue Pen".to_string(),
            single_barcode: "1001".to_string(),
            bulk_barcode: "2001".to_string(),
            single_price: Money::from_paise(1000),
            bulk_price: Money::from_paise(9000),
            bulk_quantity,
            current_stock: stock,
            date_added: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::new(7).to_string(), "prod_007");
        assert_eq!(ProductId::new(123).to_string(), "prod_123");
    }

    #[test]
    fn test_units_for() {
        let product = product_with(10, 0);
        assert_eq!(product.units_for(UnitKind::Single, 5), 5);
        assert_eq!(product.units_for(UnitKind::Bulk, 3), 30);
    }

    #[test]
    fn test_unit_price_and_line_total() {
        let product = product_with(10, 0);
        assert_eq!(product.unit_price(UnitKind::Single).paise(), 1000);
        assert_eq!(product.unit_price(UnitKind::Bulk).paise(), 9000);
        assert_eq!(product.line_total(UnitKind::Bulk, 2).paise(), 18000);
    }

    #[test]
    fn test_stock_display() {
        assert_eq!(product_with(10, 23).stock_display(), "2 boxes + 3 units");
        assert_eq!(product_with(10, 20).stock_display(), "2 boxes");
        assert_eq!(product_with(10, 7).stock_display(), "7 units");
        assert_eq!(product_with(10, 0).stock_display(), "0 units");
    }

    #[test]
    fn test_payment_method_display() {
        assert_eq!(PaymentMethod::Cash.to_string(), "CASH");
        assert_eq!(PaymentMethod::Upi.to_string(), "UPI");
        assert_eq!(PaymentMethod::Card.to_string(), "CARD");
    }

    #[test]
    fn test_sale_kind_predicates() {
        let sale = Sale {
            id: "s1".to_string(),
            lines: Vec::new(),
            total: Money::from_paise(100),
            kind: SaleKind::Sale {
                payment: PaymentMethod::Upi,
            },
            timestamp: Utc::now(),
            cashier: "Shopkeeper".to_string(),
        };
        assert!(sale.is_sale());
        assert!(!sale.is_return());
        assert_eq!(sale.payment_method(), Some(PaymentMethod::Upi));

        let ret = Sale {
            kind: SaleKind::Return {
                reason: "damaged".to_string(),
            },
            total: Money::from_paise(-100),
            ..sale
        };
        assert!(ret.is_return());
        assert_eq!(ret.payment_method(), None);
    }
}
