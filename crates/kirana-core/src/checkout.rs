//! # Checkout
//!
//! The payment state machine that turns a cart into a ledger entry.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   Idle ──begin()──► AwaitingPaymentMode ──select──► Awaiting        │
//! │    ▲                        │                       Confirmation    │
//! │    │                        │ cancel()                  │           │
//! │    ├────────────────────────┘                           │           │
//! │    │                 cancel()                           │           │
//! │    ├────────────────────────────────────────────────────┤           │
//! │    │                 confirm() (success)                │           │
//! │    └────────────────────────────────────────────────────┘           │
//! │                                                                     │
//! │  begin() freezes the charged amount; confirm() re-validates stock   │
//! │  because arbitrary time may have passed since add-to-cart.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Re-validate at confirm()?
//! Stock was checked when each line was added, but nothing was reserved.
//! Another sale, an approved replacement, or a product deletion can eat
//! the shelf in the meantime. confirm() therefore checks the aggregated
//! demand of the whole cart against current stock and debits all lines or
//! none of them.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, StockShortfall};
use crate::ledger::Ledger;
use crate::money::Money;
use crate::types::{PaymentMethod, Sale, SaleKind, SaleLine};

// =============================================================================
// Checkout State
// =============================================================================

/// Where the payment flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum CheckoutState {
    /// No checkout in progress.
    Idle,
    /// Total is frozen; waiting for the customer to pick a payment mode.
    AwaitingPaymentMode { total: Money },
    /// Mode chosen; waiting for the cashier to confirm receipt of payment.
    AwaitingConfirmation {
        total: Money,
        payment: PaymentMethod,
    },
}

impl CheckoutState {
    /// Short state name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::AwaitingPaymentMode { .. } => "awaiting payment mode",
            CheckoutState::AwaitingConfirmation { .. } => "awaiting confirmation",
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// The checkout driver. One per Store; it owns nothing but its state.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Default for CheckoutState {
    fn default() -> Self {
        CheckoutState::Idle
    }
}

impl Checkout {
    pub fn new() -> Self {
        Checkout {
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Starts (or restarts) the payment flow, freezing the charged amount.
    ///
    /// Calling this while a flow is already in progress simply restarts it
    /// with the cart's current total, matching how a cashier re-opens the
    /// payment screen after editing the cart.
    ///
    /// ## Errors
    /// `EmptyCart` if there is nothing to charge.
    pub fn begin(&mut self, cart: &Cart) -> CoreResult<Money> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = cart.compute_total();
        self.state = CheckoutState::AwaitingPaymentMode { total };
        Ok(total)
    }

    /// Records the chosen payment mode.
    ///
    /// ## Errors
    /// `InvalidCheckoutState` unless a total has been frozen by `begin`.
    pub fn select_payment_mode(&mut self, payment: PaymentMethod) -> CoreResult<()> {
        match self.state {
            CheckoutState::AwaitingPaymentMode { total } => {
                self.state = CheckoutState::AwaitingConfirmation { total, payment };
                Ok(())
            }
            ref other => Err(CoreError::InvalidCheckoutState {
                current: other.name(),
            }),
        }
    }

    /// Settles the sale: re-validates stock, debits it, records the sale,
    /// clears the cart, and returns to `Idle`.
    ///
    /// All-or-nothing: if ANY line cannot be covered, nothing is debited,
    /// the cart stays intact, and the flow stays at confirmation so the
    /// cashier can cancel or fix the cart and retry.
    ///
    /// ## Errors
    /// - `InvalidCheckoutState` unless a payment mode has been selected
    /// - `InsufficientStock` listing every offending line
    pub fn confirm(
        &mut self,
        catalog: &mut Catalog,
        cart: &mut Cart,
        ledger: &mut Ledger,
        cashier: &str,
    ) -> CoreResult<Sale> {
        let (total, payment) = match self.state {
            CheckoutState::AwaitingConfirmation { total, payment } => (total, payment),
            ref other => {
                return Err(CoreError::InvalidCheckoutState {
                    current: other.name(),
                })
            }
        };

        // Re-check the aggregated demand per product before any mutation.
        // A product can appear on two lines (single and bulk), so the
        // per-line view alone could pass while the combined debit would
        // drive stock negative.
        let required = cart.required_units();
        let mut shortfalls: Vec<StockShortfall> = Vec::new();
        for (&product_id, &units) in &required {
            match catalog.get(product_id) {
                Some(product) => {
                    if units > product.current_stock {
                        shortfalls.push(StockShortfall {
                            product_id,
                            name: product.name.clone(),
                            available: product.current_stock,
                            requested: units,
                        });
                    }
                }
                None => {
                    return Err(CoreError::ProductNotFound(product_id.to_string()));
                }
            }
        }
        if !shortfalls.is_empty() {
            shortfalls.sort_by_key(|s| s.product_id);
            return Err(CoreError::InsufficientStock { shortfalls });
        }

        // Validation passed for the whole cart; debits cannot fail now.
        for (&product_id, &units) in &required {
            catalog.debit_stock(product_id, units)?;
        }

        let lines: Vec<SaleLine> = cart
            .lines()
            .iter()
            .map(|line| SaleLine {
                product_id: line.product_id,
                name: line.name.clone(),
                unit: line.unit,
                quantity: line.quantity,
                unit_price: line.unit_price(),
                line_total: line.line_total(),
            })
            .collect();

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            lines,
            total,
            kind: SaleKind::Sale { payment },
            timestamp: Utc::now(),
            cashier: cashier.to_string(),
        };

        let recorded = ledger.record(sale).clone();
        cart.clear();
        self.state = CheckoutState::Idle;
        Ok(recorded)
    }

    /// Abandons the flow, discarding the frozen amount and mode.
    ///
    /// The cart is left untouched so the items remain for retry. Calling
    /// this while idle is a harmless no-op.
    pub fn cancel(&mut self) {
        self.state = CheckoutState::Idle;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewProduct;
    use crate::types::ProductId;

    fn setup() -> (Catalog, Cart, Ledger, Checkout) {
        let mut catalog = Catalog::new();
        catalog
            .add_product(NewProduct {
                name: "Blue Pen".to_string(),
                single_barcode: "1001".to_string(),
                single_price: Money::from_paise(500),
                bulk_barcode: "2001".to_string(),
                bulk_price: Money::from_paise(4000),
                bulk_quantity: 10,
                initial_units: 0,
                initial_boxes: 2, // 20 units
            })
            .unwrap();
        (catalog, Cart::new(), Ledger::new(), Checkout::new())
    }

    #[test]
    fn test_begin_empty_cart() {
        let (_, cart, _, mut checkout) = setup();
        assert!(matches!(
            checkout.begin(&cart),
            Err(CoreError::EmptyCart)
        ));
        assert_eq!(checkout.state(), CheckoutState::Idle);
    }

    #[test]
    fn test_happy_path_settles_and_resets() {
        let (mut catalog, mut cart, mut ledger, mut checkout) = setup();
        cart.add_line(&catalog, "1001", 4).unwrap();

        let total = checkout.begin(&cart).unwrap();
        assert_eq!(total.paise(), 2000);

        checkout.select_payment_mode(PaymentMethod::Upi).unwrap();
        let sale = checkout
            .confirm(&mut catalog, &mut cart, &mut ledger, "Shopkeeper")
            .unwrap();

        assert_eq!(sale.total.paise(), 2000);
        assert_eq!(sale.payment_method(), Some(PaymentMethod::Upi));
        assert_eq!(sale.lines.len(), 1);
        assert_eq!(sale.lines[0].quantity, 4);

        assert_eq!(catalog.get(ProductId::new(1)).unwrap().current_stock, 16);
        assert_eq!(ledger.cash_counter().paise(), 2000);
        assert!(cart.is_empty());
        assert_eq!(checkout.state(), CheckoutState::Idle);
    }

    #[test]
    fn test_confirm_requires_selected_mode() {
        let (mut catalog, mut cart, mut ledger, mut checkout) = setup();
        cart.add_line(&catalog, "1001", 1).unwrap();
        checkout.begin(&cart).unwrap();

        let err = checkout
            .confirm(&mut catalog, &mut cart, &mut ledger, "Shopkeeper")
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidCheckoutState { .. }));
    }

    #[test]
    fn test_select_mode_requires_begin() {
        let (_, _, _, mut checkout) = setup();
        assert!(matches!(
            checkout.select_payment_mode(PaymentMethod::Cash),
            Err(CoreError::InvalidCheckoutState { .. })
        ));
    }

    #[test]
    fn test_confirm_all_or_nothing_when_stock_depleted() {
        let (mut catalog, mut cart, mut ledger, mut checkout) = setup();
        // Second product with plenty of stock.
        catalog
            .add_product(NewProduct {
                name: "Eraser".to_string(),
                single_barcode: "1003".to_string(),
                single_price: Money::from_paise(200),
                bulk_barcode: "2003".to_string(),
                bulk_price: Money::from_paise(1500),
                bulk_quantity: 10,
                initial_units: 50,
                initial_boxes: 0,
            })
            .unwrap();

        cart.add_line(&catalog, "1001", 4).unwrap();
        cart.add_line(&catalog, "1003", 2).unwrap();
        checkout.begin(&cart).unwrap();
        checkout.select_payment_mode(PaymentMethod::Cash).unwrap();

        // Deplete pens behind the cart's back.
        catalog.debit_stock(ProductId::new(1), 18).unwrap(); // 2 left

        let err = checkout
            .confirm(&mut catalog, &mut cart, &mut ledger, "Shopkeeper")
            .unwrap_err();
        match err {
            CoreError::InsufficientStock { shortfalls } => {
                assert_eq!(shortfalls.len(), 1);
                assert_eq!(shortfalls[0].name, "Blue Pen");
                assert_eq!(shortfalls[0].available, 2);
                assert_eq!(shortfalls[0].requested, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Nothing debited, nothing recorded, cart intact - even the line
        // that still had sufficient stock.
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().current_stock, 2);
        assert_eq!(catalog.get(ProductId::new(2)).unwrap().current_stock, 50);
        assert!(ledger.is_empty());
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_confirm_aggregates_single_and_bulk_lines() {
        let (mut catalog, mut cart, mut ledger, mut checkout) = setup();

        // 15 singles + 1 bulk pack of 10 = 25 base units, only 20 on hand.
        // Each line alone passes the shelf check.
        cart.add_line(&catalog, "1001", 15).unwrap();
        cart.add_line(&catalog, "2001", 1).unwrap();
        checkout.begin(&cart).unwrap();
        checkout.select_payment_mode(PaymentMethod::Cash).unwrap();

        let err = checkout
            .confirm(&mut catalog, &mut cart, &mut ledger, "Shopkeeper")
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().current_stock, 20);
    }

    #[test]
    fn test_cancel_keeps_cart() {
        let (catalog, mut cart, _, mut checkout) = setup();
        cart.add_line(&catalog, "1001", 4).unwrap();
        checkout.begin(&cart).unwrap();
        checkout.select_payment_mode(PaymentMethod::Card).unwrap();

        checkout.cancel();
        assert_eq!(checkout.state(), CheckoutState::Idle);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_begin_restarts_with_fresh_total() {
        let (catalog, mut cart, _, mut checkout) = setup();
        cart.add_line(&catalog, "1001", 1).unwrap();
        checkout.begin(&cart).unwrap();

        cart.add_line(&catalog, "1001", 1).unwrap();
        let total = checkout.begin(&cart).unwrap();
        assert_eq!(total.paise(), 1000);
        assert_eq!(
            checkout.state(),
            CheckoutState::AwaitingPaymentMode { total }
        );
    }
}
