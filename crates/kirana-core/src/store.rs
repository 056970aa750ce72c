//! # Store
//!
//! The one aggregate owning all mutable state. Every operation in the
//! system goes through a `&mut Store` (or a component it hands out);
//! there are no ambient globals, one construction point, and one explicit
//! teardown.
//!
//! ## Ownership Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              Store                                  │
//! │                                                                     │
//! │   catalog ──── sole authority on products and stock                 │
//! │   cart ─────── pending sale (discarded on settle/cancel/reset)      │
//! │   checkout ─── payment state machine                                │
//! │   ledger ───── append-only history + cash drawer                    │
//! │   reviews ──── pending returns / replacements                       │
//! │   notifications ─ event audit trail                                 │
//! │   settings ─── shop configuration                                   │
//! │   session ──── who is behind the counter                            │
//! │                                                                     │
//! │  Data flow: catalog → cart → checkout → ledger → reviews → both     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Component-local rules live on the components; this module owns the
//! operations that cross components (a sale debits the catalog AND
//! appends to the ledger AND credits the drawer) plus the notifications
//! those operations emit.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::Session;
use crate::cart::Cart;
use crate::catalog::{Catalog, NewProduct};
use crate::checkout::Checkout;
use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::money::Money;
use crate::notify::{NotificationKind, NotificationLog};
use crate::review::{ReviewItem, ReviewKind, ReviewQueue, ReviewStatus};
use crate::settings::Settings;
use crate::stats;
use crate::types::{PaymentMethod, Product, ProductId, Sale, SaleKind, SaleLine};
use crate::validation;
use crate::{RESET_CASH_PHRASE, RESET_STORE_PHRASE};

// =============================================================================
// Store
// =============================================================================

/// All state of a running shop.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub catalog: Catalog,
    pub cart: Cart,
    pub checkout: Checkout,
    pub ledger: Ledger,
    pub reviews: ReviewQueue,
    pub notifications: NotificationLog,
    pub settings: Settings,
    pub session: Session,
}

impl Store {
    /// Creates an empty store with default settings.
    pub fn new() -> Self {
        Store::default()
    }

    /// Creates an empty store with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Store {
            settings,
            ..Store::default()
        }
    }

    /// Rebuilds a store from persisted parts. The cart, checkout flow and
    /// session are transient and always start fresh.
    pub fn from_parts(
        catalog: Catalog,
        ledger: Ledger,
        reviews: ReviewQueue,
        notifications: NotificationLog,
        settings: Settings,
    ) -> Self {
        Store {
            catalog,
            cart: Cart::new(),
            checkout: Checkout::new(),
            ledger,
            reviews,
            notifications,
            settings,
            session: Session::new(),
        }
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Registers a new product and announces it.
    pub fn add_product(&mut self, new: NewProduct) -> CoreResult<ProductId> {
        let product = self.catalog.add_product(new)?;
        let (id, name) = (product.id, product.name.clone());
        self.notifications
            .push(format!("New product added: {name}"), NotificationKind::Success);
        stats::refresh_stock_alerts(&self.catalog, &self.settings, &mut self.notifications);
        Ok(id)
    }

    /// Edits name and prices in place.
    pub fn edit_product(
        &mut self,
        id: ProductId,
        name: &str,
        single_price: Money,
        bulk_price: Money,
    ) -> CoreResult<()> {
        let product = self
            .catalog
            .edit_product(id, name, single_price, bulk_price)?;
        let name = product.name.clone();
        self.notifications
            .push(format!("Product updated: {name}"), NotificationKind::Info);
        Ok(())
    }

    /// Deletes a product.
    ///
    /// ## Errors
    /// `PendingReviews` while any pending return/replacement references
    /// the product. Historical sales are safe either way (they carry name
    /// snapshots), but resolving a review against a vanished product is
    /// not, so those must be approved or rejected first.
    pub fn delete_product(&mut self, id: ProductId) -> CoreResult<Product> {
        if self.reviews.has_pending_for(id) {
            return Err(CoreError::PendingReviews(id));
        }
        let removed = self.catalog.delete_product(id)?;
        self.notifications.push(
            format!("Product deleted: {}", removed.name),
            NotificationKind::Warning,
        );
        Ok(removed)
    }

    /// Adds received stock (loose units plus boxes).
    pub fn add_stock(&mut self, id: ProductId, units: u32, boxes: u32) -> CoreResult<u32> {
        let added = self.catalog.add_stock(id, units, boxes)?;
        let name = self.catalog.product(id)?.name.clone();
        self.notifications.push(
            format!("Stock updated: {name} (+{added} units)"),
            NotificationKind::Info,
        );
        stats::refresh_stock_alerts(&self.catalog, &self.settings, &mut self.notifications);
        Ok(added)
    }

    // =========================================================================
    // Cart & Checkout
    // =========================================================================

    /// Adds a scanned barcode to the cart.
    pub fn add_to_cart(&mut self, barcode: &str, quantity: u32) -> CoreResult<()> {
        self.cart.add_line(&self.catalog, barcode, quantity)
    }

    /// Removes one cart line by index.
    pub fn remove_from_cart(&mut self, index: usize) -> CoreResult<()> {
        self.cart.remove_line(index).map(|_| ())
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Starts the payment flow; returns the frozen total.
    pub fn begin_checkout(&mut self) -> CoreResult<Money> {
        self.checkout.begin(&self.cart)
    }

    /// Records the chosen payment mode.
    pub fn select_payment_mode(&mut self, payment: PaymentMethod) -> CoreResult<()> {
        self.checkout.select_payment_mode(payment)
    }

    /// Settles the sale and returns the recorded ledger entry (for the
    /// receipt). See [`Checkout::confirm`] for the all-or-nothing rules.
    pub fn confirm_payment(&mut self) -> CoreResult<Sale> {
        let cashier = self.session.cashier_name().to_string();
        let sale = self.checkout.confirm(
            &mut self.catalog,
            &mut self.cart,
            &mut self.ledger,
            &cashier,
        )?;

        if let Some(payment) = sale.payment_method() {
            let amount = self.settings.format_currency(sale.total);
            self.notifications.push(
                format!("Sale completed: {amount} ({payment})"),
                NotificationKind::Success,
            );
        }
        stats::refresh_stock_alerts(&self.catalog, &self.settings, &mut self.notifications);
        Ok(sale)
    }

    /// Abandons the payment flow; the cart keeps its lines.
    pub fn cancel_payment(&mut self) {
        self.checkout.cancel();
    }

    // =========================================================================
    // Returns & Replacements
    // =========================================================================

    /// Files a return request for review. Touches neither stock nor cash;
    /// a return is a proposal until someone approves it.
    ///
    /// Returns the new item's id.
    pub fn initiate_return(
        &mut self,
        barcode: &str,
        quantity: u32,
        reason: &str,
    ) -> CoreResult<String> {
        validation::validate_quantity(quantity)?;

        let (product, unit) = self
            .catalog
            .resolve_barcode(barcode)
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;

        let refund = product.line_total(unit, quantity);
        let message = format!(
            "Return initiated: {} ({})",
            product.name,
            self.settings.format_currency(refund)
        );
        let item = ReviewItem {
            id: Uuid::new_v4().to_string(),
            kind: ReviewKind::Return {
                product: product.id,
                product_name: product.name.clone(),
                barcode: barcode.to_string(),
                unit,
                quantity,
                refund,
                reason: reason.to_string(),
            },
            status: ReviewStatus::Pending,
            cashier: self.session.cashier_name().to_string(),
            created_at: Utc::now(),
        };
        let id = self.reviews.push(item).id.clone();
        self.notifications.push(message, NotificationKind::Warning);
        Ok(id)
    }

    /// Files a replacement request for review.
    ///
    /// The new product's availability is checked here so the request is
    /// known-fulfillable when filed, but stock is not reserved; approval
    /// re-validates.
    ///
    /// Returns the new item's id.
    pub fn initiate_replacement(
        &mut self,
        old_barcode: &str,
        new_barcode: &str,
        quantity: u32,
    ) -> CoreResult<String> {
        validation::validate_quantity(quantity)?;

        let (old, old_unit) = self
            .catalog
            .resolve_barcode(old_barcode)
            .ok_or_else(|| CoreError::ProductNotFound(old_barcode.to_string()))?;
        let (new, new_unit) = self
            .catalog
            .resolve_barcode(new_barcode)
            .ok_or_else(|| CoreError::ProductNotFound(new_barcode.to_string()))?;

        let new_units = new.units_for(new_unit, quantity);
        if new_units > new.current_stock {
            return Err(CoreError::short_stock(
                new.id,
                &new.name,
                new.current_stock,
                new_units,
            ));
        }

        let price_difference =
            new.line_total(new_unit, quantity) - old.line_total(old_unit, quantity);

        let diff_text = if price_difference.is_positive() {
            format!("(+{})", self.settings.format_currency(price_difference))
        } else if price_difference.is_negative() {
            format!(
                "({} refund)",
                self.settings.format_currency(price_difference.abs())
            )
        } else {
            "(no price difference)".to_string()
        };
        let message = format!(
            "Replacement initiated: {} -> {} {}",
            old.name, new.name, diff_text
        );

        let item = ReviewItem {
            id: Uuid::new_v4().to_string(),
            kind: ReviewKind::Replacement {
                old_product: old.id,
                old_name: old.name.clone(),
                old_barcode: old_barcode.to_string(),
                old_unit,
                new_product: new.id,
                new_name: new.name.clone(),
                new_barcode: new_barcode.to_string(),
                new_unit,
                quantity,
                price_difference,
            },
            status: ReviewStatus::Pending,
            cashier: self.session.cashier_name().to_string(),
            created_at: Utc::now(),
        };
        let id = self.reviews.push(item).id.clone();
        self.notifications.push(message, NotificationKind::Info);
        Ok(id)
    }

    /// Approves a pending review item, applying its stock and cash
    /// effects and recording the corrective ledger entry.
    ///
    /// All checks run before any mutation: a failure (missing item,
    /// already resolved, replacement stock shortfall) leaves everything
    /// unchanged and the item still pending.
    pub fn approve_review(&mut self, id: &str) -> CoreResult<()> {
        let kind = self.reviews.pending(id)?.kind.clone();
        let approver = self.session.cashier_name().to_string();

        match kind {
            ReviewKind::Return {
                product: product_id,
                unit,
                quantity,
                refund,
                reason,
                ..
            } => {
                let product = self.catalog.product(product_id)?;
                let units = product.units_for(unit, quantity);
                let line = SaleLine {
                    product_id,
                    name: product.name.clone(),
                    unit,
                    quantity,
                    unit_price: product.unit_price(unit),
                    line_total: refund,
                };

                // Goods go back on the shelf; money comes out of the drawer.
                self.catalog.credit_stock(product_id, units)?;
                self.ledger.record(Sale {
                    id: Uuid::new_v4().to_string(),
                    lines: vec![line],
                    total: -refund,
                    kind: SaleKind::Return { reason },
                    timestamp: Utc::now(),
                    cashier: approver.clone(),
                });
            }
            ReviewKind::Replacement {
                old_product,
                new_product,
                old_unit,
                new_unit,
                quantity,
                price_difference,
                ..
            } => {
                let old = self.catalog.product(old_product)?;
                let new = self.catalog.product(new_product)?;
                let old_units = old.units_for(old_unit, quantity);
                let new_units = new.units_for(new_unit, quantity);
                let (old_name, new_name) = (old.name.clone(), new.name.clone());

                // Re-validate before mutating: initiation checked the new
                // product's stock, but anything may have sold since.
                if new_units > new.current_stock {
                    return Err(CoreError::short_stock(
                        new.id,
                        &new.name,
                        new.current_stock,
                        new_units,
                    ));
                }

                self.catalog.credit_stock(old_product, old_units)?;
                self.catalog.debit_stock(new_product, new_units)?;

                // A pure swap moves no money and leaves no ledger entry.
                if !price_difference.is_zero() {
                    self.ledger.record(Sale {
                        id: Uuid::new_v4().to_string(),
                        lines: Vec::new(),
                        total: price_difference,
                        kind: SaleKind::Replacement {
                            old_product,
                            old_name,
                            new_product,
                            new_name,
                            quantity,
                        },
                        timestamp: Utc::now(),
                        cashier: approver.clone(),
                    });
                }
            }
        }

        self.reviews.resolve(
            id,
            ReviewStatus::Approved {
                by: approver,
                at: Utc::now(),
            },
        )?;
        stats::refresh_stock_alerts(&self.catalog, &self.settings, &mut self.notifications);
        Ok(())
    }

    /// Rejects a pending review item. The proposal is discarded; stock,
    /// ledger and drawer are untouched.
    pub fn reject_review(&mut self, id: &str) -> CoreResult<()> {
        let rejecter = self.session.cashier_name().to_string();
        self.reviews.resolve(
            id,
            ReviewStatus::Rejected {
                by: rejecter,
                at: Utc::now(),
            },
        )?;
        Ok(())
    }

    // =========================================================================
    // Privileged Operations
    // =========================================================================

    /// Zeroes the cash drawer. Owner only, and the confirmation phrase
    /// must be typed verbatim.
    pub fn reset_cash(&mut self, confirmation: &str) -> CoreResult<()> {
        self.session.require_owner("reset the cash counter")?;
        validation::require_confirmation(confirmation, RESET_CASH_PHRASE)?;

        self.ledger.reset_cash();
        self.notifications
            .push("Cash counter reset to zero", NotificationKind::Warning);
        Ok(())
    }

    /// Wipes the whole store back to factory state: catalog, cart,
    /// checkout flow, ledger, reviews, notifications, and settings. The
    /// session survives, since someone had to be logged in to do this.
    pub fn reset_all(&mut self, confirmation: &str) -> CoreResult<()> {
        self.session.require_owner("reset the store")?;
        validation::require_confirmation(confirmation, RESET_STORE_PHRASE)?;

        self.catalog = Catalog::new();
        self.cart = Cart::new();
        self.checkout = Checkout::new();
        self.ledger = Ledger::new();
        self.reviews = ReviewQueue::new();
        self.notifications = NotificationLog::new();
        self.settings = Settings::default();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
