//! # kirana-core: Pure Business Logic for Kirana POS
//!
//! This crate is the **heart** of Kirana POS: a single-counter shop system
//! selling products in single units and bulk packs. It contains all business
//! rules as pure in-memory logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Kirana POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                      Frontend (browser)                     │   │
//! │  │    Counter UI ──► Cart UI ──► Payment UI ──► Review UI      │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ kirana-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │   ┌─────────┐ ┌──────┐ ┌──────────┐ ┌────────┐ ┌────────┐  │   │
//! │  │   │ catalog │ │ cart │ │ checkout │ │ ledger │ │ review │  │   │
//! │  │   └─────────┘ └──────┘ └──────────┘ └────────┘ └────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO STORAGE • NO RENDERING • PURE MUTATIONS      │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 kirana-store (Persistence Layer)            │   │
//! │  │           key-value snapshot mirror, export/import          │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, UnitKind, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`catalog`] - Product records and stock levels
//! - [`cart`] - Pending-sale staging area
//! - [`checkout`] - Payment state machine
//! - [`ledger`] - Append-only sales history and cash drawer
//! - [`review`] - Returns / replacement queue
//! - [`stats`] - Derived daily statistics and stock alerts
//! - [`notify`] - Notification log
//! - [`report`] - Day summaries over the ledger
//! - [`settings`] - Shop configuration
//! - [`auth`] - Owner / shopkeeper session
//! - [`store`] - The one aggregate that owns all of the above
//!
//! ## Design Principles
//!
//! 1. **One Store**: All state lives in an explicit [`store::Store`] passed
//!    by reference; there are no ambient globals.
//! 2. **Integer Money**: All monetary values are in paise (i64) to avoid
//!    float errors.
//! 3. **Explicit Errors**: All errors are typed, never strings or panics.
//! 4. **All-or-nothing**: A failed operation leaves the Store unchanged.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ledger;
pub mod money;
pub mod notify;
pub mod report;
pub mod review;
pub mod settings;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kirana_core::Money` instead of
// `use kirana_core::money::Money`

pub use error::{CoreError, CoreResult, StockShortfall, ValidationError};
pub use money::Money;
pub use store::Store;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity a single cart line may reach.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Confirmation phrase required to reset the cash drawer.
pub const RESET_CASH_PHRASE: &str = "RESET";

/// Confirmation phrase required to wipe the entire store.
pub const RESET_STORE_PHRASE: &str = "RESET STORE";
