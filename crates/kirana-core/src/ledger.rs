//! # Ledger
//!
//! Append-only sales history plus the cash-drawer accumulator.
//!
//! Every entry that lands here has already passed its checks (stock
//! re-validation, review approval); the ledger itself only appends and
//! keeps the drawer in step with what was appended. Corrections are new
//! entries, never edits.

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::Sale;

/// The append-only record of completed sales, returns, and replacement
/// settlements, plus the running drawer total.
///
/// ## Drawer Discipline
/// The drawer moves exactly with recorded entries: a sale's `total` is
/// positive, a return's is negative, a replacement settlement's is signed.
/// `record` applies that delta, so history and drawer cannot drift apart.
/// The only other mutation is the owner-gated `reset_cash`.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    sales: Vec<Sale>,
    cash_counter: Money,
}

impl Ledger {
    /// Creates an empty ledger with a zero drawer.
    pub fn new() -> Self {
        Ledger {
            sales: Vec::new(),
            cash_counter: Money::zero(),
        }
    }

    /// Rebuilds a ledger from persisted parts.
    pub fn from_parts(sales: Vec<Sale>, cash_counter: Money) -> Self {
        Ledger {
            sales,
            cash_counter,
        }
    }

    /// Appends an entry and moves the drawer by its total.
    pub fn record(&mut self, sale: Sale) -> &Sale {
        self.cash_counter += sale.total;
        self.sales.push(sale);
        self.sales.last().expect("just pushed")
    }

    /// All entries, oldest first.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// The running drawer total.
    pub fn cash_counter(&self) -> Money {
        self.cash_counter
    }

    /// Zeroes the drawer. History is untouched; the caller is responsible
    /// for the owner check and confirmation phrase.
    pub fn reset_cash(&mut self) {
        self.cash_counter = Money::zero();
    }

    /// Entries recorded on the given calendar day.
    pub fn sales_on(&self, date: NaiveDate) -> impl Iterator<Item = &Sale> {
        self.sales
            .iter()
            .filter(move |sale| sale.timestamp.date_naive() == date)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
