//! # Reporting
//!
//! Day summaries over the ledger: gross sales, gross returns, net total,
//! transaction count, and a per-payment-mode breakdown. Pure functions;
//! rendering to PDF/HTML/print is somebody else's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ledger::Ledger;
use crate::money::Money;
use crate::types::PaymentMethod;

// =============================================================================
// Summary Types
// =============================================================================

/// Per-payment-mode slice of a day's regular sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub transactions: usize,
    pub amount: Money,
}

/// One calendar day of ledger activity, condensed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DaySummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Sum of regular sales.
    pub gross_sales: Money,
    /// Absolute value of refunds issued.
    pub gross_returns: Money,
    /// `gross_sales - gross_returns`.
    pub net_total: Money,
    /// Count of regular sale transactions.
    pub transaction_count: usize,
    /// Regular sales split by payment mode, in fixed mode order, with
    /// zero-activity modes omitted.
    pub by_payment_method: Vec<PaymentBreakdown>,
}

// =============================================================================
// Summary Computation
// =============================================================================

/// Condenses one calendar day of the ledger.
pub fn day_summary(ledger: &Ledger, date: NaiveDate) -> DaySummary {
    let mut gross_sales = Money::zero();
    let mut gross_returns = Money::zero();
    let mut transaction_count = 0usize;

    // Fixed order keeps report rows stable run to run.
    const MODES: [PaymentMethod; 3] =
        [PaymentMethod::Cash, PaymentMethod::Upi, PaymentMethod::Card];
    let mut counts = [0usize; 3];
    let mut amounts = [Money::zero(); 3];

    for sale in ledger.sales_on(date) {
        if sale.is_return() {
            gross_returns += sale.total.abs();
            continue;
        }
        if let Some(method) = sale.payment_method() {
            gross_sales += sale.total;
            transaction_count += 1;
            let slot = MODES
                .iter()
                .position(|m| *m == method)
                .expect("mode is in MODES");
            counts[slot] += 1;
            amounts[slot] += sale.total;
        }
        // Replacement settlements fall through: not revenue, not refunds.
    }

    let by_payment_method = MODES
        .iter()
        .enumerate()
        .filter(|(slot, _)| counts[*slot] > 0)
        .map(|(slot, method)| PaymentBreakdown {
            method: *method,
            transactions: counts[slot],
            amount: amounts[slot],
        })
        .collect();

    DaySummary {
        date,
        gross_sales,
        gross_returns,
        net_total: gross_sales - gross_returns,
        transaction_count,
        by_payment_method,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
