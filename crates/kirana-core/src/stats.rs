//! # Statistics & Stock Alerts
//!
//! Derived, read-only views over the catalog and the ledger. Nothing in
//! this module is stored; every figure is recomputed on demand from the
//! authoritative state.

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::ledger::Ledger;
use crate::money::Money;
use crate::notify::{AlertKey, NotificationKind, NotificationLog, StockCondition};
use crate::settings::Settings;
use crate::types::Product;

// =============================================================================
// Daily Figures
// =============================================================================

/// Net sales for a calendar day: regular sales minus the absolute value of
/// that day's refunds. Replacement settlements are excluded; they are
/// price adjustments, not revenue.
pub fn net_sales(ledger: &Ledger, date: NaiveDate) -> Money {
    let gross: Money = ledger
        .sales_on(date)
        .filter(|s| s.is_sale())
        .map(|s| s.total)
        .sum();
    let refunds: Money = ledger
        .sales_on(date)
        .filter(|s| s.is_return())
        .map(|s| s.total)
        .sum();
    gross - refunds.abs()
}

/// Count of regular sale transactions on a calendar day.
pub fn transaction_count(ledger: &Ledger, date: NaiveDate) -> usize {
    ledger.sales_on(date).filter(|s| s.is_sale()).count()
}

// =============================================================================
// Stock Sets
// =============================================================================

/// Products with `0 < stock < threshold`.
pub fn low_stock<'a>(catalog: &'a Catalog, threshold: u32) -> Vec<&'a Product> {
    catalog
        .products()
        .iter()
        .filter(|p| p.current_stock > 0 && p.current_stock < threshold)
        .collect()
}

/// Products with no stock at all.
pub fn out_of_stock(catalog: &Catalog) -> Vec<&Product> {
    catalog
        .products()
        .iter()
        .filter(|p| p.current_stock == 0)
        .collect()
}

// =============================================================================
// Stock Alerts
// =============================================================================

/// Raises notifications for products that sit in a low/out-of-stock
/// condition without an unread alert for that exact condition.
///
/// Dedup is a structural `(product, condition)` key lookup, so renaming a
/// product or phrasing overlaps between messages cannot suppress or
/// duplicate alerts. Once the cashier reads an alert, a later refresh may
/// raise it again if the condition persists.
pub fn refresh_stock_alerts(
    catalog: &Catalog,
    settings: &Settings,
    log: &mut NotificationLog,
) {
    for product in out_of_stock(catalog) {
        let key = AlertKey {
            product: product.id,
            condition: StockCondition::Out,
        };
        if !log.has_unread_alert(key) {
            log.push_alert(
                format!("{} is out of stock!", product.name),
                NotificationKind::Error,
                key,
            );
        }
    }

    for product in low_stock(catalog, settings.low_stock_threshold) {
        let key = AlertKey {
            product: product.id,
            condition: StockCondition::Low,
        };
        if !log.has_unread_alert(key) {
            log.push_alert(
                format!(
                    "{} is running low on stock ({} units)",
                    product.name, product.current_stock
                ),
                NotificationKind::Warning,
                key,
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
