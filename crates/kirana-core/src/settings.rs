//! # Settings
//!
//! Shop configuration consumed across the system: the statistics module
//! reads the low-stock threshold, receipts and reports read the shop name
//! and currency symbol, and the header clock compares opening hours
//! against the time of day.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Shop configuration.
///
/// All fields have working defaults; the settings screen overwrites them
/// wholesale and the snapshot layer persists them as one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settings {
    /// Displayed in the header and on receipts.
    pub shop_name: String,

    /// Opening time, compared against the wall clock for the open/closed
    /// badge.
    #[ts(as = "String")]
    pub open_time: NaiveTime,

    /// Closing time.
    #[ts(as = "String")]
    pub close_time: NaiveTime,

    /// Stock level below which a product counts as "low stock".
    pub low_stock_threshold: u32,

    /// Currency symbol for display.
    pub currency_symbol: String,

    /// Pop the print dialog automatically after each sale.
    pub auto_print_receipts: bool,

    /// Play a sound on notifications.
    pub sound_notifications: bool,

    /// Mirror a backup after each day's close.
    pub auto_backup: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            shop_name: "Kirana Corner Store".to_string(),
            open_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            close_time: NaiveTime::from_hms_opt(21, 0, 0).expect("valid time"),
            low_stock_threshold: 10,
            currency_symbol: "Rs.".to_string(),
            auto_print_receipts: false,
            sound_notifications: true,
            auto_backup: false,
        }
    }
}

impl Settings {
    /// Whether the shop is open at the given time of day.
    ///
    /// Open is inclusive, close is exclusive: a 09:00-21:00 shop is open
    /// at exactly 09:00 and closed at exactly 21:00.
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        self.open_time <= time && time < self.close_time
    }

    /// Formats a money value with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    /// use kirana_core::settings::Settings;
    ///
    /// let settings = Settings::default();
    /// assert_eq!(settings.format_currency(Money::from_paise(1234)), "Rs. 12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{} {}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.rupees().abs(),
            amount.paise_part()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
