//! # Notification Log
//!
//! Side-channel audit trail of system events: product changes, completed
//! sales, initiated returns, stock alerts. Purely informational; nothing
//! reads it back except the bell icon and the stock-alert dedup check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::types::ProductId;

// =============================================================================
// Notification Kind
// =============================================================================

/// Severity / flavor of a notification, mapped to a color in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

// =============================================================================
// Stock Alert Keys
// =============================================================================

/// The stock condition a product can cross into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockCondition {
    /// `0 < stock < threshold`
    Low,
    /// `stock == 0`
    Out,
}

/// Structural dedup key for stock alerts.
///
/// Alerts are deduplicated by exact `(product, condition)` lookup rather
/// than by matching message text, so a product named "low stock paper"
/// cannot confuse the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AlertKey {
    pub product: ProductId,
    pub condition: StockCondition,
}

// =============================================================================
// Notification
// =============================================================================

/// One entry in the notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Set only for stock alerts; carries the dedup key.
    pub alert: Option<AlertKey>,
}

// =============================================================================
// Notification Log
// =============================================================================

/// Newest-first list of notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    items: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        NotificationLog { items: Vec::new() }
    }

    /// Rebuilds a log from persisted parts.
    pub fn from_parts(items: Vec<Notification>) -> Self {
        NotificationLog { items }
    }

    /// All notifications, newest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Pushes a plain event notification.
    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> &Notification {
        self.push_inner(message.into(), kind, None)
    }

    /// Pushes a stock alert carrying its dedup key.
    pub fn push_alert(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        key: AlertKey,
    ) -> &Notification {
        self.push_inner(message.into(), kind, Some(key))
    }

    fn push_inner(
        &mut self,
        message: String,
        kind: NotificationKind,
        alert: Option<AlertKey>,
    ) -> &Notification {
        self.items.insert(
            0,
            Notification {
                id: Uuid::new_v4().to_string(),
                message,
                kind,
                timestamp: Utc::now(),
                read: false,
                alert,
            },
        );
        &self.items[0]
    }

    /// Whether an unread alert with this key is already in the log.
    pub fn has_unread_alert(&self, key: AlertKey) -> bool {
        self.items
            .iter()
            .any(|n| !n.read && n.alert == Some(key))
    }

    /// Marks one notification read. Returns false if the id is unknown.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Drops every notification.
    pub fn clear_all(&mut self) {
        self.items.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_newest_first() {
        let mut log = NotificationLog::new();
        log.push("first", NotificationKind::Info);
        log.push("second", NotificationKind::Success);

        assert_eq!(log.items()[0].message, "second");
        assert_eq!(log.items()[1].message, "first");
        assert_eq!(log.unread_count(), 2);
    }

    #[test]
    fn test_mark_read() {
        let mut log = NotificationLog::new();
        log.push("hello", NotificationKind::Info);
        let id = log.items()[0].id.clone();

        assert!(log.mark_read(&id));
        assert_eq!(log.unread_count(), 0);
        assert!(!log.mark_read("missing"));
    }

    #[test]
    fn test_alert_dedup_is_structural() {
        let mut log = NotificationLog::new();
        let key = AlertKey {
            product: ProductId::new(3),
            condition: StockCondition::Low,
        };

        // A plain notification mentioning similar text does not count.
        log.push("Blue Pen is running low on stock", NotificationKind::Warning);
        assert!(!log.has_unread_alert(key));

        log.push_alert("Blue Pen is running low on stock (4 units)", NotificationKind::Warning, key);
        assert!(log.has_unread_alert(key));

        // A different condition for the same product is a different key.
        assert!(!log.has_unread_alert(AlertKey {
            product: ProductId::new(3),
            condition: StockCondition::Out,
        }));
    }

    #[test]
    fn test_read_alert_no_longer_dedups() {
        let mut log = NotificationLog::new();
        let key = AlertKey {
            product: ProductId::new(1),
            condition: StockCondition::Out,
        };
        log.push_alert("Blue Pen is out of stock!", NotificationKind::Error, key);
        let id = log.items()[0].id.clone();
        log.mark_read(&id);

        assert!(!log.has_unread_alert(key));
    }

    #[test]
    fn test_clear_all() {
        let mut log = NotificationLog::new();
        log.push("one", NotificationKind::Info);
        log.clear_all();
        assert!(log.is_empty());
    }
}
