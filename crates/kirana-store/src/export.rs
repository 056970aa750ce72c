//! # Export / Import
//!
//! Full-state backup bundles: the snapshot shape plus a format version
//! tag, an export timestamp, and the notification log. Import validates
//! the shape, then performs a full-state replace; asking the user "this
//! will replace all current data, are you sure?" is the UI's job before
//! it calls in here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use kirana_core::notify::{Notification, NotificationLog};
use kirana_core::review::ReviewItem;
use kirana_core::settings::Settings;
use kirana_core::types::{Product, Sale};
use kirana_core::{Money, Store};

use crate::error::{StoreError, StoreResult};
use crate::snapshot::Snapshot;

/// Bundle format version. Bump when the shape changes incompatibly.
pub const FORMAT_VERSION: &str = "2.0";

// =============================================================================
// Export Bundle
// =============================================================================

/// Everything a backup file carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default = "default_next_id")]
    pub next_product_id: u64,
    #[serde(default)]
    pub sales_history: Vec<Sale>,
    #[serde(default)]
    pub cash_counter: Money,
    #[serde(default)]
    pub review_items: Vec<ReviewItem>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub settings: Settings,
}

fn default_next_id() -> u64 {
    1
}

impl ExportBundle {
    /// Captures the full store, notifications included.
    pub fn capture(store: &Store) -> Self {
        let snapshot = Snapshot::capture(store);
        ExportBundle {
            version: FORMAT_VERSION.to_string(),
            exported_at: Utc::now(),
            products: snapshot.products,
            next_product_id: snapshot.next_product_id,
            sales_history: snapshot.sales_history,
            cash_counter: snapshot.cash_counter,
            review_items: snapshot.review_items,
            notifications: store.notifications.items().to_vec(),
            settings: snapshot.settings,
        }
    }

    /// Rebuilds a Store from the bundle, notification log included.
    pub fn restore(self) -> Store {
        let mut store = Snapshot {
            products: self.products,
            next_product_id: self.next_product_id,
            sales_history: self.sales_history,
            cash_counter: self.cash_counter,
            review_items: self.review_items,
            settings: self.settings,
        }
        .restore();
        store.notifications = NotificationLog::from_parts(self.notifications);
        store
    }
}

// =============================================================================
// JSON entry points
// =============================================================================

/// Serializes a full backup, pretty-printed the way backup files are
/// meant to be eyeballed.
pub fn export_json(store: &Store) -> StoreResult<String> {
    let bundle = ExportBundle::capture(store);
    info!(
        products = bundle.products.len(),
        sales = bundle.sales_history.len(),
        "exporting full backup"
    );
    Ok(serde_json::to_string_pretty(&bundle)?)
}

/// Parses a backup file into a Store, replacing nothing yet; the caller
/// decides what to do with the result.
///
/// ## Errors
/// `InvalidFormat` if the payload is not a JSON object or its `products`
/// field is missing or not array-typed; `Codec` if any present field has
/// the wrong shape.
pub fn import_json(raw: &str) -> StoreResult<Store> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| StoreError::InvalidFormat {
            reason: format!("not valid JSON: {e}"),
        })?;

    // The one structural check the import contract promises: products
    // must be an array. Everything else may be absent and defaults.
    let products_ok = value
        .get("products")
        .map(serde_json::Value::is_array)
        .unwrap_or(false);
    if !products_ok {
        return Err(StoreError::InvalidFormat {
            reason: "products must be an array".to_string(),
        });
    }

    let bundle: ExportBundle = serde_json::from_value(value)?;
    info!(
        version = %bundle.version,
        products = bundle.products.len(),
        "importing full backup"
    );
    Ok(bundle.restore())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kirana_core::catalog::NewProduct;
    use kirana_core::types::PaymentMethod;

    fn populated_store() -> Store {
        let mut store = Store::new();
        store
            .add_product(NewProduct {
                name: "Blue Pen".to_string(),
                single_barcode: "1001".to_string(),
                single_price: Money::from_paise(1000),
                bulk_barcode: "2001".to_string(),
                bulk_price: Money::from_paise(9000),
                bulk_quantity: 10,
                initial_units: 20,
                initial_boxes: 0,
            })
            .unwrap();
        store.add_to_cart("1001", 2).unwrap();
        store.begin_checkout().unwrap();
        store.select_payment_mode(PaymentMethod::Card).unwrap();
        store.confirm_payment().unwrap();
        store.initiate_return("1001", 1, "smudged").unwrap();
        store
    }

    #[test]
    fn test_export_import_round_trip() {
        let store = populated_store();

        let json = export_json(&store).unwrap();
        let imported = import_json(&json).unwrap();

        assert_eq!(imported.catalog.products(), store.catalog.products());
        assert_eq!(imported.catalog.next_id(), store.catalog.next_id());
        assert_eq!(imported.ledger.sales(), store.ledger.sales());
        assert_eq!(imported.ledger.cash_counter(), store.ledger.cash_counter());
        assert_eq!(imported.reviews.items(), store.reviews.items());
        assert_eq!(imported.notifications.items(), store.notifications.items());
        assert_eq!(imported.settings, store.settings);
    }

    #[test]
    fn test_export_carries_version_tag() {
        let store = populated_store();
        let json = export_json(&store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], FORMAT_VERSION);
        assert!(value["exported_at"].is_string());
    }

    #[test]
    fn test_import_rejects_missing_or_non_array_products() {
        let err = import_json(r#"{"version":"2.0","exported_at":"2024-05-07T10:00:00Z"}"#)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat { .. }));

        let err = import_json(
            r#"{"version":"2.0","exported_at":"2024-05-07T10:00:00Z","products":"oops"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat { .. }));

        let err = import_json("]not json[").unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat { .. }));
    }

    #[test]
    fn test_import_defaults_absent_fields() {
        let imported = import_json(
            r#"{"version":"2.0","exported_at":"2024-05-07T10:00:00Z","products":[]}"#,
        )
        .unwrap();

        assert!(imported.catalog.is_empty());
        assert_eq!(imported.catalog.next_id(), 1);
        assert!(imported.ledger.is_empty());
        assert_eq!(imported.settings, Settings::default());
    }
}
