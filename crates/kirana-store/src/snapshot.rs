//! # Snapshot
//!
//! The structured record that round-trips a whole Store through the
//! key-value backend. Each component lives under its own key, so a
//! partially written or older storage area still loads: absent keys fall
//! back to empty lists, a zero drawer, and an id counter of 1.
//!
//! The cart, the checkout flow, and the login session are deliberately
//! NOT part of the snapshot; they are transient session state and a fresh
//! load starts them empty.

use serde::{Deserialize, Serialize};
use tracing::debug;

use kirana_core::catalog::Catalog;
use kirana_core::ledger::Ledger;
use kirana_core::notify::{Notification, NotificationLog};
use kirana_core::review::{ReviewItem, ReviewQueue};
use kirana_core::settings::Settings;
use kirana_core::types::{Product, Sale};
use kirana_core::{Money, Store};

use crate::backend::StorageBackend;
use crate::error::StoreResult;

// =============================================================================
// Storage Keys
// =============================================================================

/// One key per component, so components load and fail independently.
pub mod keys {
    pub const PRODUCTS: &str = "kirana_products";
    pub const NEXT_PRODUCT_ID: &str = "kirana_next_product_id";
    pub const SALES_HISTORY: &str = "kirana_sales_history";
    pub const CASH_COUNTER: &str = "kirana_cash_counter";
    pub const REVIEW_ITEMS: &str = "kirana_review_items";
    pub const SETTINGS: &str = "kirana_settings";
    pub const NOTIFICATIONS: &str = "kirana_notifications";

    /// Keys covered by [`super::Snapshot`]. Notifications are saved and
    /// loaded separately, matching their separate lifecycle (they can be
    /// cleared without touching business data).
    pub const SNAPSHOT_KEYS: [&str; 6] = [
        PRODUCTS,
        NEXT_PRODUCT_ID,
        SALES_HISTORY,
        CASH_COUNTER,
        REVIEW_ITEMS,
        SETTINGS,
    ];
}

fn default_next_id() -> u64 {
    1
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the persistence contract covers, in one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
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
    pub settings: Settings,
}

impl Snapshot {
    /// Captures the persistable parts of a Store.
    pub fn capture(store: &Store) -> Self {
        Snapshot {
            products: store.catalog.products().to_vec(),
            next_product_id: store.catalog.next_id(),
            sales_history: store.ledger.sales().to_vec(),
            cash_counter: store.ledger.cash_counter(),
            review_items: store.reviews.items().to_vec(),
            settings: store.settings.clone(),
        }
    }

    /// Rebuilds a Store. Cart, checkout and session start fresh; the
    /// notification log starts empty and is loaded separately.
    pub fn restore(self) -> Store {
        Store::from_parts(
            Catalog::from_parts(self.products, self.next_product_id),
            Ledger::from_parts(self.sales_history, self.cash_counter),
            ReviewQueue::from_parts(self.review_items),
            NotificationLog::new(),
            self.settings,
        )
    }

    /// Writes each component under its own key.
    pub fn save<B: StorageBackend>(&self, backend: &mut B) -> StoreResult<()> {
        backend.write(keys::PRODUCTS, &serde_json::to_string(&self.products)?)?;
        backend.write(
            keys::NEXT_PRODUCT_ID,
            &serde_json::to_string(&self.next_product_id)?,
        )?;
        backend.write(
            keys::SALES_HISTORY,
            &serde_json::to_string(&self.sales_history)?,
        )?;
        backend.write(
            keys::CASH_COUNTER,
            &serde_json::to_string(&self.cash_counter)?,
        )?;
        backend.write(
            keys::REVIEW_ITEMS,
            &serde_json::to_string(&self.review_items)?,
        )?;
        backend.write(keys::SETTINGS, &serde_json::to_string(&self.settings)?)?;
        Ok(())
    }

    /// Reads whatever is present, defaulting each absent component.
    ///
    /// ## Errors
    /// Only on backend failures or on a key that is present but holds
    /// corrupt JSON. A completely empty backend loads as a fresh store.
    pub fn load<B: StorageBackend>(backend: &B) -> StoreResult<Self> {
        let snapshot = Snapshot {
            products: read_or_default(backend, keys::PRODUCTS)?,
            next_product_id: match backend.read(keys::NEXT_PRODUCT_ID)? {
                Some(raw) => serde_json::from_str(&raw)?,
                None => default_next_id(),
            },
            sales_history: read_or_default(backend, keys::SALES_HISTORY)?,
            cash_counter: read_or_default(backend, keys::CASH_COUNTER)?,
            review_items: read_or_default(backend, keys::REVIEW_ITEMS)?,
            settings: read_or_default(backend, keys::SETTINGS)?,
        };
        debug!(
            products = snapshot.products.len(),
            sales = snapshot.sales_history.len(),
            reviews = snapshot.review_items.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

fn read_or_default<B: StorageBackend, T: serde::de::DeserializeOwned + Default>(
    backend: &B,
    key: &str,
) -> StoreResult<T> {
    match backend.read(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

// =============================================================================
// Notifications (separate lifecycle)
// =============================================================================

/// Saves the notification log under its own key.
pub fn save_notifications<B: StorageBackend>(
    log: &NotificationLog,
    backend: &mut B,
) -> StoreResult<()> {
    backend.write(
        keys::NOTIFICATIONS,
        &serde_json::to_string(log.items())?,
    )
}

/// Loads the notification log, defaulting to empty.
pub fn load_notifications<B: StorageBackend>(backend: &B) -> StoreResult<NotificationLog> {
    let items: Vec<Notification> = read_or_default(backend, keys::NOTIFICATIONS)?;
    Ok(NotificationLog::from_parts(items))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
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
        store.add_to_cart("1001", 3).unwrap();
        store.begin_checkout().unwrap();
        store.select_payment_mode(PaymentMethod::Upi).unwrap();
        store.confirm_payment().unwrap();
        store.initiate_return("1001", 1, "leaky").unwrap();
        store
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = populated_store();
        let mut backend = MemoryBackend::new();

        Snapshot::capture(&store).save(&mut backend).unwrap();
        save_notifications(&store.notifications, &mut backend).unwrap();

        let restored = Snapshot::load(&backend).unwrap().restore();

        assert_eq!(restored.catalog.products(), store.catalog.products());
        assert_eq!(restored.catalog.next_id(), store.catalog.next_id());
        assert_eq!(restored.ledger.sales(), store.ledger.sales());
        assert_eq!(restored.ledger.cash_counter(), store.ledger.cash_counter());
        assert_eq!(restored.reviews.items(), store.reviews.items());
        assert_eq!(restored.settings, store.settings);

        // Transient state starts fresh.
        assert!(restored.cart.is_empty());

        let notifications = load_notifications(&backend).unwrap();
        assert_eq!(notifications.items(), store.notifications.items());
    }

    #[test]
    fn test_load_from_empty_backend_defaults() {
        let backend = MemoryBackend::new();
        let store = Snapshot::load(&backend).unwrap().restore();

        assert!(store.catalog.is_empty());
        assert_eq!(store.catalog.next_id(), 1);
        assert!(store.ledger.is_empty());
        assert_eq!(store.ledger.cash_counter(), Money::zero());
        assert!(store.reviews.is_empty());
        assert_eq!(store.settings, Settings::default());
    }

    #[test]
    fn test_load_tolerates_partial_state() {
        let store = populated_store();
        let mut backend = MemoryBackend::new();
        Snapshot::capture(&store).save(&mut backend).unwrap();

        // Lose two of the keys; the rest must still load.
        backend.remove(keys::SALES_HISTORY).unwrap();
        backend.remove(keys::CASH_COUNTER).unwrap();

        let restored = Snapshot::load(&backend).unwrap().restore();
        assert_eq!(restored.catalog.len(), 1);
        assert!(restored.ledger.is_empty());
        assert_eq!(restored.ledger.cash_counter(), Money::zero());
    }

    #[test]
    fn test_corrupt_key_is_an_error() {
        let mut backend = MemoryBackend::new();
        backend.write(keys::PRODUCTS, "{{{").unwrap();
        assert!(Snapshot::load(&backend).is_err());
    }
}
