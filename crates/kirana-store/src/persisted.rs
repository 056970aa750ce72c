//! # Persisted Store
//!
//! `Persisted<B>` pairs the in-memory [`Store`] with a storage backend and
//! mirrors every mutation into it.
//!
//! ## Mirror Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   with_store_mut(f)                                                 │
//! │        │                                                            │
//! │        ├─► 1. run f against &mut Store      (authoritative)         │
//! │        │                                                            │
//! │        └─► 2. snapshot + save to backend    (best effort)           │
//! │                 │                                                   │
//! │                 └─ on failure: warn!, stash the error,              │
//! │                    return f's result unchanged                      │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-memory operation NEVER rolls back because the mirror failed.
//! The stashed error is there for the shell to show a "could not save"
//! warning; the next successful save clears it.

use tracing::{debug, warn};

use kirana_core::Store;

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use crate::snapshot::{load_notifications, save_notifications, Snapshot};

/// A [`Store`] mirrored into a [`StorageBackend`] after every mutation.
#[derive(Debug)]
pub struct Persisted<B: StorageBackend> {
    store: Store,
    backend: B,
    last_save_error: Option<StoreError>,
}

impl<B: StorageBackend> Persisted<B> {
    /// Loads whatever the backend holds and wraps it. An empty backend
    /// yields a fresh store.
    ///
    /// ## Errors
    /// Only on backend read failures or corrupt stored JSON; missing keys
    /// are not errors (they default).
    pub fn open(backend: B) -> StoreResult<Self> {
        let mut store = Snapshot::load(&backend)?.restore();
        store.notifications = load_notifications(&backend)?;
        debug!(
            products = store.catalog.len(),
            sales = store.ledger.len(),
            "opened persisted store"
        );
        Ok(Persisted {
            store,
            backend,
            last_save_error: None,
        })
    }

    /// Wraps an already-built store, replacing whatever the backend held.
    /// This is the import path: the caller confirmed the full-state
    /// replace, so the new state is mirrored immediately.
    pub fn replace(store: Store, backend: B) -> Self {
        let mut persisted = Persisted {
            store,
            backend,
            last_save_error: None,
        };
        persisted.mirror();
        persisted
    }

    /// Read access without touching the backend.
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        f(&self.store)
    }

    /// Runs a mutation, then mirrors the result to the backend.
    ///
    /// The mutation's outcome is returned as-is; a failed mirror is
    /// logged, stashed in [`Persisted::last_save_error`], and does not
    /// roll anything back.
    pub fn with_store_mut<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let result = f(&mut self.store);
        self.mirror();
        result
    }

    /// The error from the most recent failed save, if the save after the
    /// last mutation failed. Cleared by the next successful save.
    pub fn last_save_error(&self) -> Option<&StoreError> {
        self.last_save_error.as_ref()
    }

    /// Forces a full save immediately.
    pub fn save(&mut self) -> StoreResult<()> {
        Snapshot::capture(&self.store).save(&mut self.backend)?;
        save_notifications(&self.store.notifications, &mut self.backend)?;
        Ok(())
    }

    /// Hands the store and backend back, consuming the wrapper.
    pub fn into_parts(self) -> (Store, B) {
        (self.store, self.backend)
    }

    fn mirror(&mut self) {
        match self.save() {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!(error = %e, "failed to mirror store to storage; memory state kept");
                self.last_save_error = Some(e);
            }
        }
    }
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
    use kirana_core::Money;

    fn pen() -> NewProduct {
        NewProduct {
            name: "Blue Pen".to_string(),
            single_barcode: "1001".to_string(),
            single_price: Money::from_paise(1000),
            bulk_barcode: "2001".to_string(),
            bulk_price: Money::from_paise(9000),
            bulk_quantity: 10,
            initial_units: 20,
            initial_boxes: 0,
        }
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let mut persisted = Persisted::open(MemoryBackend::new()).unwrap();

        persisted
            .with_store_mut(|store| store.add_product(pen()))
            .unwrap();
        persisted
            .with_store_mut(|store| {
                store.add_to_cart("1001", 3)?;
                store.begin_checkout()?;
                store.select_payment_mode(PaymentMethod::Cash)?;
                store.confirm_payment()
            })
            .unwrap();
        assert!(persisted.last_save_error().is_none());

        let (_, backend) = persisted.into_parts();
        let reopened = Persisted::open(backend).unwrap();

        reopened.with_store(|store| {
            assert_eq!(store.catalog.len(), 1);
            assert_eq!(store.ledger.len(), 1);
            assert_eq!(store.ledger.cash_counter().paise(), 3000);
            assert!(!store.notifications.is_empty());
            // Transient state is not persisted.
            assert!(store.cart.is_empty());
        });
    }

    #[test]
    fn test_open_empty_backend_is_fresh_store() {
        let persisted = Persisted::open(MemoryBackend::new()).unwrap();
        persisted.with_store(|store| {
            assert!(store.catalog.is_empty());
            assert!(store.ledger.is_empty());
        });
    }

    #[test]
    fn test_replace_mirrors_immediately() {
        let mut store = Store::new();
        store.add_product(pen()).unwrap();

        let persisted = Persisted::replace(store, MemoryBackend::new());
        assert!(persisted.last_save_error().is_none());

        let (_, backend) = persisted.into_parts();
        let reopened = Persisted::open(backend).unwrap();
        reopened.with_store(|store| assert_eq!(store.catalog.len(), 1));
    }

    /// Backend that accepts reads but refuses every write.
    struct ReadOnlyBackend;

    impl StorageBackend for ReadOnlyBackend {
        fn read(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut persisted = Persisted::open(ReadOnlyBackend).unwrap();

        let id = persisted
            .with_store_mut(|store| store.add_product(pen()))
            .unwrap();

        // The mutation stands; the failure is surfaced, not propagated.
        persisted.with_store(|store| {
            assert!(store.catalog.get(id).is_some());
        });
        assert!(matches!(
            persisted.last_save_error(),
            Some(StoreError::Io(_))
        ));
    }
}
