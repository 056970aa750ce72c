//! # kirana-store: Persistence Layer for Kirana POS
//!
//! Mirrors the in-memory [`kirana_core::Store`] into local key-value
//! storage and back.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   kirana-core Store  ──capture──►  Snapshot  ──save──►  Backend     │
//! │         ▲                                                │          │
//! │         └──restore──  Snapshot  ◄─────────load───────────┘          │
//! │                                                                     │
//! │   • memory is the source of truth                                   │
//! │   • save runs AFTER the in-memory mutation succeeds                 │
//! │   • a failed save warns; it never rolls the mutation back           │
//! │   • load tolerates missing or partial state                         │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`backend`] - the `StorageBackend` trait plus memory / JSON-file impls
//! - [`snapshot`] - the per-component key scheme and the `Snapshot` record
//! - [`export`] - versioned full-state export / import bundles
//! - [`persisted`] - `Persisted<B>`, the run-then-mirror Store wrapper
//! - [`error`] - persistence error types

pub mod backend;
pub mod error;
pub mod export;
pub mod persisted;
pub mod snapshot;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use error::{StoreError, StoreResult};
pub use export::{ExportBundle, FORMAT_VERSION};
pub use persisted::Persisted;
pub use snapshot::Snapshot;
