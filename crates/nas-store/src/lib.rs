//! # nas-store: In-Memory Store for the NAS Connect Back-Office
//!
//! This crate holds the session data and every operation that reads or
//! writes it. Nothing is persisted: the data set lives in process memory and
//! starts either empty or from the demo fixtures.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     NAS Connect Data Flow                               │
//! │                                                                         │
//! │  Back-office command (assign table, record movement, ...)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     nas-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │    Access     │    │  Repositories │    │    Store     │   │   │
//! │  │   │  (access/)    │    │ (repository/) │    │  (store.rs)  │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ latency       │───►│ Repo<T>       │───►│ RwLock over  │   │   │
//! │  │   │ query cache   │    │ Reservation   │    │ the Dataset  │   │   │
//! │  │   │ invalidation  │    │ Order, Stock  │    │ fixtures     │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  nas-core rules (conflict, stock, invoice, no-show, lifecycle)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The shared data set handle and its settings
//! - [`dataset`] - One collection per entity
//! - [`record`] - Binding of domain types to their collections
//! - [`repository`] - Repository implementations
//! - [`access`] - Async access layer: simulated latency, cached reads
//! - [`fixtures`] - Demo data set
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nas_store::{Api, Store, StoreConfig};
//!
//! let store = Store::seeded(StoreConfig::default(), today);
//! let api = Api::new(store);
//!
//! let tables = api.fetch_all::<Table>().await?;
//! api.assign_table("r3", "t9").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod dataset;
pub mod error;
pub mod fixtures;
pub mod record;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use access::{Api, CacheStats, Clock, QueryCache, QueryKey};
pub use dataset::Dataset;
pub use error::{StoreError, StoreResult};
pub use record::{Editable, EntityKind, Record};
pub use store::{SharedDataset, Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::{
    InvoiceFilter, InvoiceRepository, NewDiningReservation, NewInvoice, NewMovement, NewOrder,
    NewStay, OrderRepository, Repo, Repository, ReservationRepository, StockRepository,
};
