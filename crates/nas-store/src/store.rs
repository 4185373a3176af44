//! # Store
//!
//! The handle every caller holds: one shared data set plus the settings the
//! repositories need.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  App startup                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::default().invoice_prefix("NAS") ← settings               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::seeded(config, today)  or  Store::new(config)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────┐                                        │
//! │  │  Arc<RwLock<Dataset>>       │ ◄── cloned into every repository       │
//! │  └─────────────────────────────┘                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.clients() / store.reservations() / store.invoices() ...          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use nas_core::{Client, Event, MenuItem, Room, Table, DEFAULT_GRACE_MINUTES};

use crate::dataset::Dataset;
use crate::fixtures;
use crate::record::Record;
use crate::repository::{
    InvoiceRepository, OrderRepository, Repo, ReservationRepository, StockRepository,
};

/// The data set shared by every repository.
pub type SharedDataset = Arc<RwLock<Dataset>>;

// =============================================================================
// Configuration
// =============================================================================

/// Settings used by the repositories.
///
/// ## Example
/// ```rust
/// use nas_store::StoreConfig;
///
/// let config = StoreConfig::default()
///     .invoice_prefix("NAS")
///     .default_grace_minutes(20);
/// assert_eq!(config.default_grace_minutes, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Prefix of generated invoice numbers.
    /// Default: "NAS"
    pub invoice_prefix: String,

    /// Grace period of dining reservations created without one.
    /// Default: 15 minutes
    pub default_grace_minutes: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            invoice_prefix: "NAS".to_string(),
            default_grace_minutes: DEFAULT_GRACE_MINUTES,
        }
    }
}

impl StoreConfig {
    /// Sets the invoice number prefix.
    pub fn invoice_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.invoice_prefix = prefix.into();
        self
    }

    /// Sets the default grace period.
    pub fn default_grace_minutes(mut self, minutes: u32) -> Self {
        self.default_grace_minutes = minutes;
        self
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cloning is cheap: clones share the same data set.
#[derive(Debug, Clone)]
pub struct Store {
    data: SharedDataset,
    config: Arc<StoreConfig>,
}

impl Store {
    /// Creates an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_dataset(Dataset::default(), config)
    }

    /// Creates a store over an existing data set.
    pub fn with_dataset(dataset: Dataset, config: StoreConfig) -> Self {
        Store {
            data: Arc::new(RwLock::new(dataset)),
            config: Arc::new(config),
        }
    }

    /// Creates a store loaded with the demo data set, dated around `today`.
    pub fn seeded(config: StoreConfig, today: NaiveDate) -> Self {
        let dataset = fixtures::demo_dataset(today);
        info!(
            counts = ?dataset.counts(),
            today = %today,
            "Store seeded with demo data"
        );
        Self::with_dataset(dataset, config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Copy of the whole data set.
    pub async fn snapshot(&self) -> Dataset {
        self.data.read().await.clone()
    }

    /// Generic repository for any record type.
    pub fn repo<T: Record>(&self) -> Repo<T> {
        Repo::new(self.data.clone())
    }

    // -------------------------------------------------------------------------
    // Repository Accessors
    // -------------------------------------------------------------------------

    pub fn clients(&self) -> Repo<Client> {
        self.repo()
    }

    pub fn rooms(&self) -> Repo<Room> {
        self.repo()
    }

    pub fn tables(&self) -> Repo<Table> {
        self.repo()
    }

    pub fn menu(&self) -> Repo<MenuItem> {
        self.repo()
    }

    pub fn events(&self) -> Repo<Event> {
        self.repo()
    }

    pub fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.data.clone(), self.config.default_grace_minutes)
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.data.clone())
    }

    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.data.clone())
    }

    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new(self.data.clone(), self.config.invoice_prefix.clone())
    }
}
