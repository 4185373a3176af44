//! # Repository Module
//!
//! Repository implementations over the shared in-memory data set.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Access layer                                                           │
//! │       │  store.reservations().assign_table("r3", "t9")                  │
//! │       ▼                                                                 │
//! │  ReservationRepository                                                  │
//! │  ├── takes ONE write guard on the data set                              │
//! │  ├── asks nas-core for a verdict (conflict? transition allowed?)        │
//! │  └── applies every change before releasing the guard                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Dataset (Vec per entity)                                               │
//! │                                                                         │
//! │  Plain entities (clients, rooms, tables, menu, stock items, events)     │
//! │  use the generic Repo<T>. Everything behind the Repository<T> trait     │
//! │  can be swapped for a persistent backend.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`Repo`] - Generic CRUD for any [`Record`]
//! - [`ReservationRepository`] - Bookings, table assignment, status machine
//! - [`OrderRepository`] - Order lines and end of service
//! - [`StockRepository`] - Stock items, movements, alerts
//! - [`InvoiceRepository`] - Numbering, search, summary

pub mod invoice;
pub mod order;
pub mod reservation;
pub mod stock;

pub use invoice::{InvoiceFilter, InvoiceRepository, NewInvoice};
pub use order::{NewOrder, OrderRepository};
pub use reservation::{NewDiningReservation, NewStay, ReservationRepository};
pub use stock::{NewMovement, StockRepository};

use async_trait::async_trait;
use std::marker::PhantomData;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::store::SharedDataset;

/// Async CRUD contract for an entity.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// All records, in insertion order.
    async fn list(&self) -> StoreResult<Vec<T>>;

    /// The record with `id`, or `NotFound`.
    async fn get(&self, id: &str) -> StoreResult<T>;

    /// Stores a new record. An empty id is replaced by a generated one.
    async fn insert(&self, record: T) -> StoreResult<T>;

    /// Replaces the record with the same id.
    async fn update(&self, record: T) -> StoreResult<T>;

    /// Removes the record with `id`.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Generates an id for a created record.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Position of `id` in `records`, or `NotFound`.
pub(crate) fn position<T: Record>(records: &[T], id: &str) -> StoreResult<usize> {
    records
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| StoreError::not_found(T::KIND.to_string(), id))
}

/// Borrow of the record with `id`, or `NotFound`.
pub(crate) fn find<'a, T: Record>(records: &'a [T], id: &str) -> StoreResult<&'a T> {
    records
        .iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| StoreError::not_found(T::KIND.to_string(), id))
}

/// Mutable borrow of the record with `id`, or `NotFound`.
pub(crate) fn find_mut<'a, T: Record>(records: &'a mut [T], id: &str) -> StoreResult<&'a mut T> {
    records
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or_else(|| StoreError::not_found(T::KIND.to_string(), id))
}

// =============================================================================
// Generic Repository
// =============================================================================

/// Generic in-memory repository for any [`Record`].
///
/// ## Usage
/// ```rust,ignore
/// let clients = store.clients();
/// let created = clients.insert(client).await?;
/// let all = clients.list().await?;
/// ```
pub struct Repo<T> {
    data: SharedDataset,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repo<T> {
    fn clone(&self) -> Self {
        Repo {
            data: self.data.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Repo<T> {
    /// Creates a new Repo over the shared data set.
    pub fn new(data: SharedDataset) -> Self {
        Repo {
            data,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Record> Repository<T> for Repo<T> {
    async fn list(&self) -> StoreResult<Vec<T>> {
        let data = self.data.read().await;
        let records = T::collection(&data).clone();
        debug!(entity = %T::KIND, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn get(&self, id: &str) -> StoreResult<T> {
        let data = self.data.read().await;
        find(T::collection(&data), id).cloned()
    }

    async fn insert(&self, mut record: T) -> StoreResult<T> {
        record.validate()?;

        let mut data = self.data.write().await;
        let records = T::collection_mut(&mut data);

        if record.id().is_empty() {
            record.set_id(new_id());
        } else if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::duplicate(T::KIND.to_string(), record.id()));
        }

        records.push(record.clone());
        info!(entity = %T::KIND, id = %record.id(), "Record created");
        Ok(record)
    }

    async fn update(&self, record: T) -> StoreResult<T> {
        record.validate()?;

        let mut data = self.data.write().await;
        let records = T::collection_mut(&mut data);
        let index = position(records, record.id())?;
        records[index] = record.clone();

        info!(entity = %T::KIND, id = %record.id(), "Record updated");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let records = T::collection_mut(&mut data);
        let index = position(records, id)?;
        records.remove(index);

        info!(entity = %T::KIND, id = %id, "Record deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
