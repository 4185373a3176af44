//! # Query Cache
//!
//! Results of read queries, kept until a mutation touches one of the entity
//! kinds they were computed from.
//!
//! ## Invalidation
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ Cached query                 │ Depends on                               │
//! ├──────────────────────────────┼──────────────────────────────────────────┤
//! │ fetch_all / Table            │ Table                                    │
//! │ dining_on / 2025-03-01       │ Reservation                              │
//! │ dashboard / 2025-03-01       │ Room, Reservation, Invoice, Stock, Event │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//!
//! assign_table(r3, t9)  ──►  invalidate([Reservation, Table])
//!                            drops all three rows above
//! ```
//!
//! Invalidation is coarse: every entry depending on a mutated kind goes,
//! whatever its scope.

use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::record::EntityKind;

/// Identifies a cached query: its name plus an optional argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub name: &'static str,
    pub scope: Option<String>,
}

impl QueryKey {
    /// Query without argument.
    pub fn new(name: &'static str) -> Self {
        QueryKey { name, scope: None }
    }

    /// Query with an argument (a day, an id, a filter).
    pub fn scoped(name: &'static str, scope: impl ToString) -> Self {
        QueryKey {
            name,
            scope: Some(scope.to_string()),
        }
    }
}

struct CacheEntry {
    deps: Vec<EntityKind>,
    value: Arc<dyn Any + Send + Sync>,
}

/// Hit / miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Typed query cache with invalidation by entity kind.
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        // The map stays consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached value for `key`, counting a hit or a miss.
    ///
    /// A value stored under `key` with another type counts as a miss.
    pub fn get<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let value = self
            .entries()
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned());

        match value {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(query = key.name, scope = ?key.scope, "Cache hit");
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(query = key.name, scope = ?key.scope, "Cache miss");
                None
            }
        }
    }

    /// Stores `value` for `key`, computed from the kinds in `deps`.
    pub fn put<T: Send + Sync + 'static>(&self, key: QueryKey, deps: &[EntityKind], value: T) {
        self.entries().insert(
            key,
            CacheEntry {
                deps: deps.to_vec(),
                value: Arc::new(value),
            },
        );
    }

    /// Drops every entry depending on one of `kinds`. Returns how many went.
    pub fn invalidate(&self, kinds: &[EntityKind]) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.deps.iter().any(|d| kinds.contains(d)));
        let dropped = before - entries.len();

        if dropped > 0 {
            debug!(kinds = ?kinds, dropped, "Cache invalidated");
        }
        dropped
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries().len(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
