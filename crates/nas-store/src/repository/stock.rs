//! # Stock Repository
//!
//! Stock items, the movement log, alerts and reorder suggestions.
//!
//! ## Movement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_movement(Savon, consumption, 4)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_movement (nas-core)                                              │
//! │       ├── would go below zero → InsufficientStock, nothing written      │
//! │       └── new quantity                                                  │
//! │              │                                                          │
//! │              ▼  same write guard                                        │
//! │       item.quantity = new quantity                                      │
//! │       movement log += { product, kind, 4, note, now, user }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use nas_core::rules::stock::{alerts, suggest_reorder, ReorderSuggestion};
use nas_core::validation::{validate_adjustment, validate_movement_amount};
use nas_core::{MovementKind, StockFamily, StockItem, StockMovement};

use super::{find_mut, new_id, Repo, Repository};
use crate::error::StoreResult;
use crate::store::SharedDataset;

/// A movement as entered by the storekeeper.
///
/// For an adjustment `quantity` is the signed correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: f64,
    pub note: Option<String>,
    pub user_id: Option<String>,
}

/// Repository for stock items and movements.
#[derive(Clone)]
pub struct StockRepository {
    data: SharedDataset,
    items: Repo<StockItem>,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(data: SharedDataset) -> Self {
        StockRepository {
            items: Repo::new(data.clone()),
            data,
        }
    }

    /// Items of one family, or all.
    pub async fn by_family(&self, family: Option<StockFamily>) -> StoreResult<Vec<StockItem>> {
        let data = self.data.read().await;
        Ok(data
            .stock_items
            .iter()
            .filter(|i| family.map_or(true, |f| i.family == f))
            .cloned()
            .collect())
    }

    /// Out-of-stock items first, then low ones.
    pub async fn alerts(&self, family: Option<StockFamily>) -> StoreResult<Vec<StockItem>> {
        let items = self.by_family(family).await?;
        Ok(alerts(&items).into_iter().cloned().collect())
    }

    /// One reorder suggestion per item, most urgent first.
    pub async fn reorder_suggestions(
        &self,
        family: Option<StockFamily>,
    ) -> StoreResult<Vec<ReorderSuggestion>> {
        let items = self.by_family(family).await?;
        let mut suggestions: Vec<ReorderSuggestion> = items.iter().map(suggest_reorder).collect();
        suggestions.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        Ok(suggestions)
    }

    /// Movement log, newest first, optionally for one product.
    pub async fn movements(&self, product_id: Option<&str>) -> StoreResult<Vec<StockMovement>> {
        let data = self.data.read().await;
        let mut log: Vec<StockMovement> = data
            .stock_movements
            .iter()
            .filter(|m| product_id.map_or(true, |p| m.product_id == p))
            .cloned()
            .collect();
        log.reverse();
        Ok(log)
    }

    /// Applies a movement to its item and appends it to the log.
    ///
    /// Returns the updated item and the logged movement.
    pub async fn record_movement(
        &self,
        new: NewMovement,
        now: NaiveDateTime,
    ) -> StoreResult<(StockItem, StockMovement)> {
        match new.kind {
            MovementKind::Adjustment => validate_adjustment(new.quantity)?,
            MovementKind::Purchase | MovementKind::Consumption => {
                validate_movement_amount(new.quantity)?
            }
        }

        let mut data = self.data.write().await;
        let item = find_mut(&mut data.stock_items, &new.product_id)?;

        let quantity = nas_core::rules::stock::apply_movement(item, new.kind, new.quantity)
            .map_err(|err| {
                warn!(product_id = %new.product_id, error = %err, "Movement refused");
                err
            })?;
        item.quantity = quantity;
        let item = item.clone();

        let movement = StockMovement {
            id: new_id(),
            product_id: new.product_id,
            kind: new.kind,
            quantity: new.quantity,
            note: new.note,
            created_at: now,
            user_id: new.user_id,
        };
        data.stock_movements.push(movement.clone());

        info!(
            product_id = %movement.product_id,
            kind = %movement.kind,
            quantity = movement.quantity,
            new_quantity = item.quantity,
            "Stock movement recorded"
        );
        Ok((item, movement))
    }
}

#[async_trait]
impl Repository<StockItem> for StockRepository {
    async fn list(&self) -> StoreResult<Vec<StockItem>> {
        self.items.list().await
    }

    async fn get(&self, id: &str) -> StoreResult<StockItem> {
        self.items.get(id).await
    }

    async fn insert(&self, item: StockItem) -> StoreResult<StockItem> {
        self.items.insert(item).await
    }

    async fn update(&self, item: StockItem) -> StoreResult<StockItem> {
        self.items.update(item).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.items.delete(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
