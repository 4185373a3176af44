//! # Stock Commands
//!
//! Lodging and restaurant stock are two screens over one collection. A
//! role sees the families whose screen it displays:
//!
//! ```text
//! ┌──────────────┬────────────────┬─────────────────────┐
//! │ Role         │ /lodging/stock │ /restaurant/stock   │
//! ├──────────────┼────────────────┼─────────────────────┤
//! │ admin        │ yes            │ yes                 │
//! │ storekeeper  │ yes            │ -                   │
//! │ kitchen, bar │ -              │ yes                 │
//! │ accountant   │ -              │ -                   │
//! └──────────────┴────────────────┴─────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, info};

use nas_core::rules::navigation::can_view;
use nas_core::rules::stock::ReorderSuggestion;
use nas_core::validation::{validate_label, validate_stock_amount};
use nas_core::{MovementKind, StockFamily, StockItem, StockMovement, AGGREGATE_PRODUCT_ID};
use nas_store::NewMovement;

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

fn route_of(family: StockFamily) -> &'static str {
    match family {
        StockFamily::Lodging => routes::LODGING_STOCK,
        StockFamily::Restaurant => routes::RESTAURANT_STOCK,
    }
}

/// Families the session may read, narrowed to `family` when given.
///
/// `None` in the result means both.
fn scope(state: &AppState, family: Option<StockFamily>) -> Result<Option<StockFamily>, ApiError> {
    if let Some(family) = family {
        state.session.require(route_of(family))?;
        return Ok(Some(family));
    }

    state
        .session
        .require_any(&[routes::LODGING_STOCK, routes::RESTAURANT_STOCK])?;

    let role = state.session.role();
    let visible: Vec<StockFamily> = StockFamily::ALL
        .iter()
        .copied()
        .filter(|f| can_view(role, route_of(*f)))
        .collect();
    Ok(match visible.as_slice() {
        [only] => Some(*only),
        _ => None,
    })
}

pub async fn list_stock(
    state: &AppState,
    family: Option<StockFamily>,
) -> Result<Vec<StockItem>, ApiError> {
    debug!(family = ?family, "list_stock command");
    let family = scope(state, family)?;
    Ok(state.api.stock_items(family).await?)
}

/// Out items first, then low ones.
pub async fn stock_alerts(
    state: &AppState,
    family: Option<StockFamily>,
) -> Result<Vec<StockItem>, ApiError> {
    let family = scope(state, family)?;
    Ok(state.api.stock_alerts(family).await?)
}

pub async fn reorder_suggestions(
    state: &AppState,
    family: Option<StockFamily>,
) -> Result<Vec<ReorderSuggestion>, ApiError> {
    let family = scope(state, family)?;
    Ok(state.api.reorder_suggestions(family).await?)
}

/// Movement log, newest first. Without a product, only the items of the
/// visible families (and the end-of-service aggregate for the restaurant).
pub async fn movements(
    state: &AppState,
    product_id: Option<&str>,
) -> Result<Vec<StockMovement>, ApiError> {
    if let Some(product_id) = product_id.filter(|p| *p != AGGREGATE_PRODUCT_ID) {
        let item = state.api.fetch::<StockItem>(product_id).await?;
        state.session.require(route_of(item.family))?;
        return Ok(state.api.stock_movements(Some(product_id)).await?);
    }

    let family = scope(state, product_id.map(|_| StockFamily::Restaurant))?;
    let log = state.api.stock_movements(product_id).await?;
    let Some(family) = family else {
        return Ok(log);
    };

    let items = state.api.stock_items(Some(family)).await?;
    Ok(log
        .into_iter()
        .filter(|m| {
            items.iter().any(|i| i.id == m.product_id)
                || (family == StockFamily::Restaurant && m.product_id == AGGREGATE_PRODUCT_ID)
        })
        .collect())
}

/// A movement as entered on a stock screen.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: String,
    pub kind: MovementKind,
    /// Signed for adjustments, positive otherwise.
    pub quantity: f64,
    pub note: Option<String>,
}

/// Applies a movement; the item's family decides the screen.
pub async fn record_movement(
    state: &AppState,
    request: MovementRequest,
) -> Result<StockItem, ApiError> {
    debug!(product_id = %request.product_id, kind = %request.kind, "record_movement command");

    let item = state.api.fetch::<StockItem>(&request.product_id).await?;
    state.session.require(route_of(item.family))?;

    let (item, _) = state
        .api
        .record_movement(NewMovement {
            product_id: request.product_id,
            kind: request.kind,
            quantity: request.quantity,
            note: request.note,
            user_id: Some(state.session.user_name()),
        })
        .await?;
    Ok(item)
}

pub async fn add_stock_item(state: &AppState, item: StockItem) -> Result<StockItem, ApiError> {
    state.session.require(route_of(item.family))?;
    validate_label("product name", &item.name)?;
    validate_stock_amount("quantity", item.quantity)?;
    validate_stock_amount("minimum threshold", item.min_threshold)?;

    let item = state.api.create(item).await?;
    info!(product_id = %item.id, family = %item.family, "Stock item added");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::state;
    use crate::error::ErrorCode;
    use nas_core::rules::navigation::Role;
    use nas_core::rules::stock::ReorderPriority;

    fn names(items: &[StockItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_alerts_follow_role() {
        let admin = stock_alerts(&state(Role::Admin), None).await.unwrap();
        assert_eq!(names(&admin), vec!["Shampooing", "Café", "Huile", "Savon", "Serviettes"]);

        let storekeeper = stock_alerts(&state(Role::Storekeeper), None).await.unwrap();
        assert_eq!(names(&storekeeper), vec!["Shampooing", "Savon", "Serviettes"]);

        let kitchen = stock_alerts(&state(Role::Kitchen), None).await.unwrap();
        assert_eq!(names(&kitchen), vec!["Café", "Huile"]);
    }

    #[tokio::test]
    async fn test_family_guard() {
        let err = list_stock(&state(Role::Storekeeper), Some(StockFamily::Restaurant))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);

        let err = list_stock(&state(Role::Accountant), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);
    }

    #[tokio::test]
    async fn test_purchase_clears_alert() {
        let state = state(Role::Storekeeper);
        let item = record_movement(
            &state,
            MovementRequest {
                product_id: "s5".to_string(),
                kind: MovementKind::Purchase,
                quantity: 40.0,
                note: Some("Delivery".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(item.quantity, 40.0);

        let alerts = stock_alerts(&state, None).await.unwrap();
        assert_eq!(names(&alerts), vec!["Savon", "Serviettes"]);

        let log = movements(&state, Some("s5")).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].user_id.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_overdraw_refused() {
        let state = state(Role::Kitchen);
        let err = record_movement(
            &state,
            MovementRequest {
                product_id: "s8".to_string(),
                kind: MovementKind::Consumption,
                quantity: 3.0,
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        // Kitchen cannot touch lodging items.
        let err = record_movement(
            &state,
            MovementRequest {
                product_id: "s1".to_string(),
                kind: MovementKind::Consumption,
                quantity: 1.0,
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);
    }

    #[tokio::test]
    async fn test_reorder_for_restaurant() {
        let suggestions = reorder_suggestions(&state(Role::Bar), None).await.unwrap();
        let cafe = suggestions.iter().find(|s| s.product_id == "s8").unwrap();
        assert_eq!(cafe.priority, ReorderPriority::Medium);
        assert_eq!(cafe.suggested_quantity, 13.0);
        assert!(suggestions.iter().all(|s| s.product_id != "s1"));
    }
}
