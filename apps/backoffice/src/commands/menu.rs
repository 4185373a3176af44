//! # Menu Commands

use tracing::{debug, info};

use nas_core::validation::{validate_label, validate_price};
use nas_core::MenuItem;

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// Menu items by category then name, optionally of one category.
pub async fn list_menu(
    state: &AppState,
    category: Option<&str>,
) -> Result<Vec<MenuItem>, ApiError> {
    debug!(category = ?category, "list_menu command");
    state.session.require(routes::MENU)?;

    let mut items: Vec<MenuItem> = state
        .api
        .fetch_all::<MenuItem>()
        .await?
        .into_iter()
        .filter(|m| category.map_or(true, |c| m.category_id.eq_ignore_ascii_case(c)))
        .collect();
    items.sort_by(|a, b| (&a.category_id, &a.name).cmp(&(&b.category_id, &b.name)));
    Ok(items)
}

pub async fn add_menu_item(state: &AppState, item: MenuItem) -> Result<MenuItem, ApiError> {
    state.session.require(routes::MENU)?;
    validate_label("menu item name", &item.name)?;
    validate_price(item.price.units())?;

    let item = state.api.create(item).await?;
    info!(menu_item_id = %item.id, name = %item.name, "Menu item added");
    Ok(item)
}

/// Switches an item on or off. Switched-off items cannot be ordered.
pub async fn set_available(
    state: &AppState,
    menu_item_id: &str,
    enabled: bool,
) -> Result<MenuItem, ApiError> {
    state.session.require(routes::MENU)?;

    let mut item = state.api.fetch::<MenuItem>(menu_item_id).await?;
    if item.enabled == enabled {
        return Ok(item);
    }
    item.enabled = enabled;

    let item = state.api.update(item).await?;
    info!(menu_item_id, enabled, "Menu item availability changed");
    Ok(item)
}
