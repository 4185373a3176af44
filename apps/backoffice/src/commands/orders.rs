//! # Order Commands
//!
//! Order lines taken at a table, the kitchen flow and the end-of-service
//! close.
//!
//! ```text
//!   add ──► entered ──send──► sent ──serve──► served
//!              │                │
//!              └─────cancel─────┴──► cancelled
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nas_core::rules::lifecycle::ServiceReport;
use nas_core::{MenuItem, Money, Order, OrderStatus};
use nas_store::NewOrder;

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// A line as typed by the waiter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderRequest {
    pub reservation_id: String,
    pub menu_item_id: String,
    pub quantity: u32,
}

/// An order line with its menu name and amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketLine {
    #[serde(flatten)]
    pub order: Order,
    pub name: String,
    pub amount: Money,
}

/// Every line of one reservation and the running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTicket {
    pub reservation_id: String,
    pub lines: Vec<TicketLine>,
    /// Cancelled lines excluded.
    pub total: Money,
}

/// The ticket of a reservation.
pub async fn ticket(state: &AppState, reservation_id: &str) -> Result<OrderTicket, ApiError> {
    debug!(reservation_id, "ticket command");
    state.session.require(routes::FLOOR)?;

    let orders = state.api.orders_for(reservation_id).await?;
    let menu = state.api.fetch_all::<MenuItem>().await?;

    let lines: Vec<TicketLine> = orders
        .into_iter()
        .map(|order| {
            let item = menu.iter().find(|m| m.id == order.menu_item_id);
            TicketLine {
                name: item.map_or_else(|| order.menu_item_id.clone(), |m| m.name.clone()),
                amount: item.map(|m| m.price * i64::from(order.quantity)).unwrap_or_default(),
                order,
            }
        })
        .collect();

    let total = lines
        .iter()
        .filter(|l| l.order.status != OrderStatus::Cancelled)
        .map(|l| l.amount)
        .sum();

    Ok(OrderTicket {
        reservation_id: reservation_id.to_string(),
        lines,
        total,
    })
}

pub async fn add_order(state: &AppState, request: AddOrderRequest) -> Result<Order, ApiError> {
    state.session.require(routes::FLOOR)?;
    Ok(state
        .api
        .add_order(NewOrder {
            reservation_id: request.reservation_id,
            menu_item_id: request.menu_item_id,
            quantity: request.quantity,
        })
        .await?)
}

/// Sends the entered lines to the kitchen.
pub async fn send_orders(state: &AppState, reservation_id: &str) -> Result<Vec<Order>, ApiError> {
    state.session.require(routes::FLOOR)?;
    Ok(state.api.send_orders(reservation_id).await?)
}

/// Marks the sent lines as served.
pub async fn serve_orders(state: &AppState, reservation_id: &str) -> Result<Vec<Order>, ApiError> {
    state.session.require(routes::FLOOR)?;
    Ok(state.api.serve_orders(reservation_id).await?)
}

pub async fn cancel_order(
    state: &AppState,
    order_id: &str,
    reason: Option<String>,
) -> Result<Order, ApiError> {
    state.session.require(routes::FLOOR)?;
    Ok(state.api.cancel_order(order_id, reason).await?)
}

/// Closes the service under the session's user name.
pub async fn end_of_service(state: &AppState) -> Result<ServiceReport, ApiError> {
    state.session.require(routes::FLOOR)?;

    let user = state.session.user_name();
    let report = state.api.end_of_service(Some(user.clone())).await?;
    info!(user = %user, items = report.items_sold, total = %report.total_sales, "Service closed");
    Ok(report)
}
