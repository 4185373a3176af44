//! # Order Repository
//!
//! Order lines of dining reservations, batch send / serve, and the end of
//! service aggregate.
//!
//! ## Service Flow
//! ```text
//! waiter adds lines ──► entered
//!        │
//!        ▼  send_batch(reservation)
//!      sent ──► kitchen / bar
//!        │
//!        ▼  serve_batch(reservation)
//!     served
//!        │
//!        ▼  end_of_service()
//! ServiceReport + aggregate consumption movement in the stock log
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use nas_core::rules::lifecycle::{
    check_orderable, end_of_service, next_order_status, OrderAction, ServiceReport,
};
use nas_core::validation::validate_order_quantity;
use nas_core::{
    MovementKind, Order, OrderStatus, ReservationKind, StockMovement, AGGREGATE_PRODUCT_ID,
};

use super::{find, find_mut, new_id};
use crate::error::StoreResult;
use crate::store::SharedDataset;

/// Note attached to the aggregate movement.
pub const END_OF_SERVICE_NOTE: &str = "End of service - aggregate";

/// An order line as entered by the waiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub reservation_id: String,
    pub menu_item_id: String,
    pub quantity: u32,
}

/// Repository for order lines.
#[derive(Clone)]
pub struct OrderRepository {
    data: SharedDataset,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(data: SharedDataset) -> Self {
        OrderRepository { data }
    }

    pub async fn list(&self) -> StoreResult<Vec<Order>> {
        Ok(self.data.read().await.orders.clone())
    }

    /// Lines of one reservation, oldest first.
    pub async fn for_reservation(&self, reservation_id: &str) -> StoreResult<Vec<Order>> {
        let data = self.data.read().await;
        let mut lines: Vec<Order> = data
            .orders
            .iter()
            .filter(|o| o.reservation_id == reservation_id)
            .cloned()
            .collect();
        lines.sort_by_key(|o| o.created_at);
        Ok(lines)
    }

    /// Adds an `entered` line.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown reservation or menu item
    /// - `WrongReservationKind` when the reservation is not a dining one
    /// - `MenuItemUnavailable` when the item is switched off
    pub async fn add(&self, new: NewOrder, now: NaiveDateTime) -> StoreResult<Order> {
        validate_order_quantity(new.quantity)?;

        let mut data = self.data.write().await;

        let reservation = find(&data.reservations, &new.reservation_id)?;
        if reservation.kind != ReservationKind::Dining {
            return Err(nas_core::CoreError::WrongReservationKind {
                reservation_id: reservation.id.clone(),
                expected: ReservationKind::Dining.to_string(),
                actual: reservation.kind.to_string(),
            }
            .into());
        }
        check_orderable(find(&data.menu_items, &new.menu_item_id)?)?;

        let order = Order {
            id: new_id(),
            reservation_id: new.reservation_id,
            menu_item_id: new.menu_item_id,
            quantity: new.quantity,
            status: OrderStatus::Entered,
            cancellation_reason: None,
            created_at: now,
        };
        data.orders.push(order.clone());

        info!(
            order_id = %order.id,
            reservation_id = %order.reservation_id,
            menu_item_id = %order.menu_item_id,
            quantity = order.quantity,
            "Order line entered"
        );
        Ok(order)
    }

    /// Applies `action` to every line of the reservation currently in `from`.
    async fn batch(
        &self,
        reservation_id: &str,
        from: OrderStatus,
        action: OrderAction,
    ) -> StoreResult<Vec<Order>> {
        let mut data = self.data.write().await;
        find(&data.reservations, reservation_id)?;

        let mut changed = Vec::new();
        for order in data
            .orders
            .iter_mut()
            .filter(|o| o.reservation_id == reservation_id && o.status == from)
        {
            order.status = next_order_status(order, action)?;
            changed.push(order.clone());
        }

        info!(
            reservation_id = %reservation_id,
            count = changed.len(),
            action = ?action,
            "Order batch applied"
        );
        Ok(changed)
    }

    /// Sends every `entered` line of the reservation.
    pub async fn send_batch(&self, reservation_id: &str) -> StoreResult<Vec<Order>> {
        self.batch(reservation_id, OrderStatus::Entered, OrderAction::Send).await
    }

    /// Marks every `sent` line of the reservation as served.
    pub async fn serve_batch(&self, reservation_id: &str) -> StoreResult<Vec<Order>> {
        self.batch(reservation_id, OrderStatus::Sent, OrderAction::Serve).await
    }

    /// Cancels one line, with an optional reason.
    pub async fn cancel(&self, order_id: &str, reason: Option<String>) -> StoreResult<Order> {
        let mut data = self.data.write().await;
        let order = find_mut(&mut data.orders, order_id)?;

        order.status = next_order_status(order, OrderAction::Cancel).map_err(|err| {
            warn!(order_id = %order_id, error = %err, "Cancellation refused");
            err
        })?;
        order.cancellation_reason = reason.filter(|r| !r.trim().is_empty());

        info!(order_id = %order_id, reason = ?order.cancellation_reason, "Order line cancelled");
        Ok(order.clone())
    }

    /// Closes the service: totals the non-cancelled lines and logs one
    /// aggregate consumption movement.
    pub async fn end_of_service(
        &self,
        now: NaiveDateTime,
        user_id: Option<String>,
    ) -> StoreResult<ServiceReport> {
        let mut data = self.data.write().await;
        let report = end_of_service(&data.orders, &data.menu_items);

        data.stock_movements.push(StockMovement {
            id: new_id(),
            product_id: AGGREGATE_PRODUCT_ID.to_string(),
            kind: MovementKind::Consumption,
            quantity: f64::from(report.items_sold),
            note: Some(END_OF_SERVICE_NOTE.to_string()),
            created_at: now,
            user_id,
        });

        info!(
            orders = report.order_count,
            items = report.items_sold,
            total = %report.total_sales,
            "End of service recorded"
        );
        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::error::StoreError;
    use crate::store::{Store, StoreConfig};
    use chrono::NaiveDate;
    use nas_core::{CoreError, MenuItem, Money, Reservation, ReservationStatus};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    fn menu_item(id: &str, price: i64, enabled: bool) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            category_id: "mains".to_string(),
            name: id.to_uppercase(),
            price: Money::from_units(price),
            photo_url: None,
            enabled,
            variants: vec![],
        }
    }

    fn reservation(id: &str, kind: ReservationKind) -> Reservation {
        Reservation {
            id: id.to_string(),
            kind,
            client_id: None,
            room_id: None,
            table_id: None,
            start: now(),
            end: None,
            time_slot: None,
            party_size: Some(2),
            status: ReservationStatus::CheckedIn,
            grace_period_minutes: 15,
            notes: None,
        }
    }

    fn store() -> Store {
        let mut data = Dataset::default();
        data.menu_items = vec![menu_item("m1", 10_000, true), menu_item("m3", 14_000, false)];
        data.reservations = vec![
            reservation("r1", ReservationKind::Dining),
            reservation("h1", ReservationKind::Lodging),
        ];
        Store::with_dataset(data, StoreConfig::default())
    }

    fn line(reservation: &str, item: &str, qty: u32) -> NewOrder {
        NewOrder {
            reservation_id: reservation.to_string(),
            menu_item_id: item.to_string(),
            quantity: qty,
        }
    }

    #[tokio::test]
    async fn test_add_checks_references() {
        let orders = store().orders();

        let ok = orders.add(line("r1", "m1", 2), now()).await.unwrap();
        assert_eq!(ok.status, OrderStatus::Entered);

        assert!(matches!(
            orders.add(line("r1", "m3", 1), now()).await.unwrap_err(),
            StoreError::Core(CoreError::MenuItemUnavailable(_))
        ));
        assert!(matches!(
            orders.add(line("h1", "m1", 1), now()).await.unwrap_err(),
            StoreError::Core(CoreError::WrongReservationKind { .. })
        ));
        assert!(matches!(
            orders.add(line("r9", "m1", 1), now()).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(orders.add(line("r1", "m1", 0), now()).await.is_err());
    }

    #[tokio::test]
    async fn test_batches_and_cancel() {
        let orders = store().orders();
        let a = orders.add(line("r1", "m1", 2), now()).await.unwrap();
        let b = orders.add(line("r1", "m1", 1), now()).await.unwrap();

        assert_eq!(orders.send_batch("r1").await.unwrap().len(), 2);
        // Nothing left to send.
        assert!(orders.send_batch("r1").await.unwrap().is_empty());

        let cancelled = orders.cancel(&b.id, Some("guest left".to_string())).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("guest left"));

        let served = orders.serve_batch("r1").await.unwrap();
        assert_eq!(served.len(), 1);
        assert_eq!(served[0].id, a.id);

        assert!(orders.cancel(&a.id, None).await.is_err());
    }

    #[tokio::test]
    async fn test_end_of_service_logs_aggregate() {
        let store = store();
        let orders = store.orders();
        orders.add(line("r1", "m1", 2), now()).await.unwrap();
        let dropped = orders.add(line("r1", "m1", 5), now()).await.unwrap();
        orders.cancel(&dropped.id, None).await.unwrap();

        let report = orders.end_of_service(now(), Some("admin".to_string())).await.unwrap();
        assert_eq!(report.total_sales, Money::from_units(20_000));

        let movements = store.stock().movements(None).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].product_id, AGGREGATE_PRODUCT_ID);
        assert_eq!(movements[0].kind, MovementKind::Consumption);
        assert_eq!(movements[0].quantity, 2.0);
    }
}
