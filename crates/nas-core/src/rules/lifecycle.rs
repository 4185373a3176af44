//! # Lifecycles
//!
//! Reservation state machine and order line lifecycle.
//!
//! ## Reservation
//! ```text
//!   pending ──► confirmed ──► checked_in ──► completed
//!      │            │
//!      ├────────────┴──► cancelled
//!      └────────────┴──► no_show
//! ```
//!
//! ## Order line
//! ```text
//!   entered ──► sent ──► served
//!      │          │
//!      └──────────┴──► cancelled (optional reason)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{MenuItem, Order, OrderStatus, Reservation, ReservationStatus};

// =============================================================================
// Reservation State Machine
// =============================================================================

/// Whether `from → to` is an edge of the reservation state machine.
pub fn can_transition(from: ReservationStatus, to: ReservationStatus) -> bool {
    use ReservationStatus::*;

    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Confirmed, CheckedIn)
            | (CheckedIn, Completed)
            | (Pending | Confirmed, Cancelled)
            | (Pending | Confirmed, NoShow)
    )
}

/// What happens to the reservation's table after a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEffect {
    Keep,
    /// Guests are seated.
    Occupy,
    /// Table back to free, back-reference cleared.
    Release,
}

/// An accepted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: ReservationStatus,
    pub to: ReservationStatus,
    pub table_effect: TableEffect,
}

impl StatusChange {
    /// Setting the current status again.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Validates a status change and tells the store what to do with the table.
pub fn plan_status_change(
    reservation: &Reservation,
    to: ReservationStatus,
) -> CoreResult<StatusChange> {
    let from = reservation.status;

    if from == to {
        return Ok(StatusChange {
            from,
            to,
            table_effect: TableEffect::Keep,
        });
    }

    if !can_transition(from, to) {
        return Err(CoreError::InvalidTransition {
            reservation_id: reservation.id.clone(),
            from,
            to,
        });
    }

    let table_effect = match to {
        ReservationStatus::CheckedIn => TableEffect::Occupy,
        ReservationStatus::Completed | ReservationStatus::Cancelled | ReservationStatus::NoShow => {
            TableEffect::Release
        }
        ReservationStatus::Pending | ReservationStatus::Confirmed => TableEffect::Keep,
    };

    Ok(StatusChange {
        from,
        to,
        table_effect,
    })
}

// =============================================================================
// Order Lifecycle
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Send,
    Serve,
    Cancel,
}

impl OrderAction {
    fn past_tense(&self) -> &'static str {
        match self {
            OrderAction::Send => "sent",
            OrderAction::Serve => "served",
            OrderAction::Cancel => "cancelled",
        }
    }
}

/// Status an order line moves to under `action`.
pub fn next_order_status(order: &Order, action: OrderAction) -> CoreResult<OrderStatus> {
    let next = match (order.status, action) {
        (OrderStatus::Entered, OrderAction::Send) => OrderStatus::Sent,
        (OrderStatus::Sent, OrderAction::Serve) => OrderStatus::Served,
        (OrderStatus::Entered | OrderStatus::Sent, OrderAction::Cancel) => OrderStatus::Cancelled,
        (current, action) => {
            return Err(CoreError::InvalidOrderState {
                order_id: order.id.clone(),
                current: current.to_string(),
                action: action.past_tense().to_string(),
            })
        }
    };
    Ok(next)
}

/// Refuses switched-off menu items.
pub fn check_orderable(item: &MenuItem) -> CoreResult<()> {
    if item.enabled {
        Ok(())
    } else {
        Err(CoreError::MenuItemUnavailable(item.name.clone()))
    }
}

// =============================================================================
// End of Service
// =============================================================================

/// Sales of one menu item over the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceLine {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub amount: Money,
}

/// End-of-service aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceReport {
    pub order_count: usize,
    pub items_sold: u32,
    pub total_sales: Money,
    pub lines: Vec<ServiceLine>,
}

/// Totals Σ quantity × menu price over the non-cancelled orders.
///
/// Orders whose menu item no longer exists count with a zero price.
pub fn end_of_service(orders: &[Order], menu: &[MenuItem]) -> ServiceReport {
    let mut by_item: BTreeMap<&str, ServiceLine> = BTreeMap::new();
    let mut order_count = 0;

    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        order_count += 1;
        let item = menu.iter().find(|m| m.id == order.menu_item_id);
        let price = item.map(|m| m.price).unwrap_or_default();

        let line = by_item
            .entry(order.menu_item_id.as_str())
            .or_insert_with(|| ServiceLine {
                menu_item_id: order.menu_item_id.clone(),
                name: item
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| order.menu_item_id.clone()),
                quantity: 0,
                amount: Money::zero(),
            });
        line.quantity += order.quantity;
        line.amount += price * i64::from(order.quantity);
    }

    let lines: Vec<ServiceLine> = by_item.into_values().collect();

    ServiceReport {
        order_count,
        items_sold: lines.iter().map(|l| l.quantity).sum(),
        total_sales: lines.iter().map(|l| l.amount).sum(),
        lines,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReservationKind;
    use chrono::NaiveDate;

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: "r1".to_string(),
            kind: ReservationKind::Dining,
            client_id: None,
            room_id: None,
            table_id: Some("t3".to_string()),
            start: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            end: None,
            time_slot: None,
            party_size: Some(3),
            status,
            grace_period_minutes: 15,
            notes: None,
        }
    }

    fn order(id: &str, item: &str, qty: u32, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            reservation_id: "r1".to_string(),
            menu_item_id: item.to_string(),
            quantity: qty,
            status,
            cancellation_reason: None,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(12, 15, 0)
                .unwrap(),
        }
    }

    fn menu_item(id: &str, name: &str, price: i64, enabled: bool) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            category_id: "mains".to_string(),
            name: name.to_string(),
            price: Money::from_units(price),
            photo_url: None,
            enabled,
            variants: vec![],
        }
    }

    #[test]
    fn test_valid_transitions() {
        use ReservationStatus::*;
        let valid = [
            (Pending, Confirmed),
            (Confirmed, CheckedIn),
            (CheckedIn, Completed),
            (Pending, Cancelled),
            (Confirmed, Cancelled),
            (Pending, NoShow),
            (Confirmed, NoShow),
        ];
        for (from, to) in valid {
            assert!(can_transition(from, to), "{} -> {}", from, to);
        }
    }

    #[test]
    fn test_invalid_transitions() {
        use ReservationStatus::*;
        let invalid = [
            (Completed, Pending),
            (Cancelled, Confirmed),
            (NoShow, CheckedIn),
            (CheckedIn, Cancelled),
            (Pending, CheckedIn),
            (Pending, Completed),
        ];
        for (from, to) in invalid {
            assert!(!can_transition(from, to), "{} -> {}", from, to);
            let err = plan_status_change(&reservation(from), to).unwrap_err();
            assert!(matches!(err, CoreError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_table_effects() {
        let seat = plan_status_change(
            &reservation(ReservationStatus::Confirmed),
            ReservationStatus::CheckedIn,
        )
        .unwrap();
        assert_eq!(seat.table_effect, TableEffect::Occupy);

        let done = plan_status_change(
            &reservation(ReservationStatus::CheckedIn),
            ReservationStatus::Completed,
        )
        .unwrap();
        assert_eq!(done.table_effect, TableEffect::Release);

        let confirm = plan_status_change(
            &reservation(ReservationStatus::Pending),
            ReservationStatus::Confirmed,
        )
        .unwrap();
        assert_eq!(confirm.table_effect, TableEffect::Keep);
    }

    #[test]
    fn test_same_status_is_noop() {
        let change = plan_status_change(
            &reservation(ReservationStatus::Completed),
            ReservationStatus::Completed,
        )
        .unwrap();
        assert!(change.is_noop());
        assert_eq!(change.table_effect, TableEffect::Keep);
    }

    #[test]
    fn test_order_lifecycle() {
        let entered = order("o1", "m1", 2, OrderStatus::Entered);
        assert_eq!(next_order_status(&entered, OrderAction::Send).unwrap(), OrderStatus::Sent);
        assert_eq!(
            next_order_status(&entered, OrderAction::Cancel).unwrap(),
            OrderStatus::Cancelled
        );
        assert!(next_order_status(&entered, OrderAction::Serve).is_err());

        let sent = order("o1", "m1", 2, OrderStatus::Sent);
        assert_eq!(next_order_status(&sent, OrderAction::Serve).unwrap(), OrderStatus::Served);

        let served = order("o2", "m2", 1, OrderStatus::Served);
        let err = next_order_status(&served, OrderAction::Cancel).unwrap_err();
        assert_eq!(err.to_string(), "Order o2 is served, cannot be cancelled");
    }

    #[test]
    fn test_check_orderable() {
        assert!(check_orderable(&menu_item("m1", "Ravitoto", 10_000, true)).is_ok());
        assert!(matches!(
            check_orderable(&menu_item("m3", "Poulet coco", 14_000, false)),
            Err(CoreError::MenuItemUnavailable(name)) if name == "Poulet coco"
        ));
    }

    #[test]
    fn test_end_of_service() {
        let menu = vec![
            menu_item("m1", "Ravitoto", 10_000, true),
            menu_item("m2", "Romazava", 12_000, true),
        ];
        let orders = vec![
            order("o1", "m1", 2, OrderStatus::Sent),
            order("o2", "m2", 1, OrderStatus::Served),
            order("o3", "m1", 1, OrderStatus::Served),
            order("o4", "m2", 5, OrderStatus::Cancelled),
        ];
        let report = end_of_service(&orders, &menu);
        assert_eq!(report.order_count, 3);
        assert_eq!(report.items_sold, 4);
        assert_eq!(report.total_sales, Money::from_units(42_000));
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.lines[0].amount, Money::from_units(30_000));

        let empty = end_of_service(&[], &menu);
        assert!(empty.total_sales.is_zero());
    }
}
