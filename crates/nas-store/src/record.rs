//! # Records
//!
//! Binds each domain type to its collection in the [`Dataset`], so a single
//! generic repository can serve every entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use nas_core::validation::{
    validate_client_name, validate_email, validate_label, validate_phone, validate_price,
    validate_stock_amount,
};
use nas_core::{
    Client, CoreResult, Event, Invoice, MenuItem, Order, Reservation, Room, StockItem,
    StockMovement, Table,
};

use crate::dataset::Dataset;

/// Entity kinds, used to scope cache invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Room,
    Table,
    Reservation,
    MenuItem,
    Order,
    StockItem,
    StockMovement,
    Invoice,
    Event,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Client => "Client",
            EntityKind::Room => "Room",
            EntityKind::Table => "Table",
            EntityKind::Reservation => "Reservation",
            EntityKind::MenuItem => "Menu item",
            EntityKind::Order => "Order",
            EntityKind::StockItem => "Stock item",
            EntityKind::StockMovement => "Stock movement",
            EntityKind::Invoice => "Invoice",
            EntityKind::Event => "Event",
        };
        f.write_str(name)
    }
}

/// A domain type stored in the data set.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn collection(data: &Dataset) -> &Vec<Self>;

    fn collection_mut(data: &mut Dataset) -> &mut Vec<Self>;

    /// Field checks run before insert and update.
    fn validate(&self) -> CoreResult<()> {
        Ok(())
    }
}

/// Records the operator edits directly (create / update / delete as-is).
///
/// Reservations, orders, invoices and movements are not `Editable`: they
/// change only through the operations that enforce their rules.
pub trait Editable: Record {}

macro_rules! record {
    ($ty:ty, $kind:ident, $field:ident) => {
        record!($ty, $kind, $field, |_r| Ok(()));
    };
    ($ty:ty, $kind:ident, $field:ident, |$r:ident| $validate:expr) => {
        impl Record for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn collection(data: &Dataset) -> &Vec<Self> {
                &data.$field
            }

            fn collection_mut(data: &mut Dataset) -> &mut Vec<Self> {
                &mut data.$field
            }

            fn validate(&self) -> CoreResult<()> {
                let $r = self;
                $validate
            }
        }
    };
}

record!(Client, Client, clients, |c| {
    validate_client_name(&c.name)?;
    validate_phone(&c.phone)?;
    validate_email(c.email.as_deref())?;
    Ok(())
});

record!(Room, Room, rooms, |r| {
    validate_label("room number", &r.number)?;
    validate_price(r.base_rate.units())?;
    Ok(())
});

record!(Table, Table, tables, |t| {
    validate_label("table number", &t.number)?;
    Ok(())
});

record!(MenuItem, MenuItem, menu_items, |m| {
    validate_label("name", &m.name)?;
    validate_price(m.price.units())?;
    Ok(())
});

record!(StockItem, StockItem, stock_items, |s| {
    validate_label("name", &s.name)?;
    validate_stock_amount("quantity", s.quantity)?;
    validate_stock_amount("minimum threshold", s.min_threshold)?;
    Ok(())
});

record!(Event, Event, events, |e| {
    validate_label("name", &e.name)?;
    validate_label("contact", &e.contact)?;
    Ok(())
});

record!(Reservation, Reservation, reservations);
record!(Order, Order, orders);
record!(StockMovement, StockMovement, stock_movements);
record!(Invoice, Invoice, invoices);

impl Editable for Client {}
impl Editable for Room {}
impl Editable for Table {}
impl Editable for MenuItem {}
impl Editable for StockItem {}
impl Editable for Event {}
