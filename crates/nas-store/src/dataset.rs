//! # Data Set
//!
//! Every collection of the session, held together behind one lock.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Arc<RwLock<Dataset>>                                                   │
//! │  ├── clients          ├── menu_items        ├── invoices                │
//! │  ├── rooms            ├── orders            └── events                  │
//! │  ├── tables           ├── stock_items                                   │
//! │  └── reservations     └── stock_movements                               │
//! │                                                                         │
//! │  One write guard covers a whole operation, so a table and its          │
//! │  reservation always change together.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use nas_core::{
    Client, Event, Invoice, MenuItem, Order, Reservation, Room, StockItem, StockMovement, Table,
};

/// All in-memory collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub clients: Vec<Client>,
    pub rooms: Vec<Room>,
    pub tables: Vec<Table>,
    pub reservations: Vec<Reservation>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    pub stock_items: Vec<StockItem>,
    pub stock_movements: Vec<StockMovement>,
    pub invoices: Vec<Invoice>,
    pub events: Vec<Event>,
}

impl Dataset {
    /// Record counts per collection, for the `info` log at startup.
    pub fn counts(&self) -> [(&'static str, usize); 10] {
        [
            ("clients", self.clients.len()),
            ("rooms", self.rooms.len()),
            ("tables", self.tables.len()),
            ("reservations", self.reservations.len()),
            ("menu_items", self.menu_items.len()),
            ("orders", self.orders.len()),
            ("stock_items", self.stock_items.len()),
            ("stock_movements", self.stock_movements.len()),
            ("invoices", self.invoices.len()),
            ("events", self.events.len()),
        ]
    }
}
