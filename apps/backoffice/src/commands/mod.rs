//! # Commands Module
//!
//! One module per back-office screen. Each command checks that the
//! session's role displays the screen, then calls the access layer.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (routes, exports)
//! ├── dashboard.rs    ◄─── Daily figures
//! ├── navigation.rs   ◄─── Role menu, role switch
//! ├── clients.rs      ◄─── Client records
//! ├── rooms.rs        ◄─── Lodging board, calendar, occupancy
//! ├── reservations.rs ◄─── Dining bookings, stays, status machine
//! ├── tables.rs       ◄─── Floor plan
//! ├── orders.rs       ◄─── Order lines, end of service
//! ├── menu.rs         ◄─── Menu items
//! ├── stock.rs        ◄─── Stock, alerts, movements
//! ├── invoices.rs     ◄─── Finance
//! ├── events.rs       ◄─── Restaurant events
//! ├── export.rs       ◄─── CSV / printable HTML
//! └── config.rs       ◄─── Configuration
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  nas-backoffice dining assign r3 t9                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  cli::execute ──► reservations::assign_table(&state, "r3", "t9")        │
//! │                          │                                              │
//! │                          ├── session.require("/restaurant/floor")       │
//! │                          └── api.assign_table("r3", "t9")               │
//! │         │                                                               │
//! │         ▼ (JSON serialization)                                          │
//! │  stdout: { "id": "r3", "tableId": "t9", ... }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod clients;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod export;
pub mod invoices;
pub mod menu;
pub mod navigation;
pub mod orders;
pub mod reservations;
pub mod rooms;
pub mod stock;
pub mod tables;

/// Screen routes guarded by the commands.
pub mod routes {
    pub const DASHBOARD: &str = "/dashboard";
    pub const LODGING: &str = "/lodging/management";
    pub const CLIENTS: &str = "/lodging/clients";
    pub const LODGING_STOCK: &str = "/lodging/stock";
    pub const FLOOR: &str = "/restaurant/floor";
    pub const MENU: &str = "/restaurant/menu";
    pub const RESTAURANT_STOCK: &str = "/restaurant/stock";
    pub const EVENTS: &str = "/restaurant/events";
    pub const FINANCE: &str = "/finance";
    pub const SETTINGS: &str = "/settings";
}
