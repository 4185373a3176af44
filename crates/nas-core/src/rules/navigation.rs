//! # Role-Based Navigation
//!
//! Static table of the sections each role sees in the back-office menu.
//!
//! ## Display Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The role is a session switch, not an identity. This module decides    │
//! │  what is SHOWN; nothing in the store checks it.                         │
//! │                                                                         │
//! │  role ──► menu_for(role) ──► sections rendered                          │
//! │  role ──► can_view(role, route) ──► screen opened or "not available"    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Table
//! ```text
//! role          lodging  restaurant     finance  administration
//! ────────────  ───────  ─────────────  ───────  ──────────────
//! admin            ✓     ✓              ✓        ✓
//! reception        ✓     floor plan     ✓
//! head_waiter            ✓
//! waiter                 ✓
//! kitchen                ✓
//! bar                    ✓
//! counter                ✓              ✓
//! storekeeper      ✓
//! accountant                            ✓
//! management       ✓     ✓              ✓
//! ```
//! The dashboard is visible to every role.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Session role of the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    #[default]
    Admin,
    Reception,
    HeadWaiter,
    Waiter,
    Kitchen,
    Bar,
    Counter,
    Storekeeper,
    Accountant,
    Management,
}

string_enum!(Role {
    Admin => "admin",
    Reception => "reception",
    HeadWaiter => "head_waiter",
    Waiter => "waiter",
    Kitchen => "kitchen",
    Bar => "bar",
    Counter => "counter",
    Storekeeper => "storekeeper",
    Accountant => "accountant",
    Management => "management",
});

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub route: &'static str,
}

/// A titled group of menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: &'static str,
    pub items: &'static [NavItem],
}

// =============================================================================
// Sections
// =============================================================================

pub const DASHBOARD_ROUTE: &str = "/dashboard";

pub const DASHBOARD: NavSection = NavSection {
    title: "Dashboard",
    items: &[NavItem {
        label: "Dashboard",
        route: DASHBOARD_ROUTE,
    }],
};

pub const LODGING: NavSection = NavSection {
    title: "Lodging",
    items: &[
        NavItem { label: "Rooms & stays", route: "/lodging/management" },
        NavItem { label: "Clients", route: "/lodging/clients" },
        NavItem { label: "Stock", route: "/lodging/stock" },
        NavItem { label: "Rates", route: "/lodging/rates" },
    ],
};

pub const RESTAURANT: NavSection = NavSection {
    title: "Restaurant",
    items: &[
        NavItem { label: "Floor plan", route: "/restaurant/floor" },
        NavItem { label: "Menu", route: "/restaurant/menu" },
        NavItem { label: "Stock", route: "/restaurant/stock" },
        NavItem { label: "Events", route: "/restaurant/events" },
    ],
};

/// Reception only places guests: floor plan, nothing else.
pub const RESTAURANT_FLOOR_ONLY: NavSection = NavSection {
    title: "Restaurant",
    items: &[NavItem { label: "Floor plan", route: "/restaurant/floor" }],
};

pub const FINANCE: NavSection = NavSection {
    title: "Finance",
    items: &[NavItem { label: "Invoices", route: "/finance" }],
};

pub const ADMINISTRATION: NavSection = NavSection {
    title: "Administration",
    items: &[
        NavItem { label: "Users", route: "/admin" },
        NavItem { label: "Settings", route: "/settings" },
    ],
};

/// Sections granted to a role, dashboard excluded.
fn granted(role: Role) -> &'static [NavSection] {
    match role {
        Role::Admin => &[LODGING, RESTAURANT, FINANCE, ADMINISTRATION],
        Role::Reception => &[LODGING, RESTAURANT_FLOOR_ONLY, FINANCE],
        Role::HeadWaiter | Role::Waiter | Role::Kitchen | Role::Bar => &[RESTAURANT],
        Role::Counter => &[RESTAURANT, FINANCE],
        Role::Storekeeper => &[LODGING],
        Role::Accountant => &[FINANCE],
        Role::Management => &[LODGING, RESTAURANT, FINANCE],
    }
}

/// Menu of a role: the dashboard first, then the granted sections.
pub fn menu_for(role: Role) -> Vec<NavSection> {
    std::iter::once(DASHBOARD)
        .chain(granted(role).iter().copied())
        .collect()
}

/// Route guard: may `role` display `route`?
///
/// A route matches an entry exactly or as a sub-path (`/finance/NAS-2025-0001`
/// falls under `/finance`).
pub fn can_view(role: Role, route: &str) -> bool {
    let route = route.trim_end_matches('/');

    menu_for(role)
        .iter()
        .flat_map(|section| section.items.iter())
        .any(|item| {
            route == item.route
                || route
                    .strip_prefix(item.route)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
}
