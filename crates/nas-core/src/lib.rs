//! # nas-core: Pure Business Logic for the NAS Connect Back-Office
//!
//! This crate holds the rules of the hotel / restaurant back-office as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     NAS Connect Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Back-office CLI (apps/backoffice)               │   │
//! │  │   dashboard ──► reservations ──► orders ──► stock ──► invoices │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ async calls                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             nas-store (store + access layer + cache)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ nas-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   rules   │  │  export   │  │   │
//! │  │   │   Room    │  │   Money   │  │ conflicts │  │  CSV      │  │   │
//! │  │   │   Table   │  │  (MGA)    │  │ stock     │  │  HTML     │  │   │
//! │  │   │  Invoice  │  │           │  │ no-show   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO STORE • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Room, Table, Reservation, Invoice, ...)
//! - [`money`] - Integer ariary amounts
//! - [`error`] - Domain error types
//! - [`validation`] - Form input checks
//! - [`rules`] - Conflicts, stock levels, invoices, no-shows, lifecycles,
//!   navigation and occupancy
//! - [`export`] - CSV and printable HTML rendering
//!
//! ## Example Usage
//!
//! ```rust
//! use nas_core::rules::stock::{classify, StockLevel};
//!
//! assert_eq!(classify(0.0, 10.0), StockLevel::Out);
//! assert_eq!(classify(4.0, 10.0), StockLevel::Low);
//! assert_eq!(classify(12.0, 10.0), StockLevel::Ok);
//! ```

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a fieldless enum.
///
/// The names must match the serde representation of the enum.
macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Stable snake_case name (same as the serde representation).
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().replace('-', "_").as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err($crate::error::ValidationError::NotAllowed {
                        field: stringify!($ty).to_string(),
                        allowed: vec![$($name.to_string()),+],
                    }),
                }
            }
        }
    };
}

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod money;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Grace period given to dining reservations when none is specified.
pub const DEFAULT_GRACE_MINUTES: u32 = 15;

/// Upper bound for a configurable grace period (four hours).
pub const MAX_GRACE_MINUTES: u32 = 240;

/// Length of a lodging stay created without an end date.
pub const DEFAULT_STAY_DAYS: i64 = 1;

/// Largest party accepted for a single dining reservation.
pub const MAX_PARTY_SIZE: u32 = 50;

/// Largest quantity on a single order line.
///
/// ## Business Reason
/// Catches typing 100 instead of 10 at the pass.
pub const MAX_ORDER_QUANTITY: u32 = 99;

/// Product id used for the aggregate movement logged at end of service.
pub const AGGREGATE_PRODUCT_ID: &str = "_aggregate";
