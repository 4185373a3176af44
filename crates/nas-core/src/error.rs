//! # Error Types
//!
//! Domain-specific error types for nas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nas-core errors (this file)                                           │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  nas-store errors (separate crate)                                     │
//! │  └── StoreError       - Lookup / store operation failures              │
//! │                                                                         │
//! │  Back-office errors (in app)                                           │
//! │  └── ApiError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Screen    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (table, slot, status, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::ReservationStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are raised by the
/// pure rule functions and surfaced unchanged by the store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Another reservation already holds the table for the same time slot.
    ///
    /// ## User Workflow
    /// ```text
    /// Assign reservation r5 (19:00) to T4
    ///      │
    ///      ▼
    /// T4 already holds r3 at 19:00
    ///      │
    ///      ▼
    /// TableSlotConflict { table: "t4", slot: "19:00", holder: "r3" }
    ///      │
    ///      ▼
    /// Screen shows: "Table t4 is already taken at 19:00 by r3"
    /// ```
    #[error("Table {table_id} is already taken at {slot} by reservation {holder_id}")]
    TableSlotConflict {
        table_id: String,
        slot: String,
        holder_id: String,
    },

    /// A stay overlaps another active stay on the same room.
    #[error("Room {room_id} is not available: overlaps reservation {holder_id}")]
    RoomUnavailable { room_id: String, holder_id: String },

    /// The room is in maintenance and cannot be booked.
    #[error("Room {0} is in maintenance")]
    RoomInMaintenance(String),

    /// The reservation status change is not allowed.
    #[error("Reservation {reservation_id} cannot go from {from} to {to}")]
    InvalidTransition {
        reservation_id: String,
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// The order line status change is not allowed.
    #[error("Order {order_id} is {current}, cannot be {action}")]
    InvalidOrderState {
        order_id: String,
        current: String,
        action: String,
    },

    /// The operation needs a reservation of another kind.
    #[error("Reservation {reservation_id} is a {actual} reservation, expected {expected}")]
    WrongReservationKind {
        reservation_id: String,
        expected: String,
        actual: String,
    },

    /// Consumption would take the stock below zero.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: f64,
        requested: f64,
    },

    /// The menu item is switched off.
    #[error("Menu item {0} is not available")]
    MenuItemUnavailable(String),

    /// The reservation cannot be marked as no-show yet.
    #[error("Reservation {0} is not eligible for no-show")]
    NotEligibleForNoShow(String),

    /// Export was requested on an empty data set.
    #[error("Nothing to export")]
    NothingToExport,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid time slot, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
