//! # Reservation Commands
//!
//! Dining bookings on the floor plan and lodging stays on the board. Both
//! share one status machine; the screen that may change a reservation
//! follows its kind.
//!
//! ## Status Machine
//! ```text
//!   pending ──► confirmed ──► checked_in ──► completed
//!      │            │
//!      ├────────────┴──► cancelled
//!      └────────────┴──► no_show  (dining: only past slot + grace, no table)
//! ```

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use nas_core::{Reservation, ReservationKind, ReservationStatus, TimeSlot};
use nas_store::{NewDiningReservation, NewStay};

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// Screen owning reservations of `kind`.
fn route_for(kind: ReservationKind) -> &'static str {
    match kind {
        ReservationKind::Lodging => routes::LODGING,
        ReservationKind::Dining => routes::FLOOR,
        ReservationKind::Event => routes::EVENTS,
    }
}

/// Loads a reservation and checks the session may act on it.
async fn guarded(state: &AppState, reservation_id: &str) -> Result<Reservation, ApiError> {
    let reservation = state.api.fetch::<Reservation>(reservation_id).await?;
    state.session.require(route_for(reservation.kind))?;
    Ok(reservation)
}

// =============================================================================
// Dining
// =============================================================================

/// A table booking as entered on the floor screen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTableRequest {
    pub client_id: Option<String>,
    pub table_id: Option<String>,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    /// `HH:MM`.
    pub time: String,
    pub party_size: u32,
    pub grace_minutes: Option<u32>,
    pub notes: Option<String>,
}

/// Dining reservations of `day`, by slot.
pub async fn list_dining(
    state: &AppState,
    day: Option<NaiveDate>,
) -> Result<Vec<Reservation>, ApiError> {
    state.session.require(routes::FLOOR)?;
    let day = day.unwrap_or_else(|| state.api.today());
    debug!(%day, "list_dining command");
    Ok(state.api.dining_on(day).await?)
}

/// Books a table, optionally placing it at once.
pub async fn book_table(
    state: &AppState,
    request: BookTableRequest,
) -> Result<Reservation, ApiError> {
    debug!(time = %request.time, table = ?request.table_id, "book_table command");
    state.session.require(routes::FLOOR)?;

    let time_slot = TimeSlot::parse(&request.time)?;
    let reservation = state
        .api
        .create_dining(NewDiningReservation {
            client_id: request.client_id,
            table_id: request.table_id,
            date: request.date.unwrap_or_else(|| state.api.today()),
            time_slot,
            party_size: request.party_size,
            grace_period_minutes: request.grace_minutes,
            notes: request.notes,
        })
        .await?;

    info!(reservation_id = %reservation.id, "Table booked");
    Ok(reservation)
}

/// Places a dining reservation on a table.
pub async fn assign_table(
    state: &AppState,
    reservation_id: &str,
    table_id: &str,
) -> Result<Reservation, ApiError> {
    debug!(reservation_id, table_id, "assign_table command");
    state.session.require(routes::FLOOR)?;
    Ok(state.api.assign_table(reservation_id, table_id).await?)
}

/// Reservations that may be declared no-show right now.
pub async fn no_show_candidates(state: &AppState) -> Result<Vec<Reservation>, ApiError> {
    state.session.require(routes::FLOOR)?;
    Ok(state.api.no_show_candidates().await?)
}

pub async fn mark_no_show(state: &AppState, reservation_id: &str) -> Result<Reservation, ApiError> {
    state.session.require(routes::FLOOR)?;
    let reservation = state.api.mark_no_show(reservation_id).await?;
    info!(reservation_id, "Reservation marked no-show");
    Ok(reservation)
}

// =============================================================================
// Lodging
// =============================================================================

/// A stay as entered at the desk. Arrival and departure use the
/// configured check-in and check-out hours.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStayRequest {
    pub client_id: Option<String>,
    pub room_id: String,
    pub arrival: NaiveDate,
    /// One night when absent.
    pub departure: Option<NaiveDate>,
    pub confirmed: bool,
    pub notes: Option<String>,
}

pub async fn list_stays(state: &AppState) -> Result<Vec<Reservation>, ApiError> {
    state.session.require(routes::LODGING)?;
    Ok(state.api.reservations(ReservationKind::Lodging).await?)
}

/// Books a room.
pub async fn book_stay(
    state: &AppState,
    request: BookStayRequest,
) -> Result<Reservation, ApiError> {
    debug!(room_id = %request.room_id, arrival = %request.arrival, "book_stay command");
    state.session.require(routes::LODGING)?;

    let settings = &state.config.settings;
    let reservation = state
        .api
        .create_stay(NewStay {
            client_id: request.client_id,
            room_id: request.room_id,
            start: request.arrival.and_time(settings.check_in_hour.time()),
            end: request
                .departure
                .map(|d| d.and_time(settings.check_out_hour.time())),
            status: request.confirmed.then_some(ReservationStatus::Confirmed),
            notes: request.notes,
        })
        .await?;

    info!(reservation_id = %reservation.id, "Stay booked");
    Ok(reservation)
}

/// Moves a stay to new dates, and to another room when `room_id` is set.
pub async fn reschedule_stay(
    state: &AppState,
    reservation_id: &str,
    room_id: Option<String>,
    arrival: NaiveDate,
    departure: Option<NaiveDate>,
) -> Result<Reservation, ApiError> {
    state.session.require(routes::LODGING)?;

    let settings = &state.config.settings;
    let start = arrival.and_time(settings.check_in_hour.time());
    let end = departure.map(|d| d.and_time(settings.check_out_hour.time()));
    Ok(state.api.reschedule_stay(reservation_id, room_id, start, end).await?)
}

// =============================================================================
// Shared
// =============================================================================

/// Editable fields of any reservation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPatch {
    pub client_id: Option<String>,
    pub party_size: Option<u32>,
    pub notes: Option<String>,
}

/// Moves a reservation through the status machine.
pub async fn set_status(
    state: &AppState,
    reservation_id: &str,
    status: ReservationStatus,
) -> Result<Reservation, ApiError> {
    debug!(reservation_id, %status, "set_status command");
    guarded(state, reservation_id).await?;

    if status == ReservationStatus::NoShow {
        return mark_no_show(state, reservation_id).await;
    }
    Ok(state.api.set_reservation_status(reservation_id, status).await?)
}

/// Applies the fields set in `patch`.
pub async fn update(
    state: &AppState,
    reservation_id: &str,
    patch: ReservationPatch,
) -> Result<Reservation, ApiError> {
    let mut reservation = guarded(state, reservation_id).await?;

    if patch.client_id.is_some() {
        reservation.client_id = patch.client_id;
    }
    if patch.party_size.is_some() {
        reservation.party_size = patch.party_size;
    }
    if patch.notes.is_some() {
        reservation.notes = patch.notes;
    }
    Ok(state.api.update_reservation(reservation).await?)
}

pub async fn delete(state: &AppState, reservation_id: &str) -> Result<(), ApiError> {
    guarded(state, reservation_id).await?;
    state.api.delete_reservation(reservation_id).await?;
    info!(reservation_id, "Reservation deleted");
    Ok(())
}
