//! # Room Commands
//!
//! The lodging board: derived room status over a period, the stay calendar
//! and the occupancy rate.
//!
//! ## Calendar
//! ```text
//!            Mon 10   Tue 11   Wed 12   Thu 13
//! CH-1       h2       h2       .        .
//! CH-2       .        h1       h1       .
//! CH-3       (maintenance)
//! ```

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use nas_core::rules::occupancy::stay_on_day;
use nas_core::validation::validate_label;
use nas_core::{ReservationKind, Room, RoomStatus};
use nas_store::access::RoomBoardEntry;

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// Longest calendar window.
pub const MAX_CALENDAR_DAYS: u32 = 31;

/// One calendar line: the stay holding the room each day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRow {
    pub room_id: String,
    pub room_number: String,
    pub in_maintenance: bool,
    /// Reservation id per day, `None` when free.
    pub cells: Vec<Option<String>>,
}

/// Stay calendar from `from`, `days` days long.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub days: Vec<NaiveDate>,
    pub rows: Vec<CalendarRow>,
}

/// Occupancy of one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyView {
    pub day: NaiveDate,
    pub rate: f64,
}

/// Rooms with their status over `[from, to]`.
pub async fn room_board(
    state: &AppState,
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> Result<Vec<RoomBoardEntry>, ApiError> {
    debug!(%from, "room_board command");
    state.session.require(routes::LODGING)?;

    let to = to.unwrap_or(from);
    if to < from {
        return Err(ApiError::validation("End of period must not be before its start"));
    }
    Ok(state.api.room_board(from, to).await?)
}

/// Stay calendar.
pub async fn room_calendar(
    state: &AppState,
    from: NaiveDate,
    days: u32,
) -> Result<CalendarView, ApiError> {
    debug!(%from, days, "room_calendar command");
    state.session.require(routes::LODGING)?;

    if days == 0 || days > MAX_CALENDAR_DAYS {
        return Err(ApiError::validation(format!(
            "Calendar length must be between 1 and {} days",
            MAX_CALENDAR_DAYS
        )));
    }

    let rooms = state.api.fetch_all::<Room>().await?;
    let stays = state.api.reservations(ReservationKind::Lodging).await?;
    let days: Vec<NaiveDate> = (0..i64::from(days)).map(|d| from + Duration::days(d)).collect();

    let rows = rooms
        .iter()
        .map(|room| CalendarRow {
            room_id: room.id.clone(),
            room_number: room.number.clone(),
            in_maintenance: room.status == RoomStatus::Maintenance,
            cells: days
                .iter()
                .map(|day| stay_on_day(&stays, &room.id, *day).map(|r| r.id.clone()))
                .collect(),
        })
        .collect();

    Ok(CalendarView { days, rows })
}

/// Occupancy percentage of `day`.
pub async fn occupancy(state: &AppState, day: NaiveDate) -> Result<OccupancyView, ApiError> {
    state.session.require(routes::LODGING)?;
    let rate = state.api.occupancy(day).await?;
    Ok(OccupancyView { day, rate })
}

/// Adds a room to the inventory.
pub async fn add_room(state: &AppState, room: Room) -> Result<Room, ApiError> {
    state.session.require(routes::LODGING)?;
    validate_label("room number", &room.number)?;
    Ok(state.api.create(room).await?)
}

/// Puts a room in or out of maintenance.
pub async fn set_room_status(
    state: &AppState,
    room_id: &str,
    status: RoomStatus,
) -> Result<Room, ApiError> {
    state.session.require(routes::LODGING)?;
    let mut room = state.api.fetch::<Room>(room_id).await?;
    room.status = status;
    Ok(state.api.update(room).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{state, today};
    use nas_core::rules::occupancy::DerivedRoomStatus;
    use nas_core::rules::navigation::Role;

    #[tokio::test]
    async fn test_board_over_a_week() {
        let state = state(Role::Reception);
        let board = room_board(&state, today(), Some(today() + Duration::days(6))).await.unwrap();

        let status = |id: &str| board.iter().find(|e| e.room.id == id).unwrap().status;
        // h1 arrives tomorrow on CH-2, h3 in five days on CH-4.
        assert_eq!(status("ch2"), DerivedRoomStatus::Reserved);
        assert_eq!(status("ch3"), DerivedRoomStatus::Maintenance);
        assert_eq!(status("ch4"), DerivedRoomStatus::Reserved);
        assert_eq!(status("ch1"), DerivedRoomStatus::Free);
    }

    #[tokio::test]
    async fn test_calendar_cells() {
        let state = state(Role::Admin);
        let view = room_calendar(&state, today(), 4).await.unwrap();
        assert_eq!(view.days.len(), 4);

        let ch1 = view.rows.iter().find(|r| r.room_id == "ch1").unwrap();
        // h2 runs from two days ago to tomorrow 11:00.
        assert_eq!(ch1.cells[0].as_deref(), Some("h2"));
        assert_eq!(ch1.cells[2], None);

        let ch2 = view.rows.iter().find(|r| r.room_id == "ch2").unwrap();
        assert_eq!(ch2.cells[1].as_deref(), Some("h1"));
        assert!(view.rows.iter().find(|r| r.room_id == "ch3").unwrap().in_maintenance);

        assert!(room_calendar(&state, today(), 0).await.is_err());
    }

    #[tokio::test]
    async fn test_occupancy_today() {
        let view = occupancy(&state(Role::Management), today()).await.unwrap();
        // ch1 of three bookable rooms.
        assert!((view.rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_maintenance_toggle() {
        let state = state(Role::Admin);
        let room = set_room_status(&state, "ch3", RoomStatus::Free).await.unwrap();
        assert_eq!(room.status, RoomStatus::Free);

        let board = room_board(&state, today(), None).await.unwrap();
        assert!(board.iter().all(|e| e.status != DerivedRoomStatus::Maintenance));
    }
}
