//! # Conflict Rules
//!
//! Two different notions of "already taken" live here on purpose:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DINING TABLES                     LODGING ROOMS                        │
//! │  ─────────────                     ─────────────                        │
//! │  Exact slot equality               Half-open interval overlap           │
//! │                                                                         │
//! │  T4 @ 19:00  vs  T4 @ 19:00  ✗     [1st, 3rd) vs [2nd, 4th)   ✗        │
//! │  T4 @ 19:00  vs  T4 @ 19:30  ✓     [1st, 3rd) vs [3rd, 5th)   ✓        │
//! │                                                                         │
//! │  Dining slots have a fixed length, so the declared HH:MM is the key.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Reservation, ReservationKind, Room, RoomStatus};
use crate::DEFAULT_STAY_DAYS;

// =============================================================================
// Dining: Table Slots
// =============================================================================

/// Finds the active reservation, other than `reservation`, that already
/// holds `table_id` at the same time slot.
///
/// A reservation without a declared slot never collides: slots are
/// compared for equality, and "no slot" is not a slot. Dining bookings are
/// kept from reaching a table without one by [`check_table_assignment`].
pub fn find_slot_conflict<'a, I>(
    reservations: I,
    table_id: &str,
    reservation: &Reservation,
) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    let slot = reservation.time_slot.as_ref()?;

    reservations.into_iter().find(|other| {
        other.id != reservation.id
            && other.status.is_active()
            && other.table_id.as_deref() == Some(table_id)
            && other.time_slot.as_ref() == Some(slot)
    })
}

/// Checks that `reservation` can be placed on `table_id`.
///
/// ## User Workflow
/// ```text
/// Head waiter drags r5 (19:00) onto T4
///      │
///      ▼
/// check_table_assignment ← THIS FUNCTION
///      │
///      ├── r5 has no slot (dining) → Validation(Required "time slot")
///      ├── r3 already on T4 at 19:00 → TableSlotConflict
///      └── free → store writes table + reservation together
/// ```
pub fn check_table_assignment(
    reservations: &[Reservation],
    table_id: &str,
    reservation: &Reservation,
) -> CoreResult<()> {
    if reservation.kind == ReservationKind::Dining && reservation.time_slot.is_none() {
        return Err(ValidationError::required("time slot").into());
    }

    match find_slot_conflict(reservations, table_id, reservation) {
        Some(holder) => Err(CoreError::TableSlotConflict {
            table_id: table_id.to_string(),
            slot: holder
                .time_slot
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            holder_id: holder.id.clone(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Lodging: Stay Intervals
// =============================================================================

/// `[a_start, a_end)` and `[b_start, b_end)` overlap.
///
/// Adjacent intervals (`a_end == b_start`) do not overlap.
#[inline]
pub fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Effective end of a stay: its end date, or start + one day.
pub fn stay_end(start: NaiveDateTime, end: Option<NaiveDateTime>) -> NaiveDateTime {
    end.unwrap_or(start + Duration::days(DEFAULT_STAY_DAYS))
}

/// Start and effective end of a reservation.
pub fn stay_bounds(reservation: &Reservation) -> (NaiveDateTime, NaiveDateTime) {
    (
        reservation.start,
        stay_end(reservation.start, reservation.end),
    )
}

/// Whether the stay covers any part of `day`.
///
/// Used by the room calendar to fill a day cell.
pub fn stay_covers_day(reservation: &Reservation, day: NaiveDate) -> bool {
    let (start, end) = stay_bounds(reservation);
    let day_start = day.and_time(chrono::NaiveTime::MIN);
    intervals_overlap(start, end, day_start, day_start + Duration::days(1))
}

/// Finds an active lodging stay on `room_id` overlapping `[start, end)`,
/// ignoring the reservation being edited (`exclude_id`).
pub fn find_room_conflict<'a, I>(
    reservations: I,
    room_id: &str,
    exclude_id: Option<&str>,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    let end = stay_end(start, end);

    reservations.into_iter().find(|other| {
        other.kind == ReservationKind::Lodging
            && other.status.is_active()
            && other.room_id.as_deref() == Some(room_id)
            && Some(other.id.as_str()) != exclude_id
            && {
                let (o_start, o_end) = stay_bounds(other);
                intervals_overlap(start, end, o_start, o_end)
            }
    })
}

/// Checks that a stay `[start, end)` can be booked in `room`.
pub fn check_room_available(
    room: &Room,
    reservations: &[Reservation],
    exclude_id: Option<&str>,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
) -> CoreResult<()> {
    if room.status == RoomStatus::Maintenance {
        return Err(CoreError::RoomInMaintenance(room.id.clone()));
    }

    match find_room_conflict(reservations, &room.id, exclude_id, start, end) {
        Some(holder) => Err(CoreError::RoomUnavailable {
            room_id: room.id.clone(),
            holder_id: holder.id.clone(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ReservationStatus, RoomCategory, TimeSlot};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn dining(id: &str, table: Option<&str>, slot: &str) -> Reservation {
        Reservation {
            id: id.to_string(),
            kind: ReservationKind::Dining,
            client_id: None,
            room_id: None,
            table_id: table.map(String::from),
            start: at(1, 12),
            end: None,
            time_slot: Some(TimeSlot::parse(slot).unwrap()),
            party_size: Some(2),
            status: ReservationStatus::Confirmed,
            grace_period_minutes: 15,
            notes: None,
        }
    }

    fn stay(id: &str, room: &str, start: NaiveDateTime, end: Option<NaiveDateTime>) -> Reservation {
        Reservation {
            id: id.to_string(),
            kind: ReservationKind::Lodging,
            client_id: None,
            room_id: Some(room.to_string()),
            table_id: None,
            start,
            end,
            time_slot: None,
            party_size: None,
            status: ReservationStatus::Confirmed,
            grace_period_minutes: 0,
            notes: None,
        }
    }

    fn room(status: RoomStatus) -> Room {
        Room {
            id: "ch1".to_string(),
            number: "CH-1".to_string(),
            category: RoomCategory::Standard,
            capacity: 2,
            base_rate: Money::from_units(80_000),
            status,
        }
    }

    #[test]
    fn test_same_slot_conflicts() {
        let a = dining("a", Some("t4"), "19:00");
        let b = dining("b", None, "19:00");
        let err = check_table_assignment(&[a.clone(), b.clone()], "t4", &b).unwrap_err();
        assert!(matches!(
            err,
            CoreError::TableSlotConflict { ref holder_id, ref slot, .. }
                if holder_id == "a" && slot == "19:00"
        ));
    }

    #[test]
    fn test_different_slot_is_free() {
        let a = dining("a", Some("t4"), "19:00");
        let b = dining("b", None, "19:30");
        assert!(check_table_assignment(&[a, b.clone()], "t4", &b).is_ok());
    }

    #[test]
    fn test_reassigning_same_reservation_is_idempotent() {
        let a = dining("a", Some("t4"), "19:00");
        assert!(check_table_assignment(&[a.clone()], "t4", &a).is_ok());
    }

    #[test]
    fn test_cancelled_holder_does_not_block() {
        let mut a = dining("a", Some("t4"), "19:00");
        a.status = ReservationStatus::Cancelled;
        let b = dining("b", None, "19:00");
        assert!(check_table_assignment(&[a, b.clone()], "t4", &b).is_ok());
    }

    #[test]
    fn test_dining_without_slot_cannot_take_a_table() {
        let mut a = dining("a", Some("t4"), "19:00");
        a.time_slot = None;
        let mut b = dining("b", None, "19:00");
        b.time_slot = None;

        let err = check_table_assignment(&[a.clone(), b.clone()], "t4", &b).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { ref field }) if field == "time slot"
        ));
        assert!(find_slot_conflict(&[a], "t4", &b).is_none());
    }

    #[test]
    fn test_interval_overlap_is_half_open() {
        assert!(intervals_overlap(at(1, 0), at(3, 0), at(2, 0), at(4, 0)));
        assert!(!intervals_overlap(at(1, 0), at(3, 0), at(3, 0), at(5, 0)));
        assert!(!intervals_overlap(at(3, 0), at(5, 0), at(1, 0), at(3, 0)));
        assert!(intervals_overlap(at(1, 0), at(10, 0), at(4, 0), at(5, 0)));
    }

    #[test]
    fn test_open_ended_stay_lasts_one_day() {
        let r = stay("h1", "ch1", at(5, 14), None);
        assert_eq!(stay_bounds(&r).1, at(6, 14));
        assert!(stay_covers_day(&r, NaiveDate::from_ymd_opt(2025, 3, 6).unwrap()));
        assert!(!stay_covers_day(&r, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()));
    }

    #[test]
    fn test_room_conflicts() {
        let existing = vec![stay("h1", "ch1", at(1, 14), Some(at(3, 11)))];
        let free = room(RoomStatus::Free);

        let err = check_room_available(&free, &existing, None, at(2, 14), Some(at(4, 11)))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::RoomUnavailable { ref holder_id, .. } if holder_id == "h1"
        ));

        assert!(check_room_available(&free, &existing, None, at(3, 14), Some(at(4, 11))).is_ok());
        // Rescheduling the same stay does not collide with itself.
        assert!(
            check_room_available(&free, &existing, Some("h1"), at(2, 14), Some(at(4, 11))).is_ok()
        );
    }

    #[test]
    fn test_inactive_stays_and_maintenance() {
        let mut cancelled = stay("h4", "ch1", at(1, 14), Some(at(3, 11)));
        cancelled.status = ReservationStatus::Cancelled;
        let free = room(RoomStatus::Free);
        assert!(check_room_available(&free, &[cancelled], None, at(1, 14), None).is_ok());

        let closed = room(RoomStatus::Maintenance);
        let err = check_room_available(&closed, &[], None, at(1, 14), None).unwrap_err();
        assert!(matches!(err, CoreError::RoomInMaintenance(_)));
    }
}
