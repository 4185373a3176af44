//! # Reservation Repository
//!
//! Lodging stays and dining bookings, with the table / room side effects
//! applied under the same write guard as the reservation itself.
//!
//! ## Table Assignment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  assign_table("r5", "t4")                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write guard ─────────────────────────────────────────────┐             │
//! │  │ find r5, find t4              (NotFound → nothing set)  │             │
//! │  │ check_table_assignment        (Conflict → nothing set)  │             │
//! │  │ release r5's previous table, if any                     │             │
//! │  │ t4.status = reserved, t4.assigned = r5                  │             │
//! │  │ r5.table = t4                                           │             │
//! │  └─────────────────────────────────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use nas_core::rules::conflict::{check_room_available, check_table_assignment};
use nas_core::rules::lifecycle::{plan_status_change, TableEffect};
use nas_core::rules::no_show::{check_no_show, is_no_show_eligible};
use nas_core::validation::{validate_grace_minutes, validate_party_size, validate_stay_dates};
use nas_core::{
    CoreError, Reservation, ReservationKind, ReservationStatus, TableStatus, TimeSlot,
};

use super::{find, find_mut, new_id, position, Repository};
use crate::dataset::Dataset;
use crate::error::StoreResult;
use crate::store::SharedDataset;

// =============================================================================
// Inputs
// =============================================================================

/// A dining booking as entered at the desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiningReservation {
    pub client_id: Option<String>,
    pub table_id: Option<String>,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub party_size: u32,
    /// Falls back to the configured default.
    pub grace_period_minutes: Option<u32>,
    pub notes: Option<String>,
}

/// A lodging stay as entered at the desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStay {
    pub client_id: Option<String>,
    pub room_id: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    /// Defaults to pending.
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for reservations.
#[derive(Clone)]
pub struct ReservationRepository {
    data: SharedDataset,
    default_grace_minutes: u32,
}

/// Lets go of `table_id` if it is still held by `reservation_id`.
///
/// A table can carry several reservations at different slots but points
/// at one of them. When the holder lets go, the table is handed to the
/// earliest other active reservation still on it, and is only freed when
/// none is left.
fn release_table(data: &mut Dataset, table_id: &str, reservation_id: &str) {
    let successor = data
        .reservations
        .iter()
        .filter(|r| {
            r.id != reservation_id
                && r.status.is_active()
                && r.table_id.as_deref() == Some(table_id)
        })
        .min_by_key(|r| r.start)
        .map(|r| (r.id.clone(), r.status));

    let Some(table) = data.tables.iter_mut().find(|t| t.id == table_id) else {
        return;
    };
    if table.assigned_reservation_id.as_deref() != Some(reservation_id) {
        return;
    }

    match successor {
        Some((next_id, status)) => {
            table.status = if status == ReservationStatus::CheckedIn {
                TableStatus::Occupied
            } else {
                TableStatus::Reserved
            };
            debug!(
                table_id = %table_id,
                from = %reservation_id,
                to = %next_id,
                "Table handed over"
            );
            table.assigned_reservation_id = Some(next_id);
        }
        None => {
            table.status = TableStatus::Free;
            table.assigned_reservation_id = None;
            debug!(table_id = %table_id, reservation_id = %reservation_id, "Table released");
        }
    }
}

fn expect_kind(reservation: &Reservation, expected: ReservationKind) -> StoreResult<()> {
    if reservation.kind != expected {
        return Err(CoreError::WrongReservationKind {
            reservation_id: reservation.id.clone(),
            expected: expected.to_string(),
            actual: reservation.kind.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Applies a status change and its table effect. Caller holds the guard.
fn apply_status(
    data: &mut Dataset,
    reservation_id: &str,
    to: ReservationStatus,
) -> StoreResult<Reservation> {
    let reservation = find(&data.reservations, reservation_id)?;
    let change = plan_status_change(reservation, to)?;

    if change.is_noop() {
        debug!(reservation_id = %reservation_id, status = %to, "Status unchanged");
        return Ok(reservation.clone());
    }

    let table_id = reservation.table_id.clone();
    if let Some(table_id) = table_id.as_deref() {
        match change.table_effect {
            TableEffect::Occupy => {
                if let Some(table) = data.tables.iter_mut().find(|t| t.id == table_id) {
                    table.status = TableStatus::Occupied;
                    table.assigned_reservation_id = Some(reservation_id.to_string());
                }
            }
            TableEffect::Release => release_table(data, table_id, reservation_id),
            TableEffect::Keep => {}
        }
    }

    let reservation = find_mut(&mut data.reservations, reservation_id)?;
    reservation.status = to;

    info!(
        reservation_id = %reservation_id,
        from = %change.from,
        to = %change.to,
        "Reservation status changed"
    );
    Ok(reservation.clone())
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(data: SharedDataset, default_grace_minutes: u32) -> Self {
        ReservationRepository {
            data,
            default_grace_minutes,
        }
    }

    /// Reservations of one kind.
    pub async fn list_kind(&self, kind: ReservationKind) -> StoreResult<Vec<Reservation>> {
        let data = self.data.read().await;
        Ok(data
            .reservations
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }

    /// Dining reservations of `day`, ordered by slot.
    pub async fn dining_on(&self, day: NaiveDate) -> StoreResult<Vec<Reservation>> {
        let mut list: Vec<Reservation> = self
            .list_kind(ReservationKind::Dining)
            .await?
            .into_iter()
            .filter(|r| r.start.date() == day)
            .collect();
        list.sort_by(|a, b| a.time_slot.cmp(&b.time_slot));
        Ok(list)
    }

    // -------------------------------------------------------------------------
    // Dining
    // -------------------------------------------------------------------------

    /// Books a table. The booking starts confirmed; with a table it goes
    /// through the same slot check as [`assign_table`](Self::assign_table).
    pub async fn create_dining(&self, new: NewDiningReservation) -> StoreResult<Reservation> {
        validate_party_size(new.party_size)?;
        let grace = new.grace_period_minutes.unwrap_or(self.default_grace_minutes);
        validate_grace_minutes(grace)?;

        let reservation = Reservation {
            id: new_id(),
            kind: ReservationKind::Dining,
            client_id: new.client_id,
            room_id: None,
            table_id: None,
            start: new.date.and_time(new.time_slot.time()),
            end: None,
            time_slot: Some(new.time_slot),
            party_size: Some(new.party_size),
            status: ReservationStatus::Confirmed,
            grace_period_minutes: grace,
            notes: new.notes,
        };

        let mut data = self.data.write().await;

        if let Some(client_id) = reservation.client_id.as_deref() {
            find(&data.clients, client_id)?;
        }

        let mut reservation = reservation;
        if let Some(table_id) = new.table_id.as_deref() {
            find(&data.tables, table_id)?;
            check_table_assignment(&data.reservations, table_id, &reservation)?;

            let table = find_mut(&mut data.tables, table_id)?;
            table.status = TableStatus::Reserved;
            table.assigned_reservation_id = Some(reservation.id.clone());
            reservation.table_id = Some(table_id.to_string());
        }

        data.reservations.push(reservation.clone());
        info!(
            reservation_id = %reservation.id,
            slot = ?reservation.time_slot.as_ref().map(|s| s.to_string()),
            table_id = ?reservation.table_id,
            "Dining reservation created"
        );
        Ok(reservation)
    }

    /// Places a reservation on a table, atomically.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown reservation or table
    /// - `WrongReservationKind` for a lodging stay
    /// - `TableSlotConflict` when another active reservation holds the
    ///   table at the same slot
    ///
    /// On error nothing is modified.
    pub async fn assign_table(
        &self,
        reservation_id: &str,
        table_id: &str,
    ) -> StoreResult<Reservation> {
        let mut data = self.data.write().await;

        let reservation = find(&data.reservations, reservation_id)?;
        find(&data.tables, table_id)?;

        if reservation.kind == ReservationKind::Lodging {
            return Err(CoreError::WrongReservationKind {
                reservation_id: reservation_id.to_string(),
                expected: ReservationKind::Dining.to_string(),
                actual: reservation.kind.to_string(),
            }
            .into());
        }

        if let Err(err) = check_table_assignment(&data.reservations, table_id, reservation) {
            warn!(
                reservation_id = %reservation_id,
                table_id = %table_id,
                error = %err,
                "Table assignment refused"
            );
            return Err(err.into());
        }

        let previous = reservation.table_id.clone();
        if let Some(previous) = previous.as_deref().filter(|p| *p != table_id) {
            release_table(&mut data, previous, reservation_id);
        }

        let table = find_mut(&mut data.tables, table_id)?;
        table.status = TableStatus::Reserved;
        table.assigned_reservation_id = Some(reservation_id.to_string());

        let reservation = find_mut(&mut data.reservations, reservation_id)?;
        reservation.table_id = Some(table_id.to_string());

        info!(reservation_id = %reservation_id, table_id = %table_id, "Table assigned");
        Ok(reservation.clone())
    }

    /// Dining reservations past their grace period without a table.
    pub async fn no_show_candidates(&self, now: NaiveDateTime) -> StoreResult<Vec<Reservation>> {
        let data = self.data.read().await;
        Ok(data
            .reservations
            .iter()
            .filter(|r| is_no_show_eligible(r, now))
            .cloned()
            .collect())
    }

    /// Marks a reservation as no-show when it is eligible at `now`.
    pub async fn mark_no_show(
        &self,
        reservation_id: &str,
        now: NaiveDateTime,
    ) -> StoreResult<Reservation> {
        let mut data = self.data.write().await;
        check_no_show(find(&data.reservations, reservation_id)?, now)?;
        apply_status(&mut data, reservation_id, ReservationStatus::NoShow)
    }

    // -------------------------------------------------------------------------
    // Lodging
    // -------------------------------------------------------------------------

    /// Books a room for `[start, end)`.
    pub async fn create_stay(&self, new: NewStay) -> StoreResult<Reservation> {
        validate_stay_dates(new.start, new.end)?;

        let mut data = self.data.write().await;

        if let Some(client_id) = new.client_id.as_deref() {
            find(&data.clients, client_id)?;
        }
        let room = find(&data.rooms, &new.room_id)?;
        check_room_available(room, &data.reservations, None, new.start, new.end)?;

        let reservation = Reservation {
            id: new_id(),
            kind: ReservationKind::Lodging,
            client_id: new.client_id,
            room_id: Some(new.room_id),
            table_id: None,
            start: new.start,
            end: new.end,
            time_slot: None,
            party_size: None,
            status: new.status.unwrap_or(ReservationStatus::Pending),
            grace_period_minutes: 0,
            notes: new.notes,
        };

        data.reservations.push(reservation.clone());
        info!(
            reservation_id = %reservation.id,
            room_id = ?reservation.room_id,
            start = %reservation.start,
            "Stay created"
        );
        Ok(reservation)
    }

    /// Moves a stay to new dates, possibly another room.
    pub async fn reschedule_stay(
        &self,
        reservation_id: &str,
        room_id: Option<&str>,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> StoreResult<Reservation> {
        validate_stay_dates(start, end)?;

        let mut data = self.data.write().await;

        let current = find(&data.reservations, reservation_id)?;
        expect_kind(current, ReservationKind::Lodging)?;

        let room_id = room_id
            .map(str::to_string)
            .or_else(|| current.room_id.clone())
            .unwrap_or_default();
        let room = find(&data.rooms, &room_id)?;
        check_room_available(room, &data.reservations, Some(reservation_id), start, end)?;

        let reservation = find_mut(&mut data.reservations, reservation_id)?;
        reservation.room_id = Some(room_id);
        reservation.start = start;
        reservation.end = end;

        info!(reservation_id = %reservation_id, start = %start, "Stay rescheduled");
        Ok(reservation.clone())
    }

    // -------------------------------------------------------------------------
    // Status
    // -------------------------------------------------------------------------

    /// Moves a reservation through its state machine and updates its table.
    pub async fn set_status(
        &self,
        reservation_id: &str,
        to: ReservationStatus,
    ) -> StoreResult<Reservation> {
        let mut data = self.data.write().await;
        apply_status(&mut data, reservation_id, to).map_err(|err| {
            warn!(
                reservation_id = %reservation_id,
                to = %to,
                error = %err,
                "Status change refused"
            );
            err
        })
    }
}

#[async_trait]
impl Repository<Reservation> for ReservationRepository {
    async fn list(&self) -> StoreResult<Vec<Reservation>> {
        let data = self.data.read().await;
        Ok(data.reservations.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Reservation> {
        let data = self.data.read().await;
        find(&data.reservations, id).cloned()
    }

    /// Inserts a reservation as-is, after the same checks as the typed
    /// creation paths.
    async fn insert(&self, mut reservation: Reservation) -> StoreResult<Reservation> {
        if reservation.id.is_empty() {
            reservation.id = new_id();
        }

        let mut data = self.data.write().await;
        match reservation.kind {
            ReservationKind::Lodging => {
                validate_stay_dates(reservation.start, reservation.end)?;
                if let Some(room_id) = reservation.room_id.as_deref() {
                    let room = find(&data.rooms, room_id)?;
                    check_room_available(
                        room,
                        &data.reservations,
                        None,
                        reservation.start,
                        reservation.end,
                    )?;
                }
            }
            ReservationKind::Dining | ReservationKind::Event => {
                if let Some(table_id) = reservation.table_id.as_deref() {
                    find(&data.tables, table_id)?;
                    check_table_assignment(&data.reservations, table_id, &reservation)?;
                    let table = find_mut(&mut data.tables, table_id)?;
                    table.status = TableStatus::Reserved;
                    table.assigned_reservation_id = Some(reservation.id.clone());
                }
            }
        }

        data.reservations.push(reservation.clone());
        info!(reservation_id = %reservation.id, kind = %reservation.kind, "Reservation inserted");
        Ok(reservation)
    }

    /// Updates notes, party size and client. Status, table, room and dates
    /// only change through their dedicated operations.
    async fn update(&self, reservation: Reservation) -> StoreResult<Reservation> {
        if let Some(size) = reservation.party_size {
            validate_party_size(size)?;
        }

        let mut data = self.data.write().await;
        let current = find_mut(&mut data.reservations, &reservation.id)?;
        current.client_id = reservation.client_id;
        current.party_size = reservation.party_size;
        current.notes = reservation.notes;
        Ok(current.clone())
    }

    /// Deletes a reservation and frees the table it held.
    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let index = position(&data.reservations, id)?;
        let removed = data.reservations.remove(index);

        if let Some(table_id) = removed.table_id.as_deref() {
            release_table(&mut data, table_id, id);
        }

        info!(reservation_id = %id, "Reservation deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{Store, StoreConfig};
    use nas_core::{Money, Room, RoomCategory, RoomStatus, Table};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn table(id: &str) -> Table {
        Table {
            id: id.to_string(),
            number: id.to_uppercase(),
            capacity: 4,
            zone: None,
            status: TableStatus::Free,
            assigned_reservation_id: None,
        }
    }

    fn room(id: &str, status: RoomStatus) -> Room {
        Room {
            id: id.to_string(),
            number: id.to_uppercase(),
            category: RoomCategory::Standard,
            capacity: 2,
            base_rate: Money::from_units(80_000),
            status,
        }
    }

    fn booking(slot: &str) -> NewDiningReservation {
        NewDiningReservation {
            client_id: None,
            table_id: None,
            date: day(),
            time_slot: TimeSlot::parse(slot).unwrap(),
            party_size: 2,
            grace_period_minutes: None,
            notes: None,
        }
    }

    async fn store_with_tables() -> Store {
        let mut data = Dataset::default();
        data.tables = vec![table("t1"), table("t2")];
        data.rooms = vec![room("ch1", RoomStatus::Free), room("ch3", RoomStatus::Maintenance)];
        Store::with_dataset(data, StoreConfig::default())
    }

    #[tokio::test]
    async fn test_create_dining_defaults() {
        let store = store_with_tables().await;
        let r = store.reservations().create_dining(booking("19:00")).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.grace_period_minutes, 15);
        assert_eq!(r.start, at(1, 19, 0));
        assert!(r.table_id.is_none());
    }

    #[tokio::test]
    async fn test_assign_table_conflict_and_idempotence() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let a = repo.create_dining(booking("19:00")).await.unwrap();
        let b = repo.create_dining(booking("19:00")).await.unwrap();
        let c = repo.create_dining(booking("20:30")).await.unwrap();

        repo.assign_table(&a.id, "t1").await.unwrap();
        // Same reservation, same table: no conflict with itself.
        repo.assign_table(&a.id, "t1").await.unwrap();
        // Another slot on the same table is fine.
        repo.assign_table(&c.id, "t1").await.unwrap();

        let err = repo.assign_table(&b.id, "t1").await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::TableSlotConflict { .. })));

        // Nothing was half-applied for b.
        let b_after = repo.get(&b.id).await.unwrap();
        assert!(b_after.table_id.is_none());
        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Reserved);
        assert_eq!(t1.assigned_reservation_id.as_deref(), Some(c.id.as_str()));
    }

    #[tokio::test]
    async fn test_table_handed_to_remaining_slot() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let a = repo.create_dining(booking("19:00")).await.unwrap();
        let c = repo.create_dining(booking("20:30")).await.unwrap();
        repo.assign_table(&a.id, "t1").await.unwrap();
        repo.assign_table(&c.id, "t1").await.unwrap();

        repo.set_status(&c.id, ReservationStatus::Cancelled).await.unwrap();

        let a_after = repo.get(&a.id).await.unwrap();
        assert_eq!(a_after.table_id.as_deref(), Some("t1"));
        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Reserved);
        assert_eq!(t1.assigned_reservation_id.as_deref(), Some(a.id.as_str()));

        // Last one out frees the table.
        repo.set_status(&a.id, ReservationStatus::Cancelled).await.unwrap();
        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Free);
        assert!(t1.assigned_reservation_id.is_none());
    }

    #[tokio::test]
    async fn test_table_handover_keeps_seated_guests() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let a = repo.create_dining(booking("12:00")).await.unwrap();
        let c = repo.create_dining(booking("20:30")).await.unwrap();
        repo.assign_table(&c.id, "t1").await.unwrap();
        repo.assign_table(&a.id, "t1").await.unwrap();
        repo.set_status(&c.id, ReservationStatus::CheckedIn).await.unwrap();

        // c now holds t1; a leaving must not touch it.
        repo.set_status(&a.id, ReservationStatus::NoShow).await.unwrap();
        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Occupied);
        assert_eq!(t1.assigned_reservation_id.as_deref(), Some(c.id.as_str()));

        // Deleting the holder hands nothing over: a is no longer active.
        repo.delete(&c.id).await.unwrap();
        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Free);
    }

    #[tokio::test]
    async fn test_moving_holder_hands_table_over() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let a = repo.create_dining(booking("19:00")).await.unwrap();
        let c = repo.create_dining(booking("20:30")).await.unwrap();
        repo.assign_table(&a.id, "t1").await.unwrap();
        repo.assign_table(&c.id, "t1").await.unwrap();

        repo.assign_table(&c.id, "t2").await.unwrap();

        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Reserved);
        assert_eq!(t1.assigned_reservation_id.as_deref(), Some(a.id.as_str()));
    }

    #[tokio::test]
    async fn test_insert_dining_with_table_needs_a_slot() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let mut r = repo.create_dining(booking("19:00")).await.unwrap();
        r.id = String::new();
        r.time_slot = None;
        r.table_id = Some("t1".to_string());

        let err = repo.insert(r).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert_eq!(store.tables().get("t1").await.unwrap().status, TableStatus::Free);
    }

    #[tokio::test]
    async fn test_assign_unknown_records() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let a = repo.create_dining(booking("19:00")).await.unwrap();

        assert!(matches!(
            repo.assign_table(&a.id, "t99").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            repo.assign_table("nope", "t1").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Free);
    }

    #[tokio::test]
    async fn test_moving_to_another_table_frees_the_first() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let a = repo.create_dining(booking("19:00")).await.unwrap();

        repo.assign_table(&a.id, "t1").await.unwrap();
        repo.assign_table(&a.id, "t2").await.unwrap();

        assert_eq!(store.tables().get("t1").await.unwrap().status, TableStatus::Free);
        assert_eq!(store.tables().get("t2").await.unwrap().status, TableStatus::Reserved);
    }

    #[tokio::test]
    async fn test_status_side_effects_on_table() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let mut new = booking("12:00");
        new.table_id = Some("t1".to_string());
        let r = repo.create_dining(new).await.unwrap();
        assert_eq!(store.tables().get("t1").await.unwrap().status, TableStatus::Reserved);

        repo.set_status(&r.id, ReservationStatus::CheckedIn).await.unwrap();
        assert_eq!(store.tables().get("t1").await.unwrap().status, TableStatus::Occupied);

        repo.set_status(&r.id, ReservationStatus::Completed).await.unwrap();
        let t1 = store.tables().get("t1").await.unwrap();
        assert_eq!(t1.status, TableStatus::Free);
        assert!(t1.assigned_reservation_id.is_none());

        let err = repo.set_status(&r.id, ReservationStatus::Pending).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_mark_no_show() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let r = repo.create_dining(booking("18:30")).await.unwrap();

        let early = repo.mark_no_show(&r.id, at(1, 18, 44)).await.unwrap_err();
        assert!(matches!(early, StoreError::Core(CoreError::NotEligibleForNoShow(_))));
        assert!(repo.no_show_candidates(at(1, 18, 44)).await.unwrap().is_empty());

        assert_eq!(repo.no_show_candidates(at(1, 18, 46)).await.unwrap().len(), 1);
        let marked = repo.mark_no_show(&r.id, at(1, 18, 46)).await.unwrap();
        assert_eq!(marked.status, ReservationStatus::NoShow);
    }

    #[tokio::test]
    async fn test_stays_overlap_and_reschedule() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let stay = |start, end| NewStay {
            client_id: None,
            room_id: "ch1".to_string(),
            start,
            end,
            status: None,
            notes: None,
        };

        let h1 = repo.create_stay(stay(at(1, 14, 0), Some(at(3, 11, 0)))).await.unwrap();
        assert_eq!(h1.status, ReservationStatus::Pending);
        assert_eq!(h1.grace_period_minutes, 0);

        let clash = repo.create_stay(stay(at(2, 14, 0), Some(at(4, 11, 0)))).await.unwrap_err();
        assert!(matches!(clash, StoreError::Core(CoreError::RoomUnavailable { .. })));

        let h2 = repo.create_stay(stay(at(3, 14, 0), None)).await.unwrap();

        // h1 cannot grow into h2, but can move earlier.
        let grown = repo
            .reschedule_stay(&h1.id, None, at(1, 14, 0), Some(at(4, 11, 0)))
            .await;
        assert!(grown.is_err());
        let moved = repo
            .reschedule_stay(&h1.id, None, at(1, 10, 0), Some(at(3, 10, 0)))
            .await
            .unwrap();
        assert_eq!(moved.start, at(1, 10, 0));

        // Cancelled stays stop blocking the room.
        repo.set_status(&h2.id, ReservationStatus::Cancelled).await.unwrap();
        repo.create_stay(stay(at(3, 14, 0), Some(at(5, 11, 0)))).await.unwrap();
    }

    #[tokio::test]
    async fn test_room_in_maintenance_cannot_be_booked() {
        let store = store_with_tables().await;
        let err = store
            .reservations()
            .create_stay(NewStay {
                client_id: None,
                room_id: "ch3".to_string(),
                start: at(1, 14, 0),
                end: None,
                status: None,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::RoomInMaintenance(_))));
    }

    #[tokio::test]
    async fn test_delete_frees_table() {
        let store = store_with_tables().await;
        let repo = store.reservations();
        let mut new = booking("12:00");
        new.table_id = Some("t2".to_string());
        let r = repo.create_dining(new).await.unwrap();

        repo.delete(&r.id).await.unwrap();
        let t2 = store.tables().get("t2").await.unwrap();
        assert_eq!(t2.status, TableStatus::Free);
        assert!(repo.list().await.unwrap().is_empty());
    }
}
