//! # No-Show Rule
//!
//! ```text
//!   reservation day @ slot            + grace            now
//!   ────────┬──────────────────────────────┬──────────────┬──────►
//!           19:00                          19:15          19:16
//!                                          └── deadline   └── eligible
//! ```
//!
//! Eligibility is recomputed on every call from `now`; it is never stored.

use chrono::{Duration, NaiveDateTime};

use crate::error::{CoreError, CoreResult};
use crate::types::{Reservation, ReservationKind, ReservationStatus};

/// Moment after which the reservation may be declared a no-show:
/// reservation day at its slot, plus the grace period.
///
/// `None` when the reservation has no slot.
pub fn no_show_deadline(reservation: &Reservation) -> Option<NaiveDateTime> {
    let slot = reservation.time_slot.as_ref()?;
    let planned = reservation.start.date().and_time(slot.time());
    Some(planned + Duration::minutes(i64::from(reservation.grace_period_minutes)))
}

/// A confirmed dining reservation without a table, past its deadline.
pub fn is_no_show_eligible(reservation: &Reservation, now: NaiveDateTime) -> bool {
    reservation.kind == ReservationKind::Dining
        && reservation.status == ReservationStatus::Confirmed
        && reservation.table_id.is_none()
        && no_show_deadline(reservation).is_some_and(|deadline| now > deadline)
}

/// Fails with `NotEligibleForNoShow` unless [`is_no_show_eligible`] holds.
pub fn check_no_show(reservation: &Reservation, now: NaiveDateTime) -> CoreResult<()> {
    if is_no_show_eligible(reservation, now) {
        Ok(())
    } else {
        Err(CoreError::NotEligibleForNoShow(reservation.id.clone()))
    }
}
