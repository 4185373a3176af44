//! # Occupancy & Dashboard
//!
//! Figures derived from rooms, stays, invoices, stock and events. Nothing
//! here is stored: every view recomputes from the current records.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::rules::conflict::stay_covers_day;
use crate::rules::invoice::{revenue_by_source, SourceRevenue};
use crate::rules::stock::alerts;
use crate::types::{
    Event, Invoice, InvoiceStatus, Reservation, ReservationKind, ReservationStatus, Room,
    RoomStatus, StockItem,
};

// =============================================================================
// Room Status
// =============================================================================

/// Room status as shown on the lodging board for a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DerivedRoomStatus {
    Free,
    Reserved,
    Maintenance,
}

string_enum!(DerivedRoomStatus {
    Free => "free",
    Reserved => "reserved",
    Maintenance => "maintenance",
});

fn active_stays_in<'a>(
    reservations: &'a [Reservation],
    room_id: &'a str,
) -> impl Iterator<Item = &'a Reservation> + 'a {
    reservations.iter().filter(move |r| {
        r.kind == ReservationKind::Lodging
            && r.status.is_active()
            && r.room_id.as_deref() == Some(room_id)
    })
}

/// Maintenance wins; otherwise reserved when an active stay starts within
/// `[from, to]` (inclusive days); otherwise free.
pub fn derived_room_status(
    room: &Room,
    reservations: &[Reservation],
    from: NaiveDate,
    to: NaiveDate,
) -> DerivedRoomStatus {
    if room.status == RoomStatus::Maintenance {
        return DerivedRoomStatus::Maintenance;
    }

    let starts_in_range = active_stays_in(reservations, &room.id).any(|r| {
        let day = r.start.date();
        from <= day && day <= to
    });

    if starts_in_range {
        DerivedRoomStatus::Reserved
    } else {
        DerivedRoomStatus::Free
    }
}

/// The active stay occupying `room_id` on `day`, for the calendar cell.
pub fn stay_on_day<'a>(
    reservations: &'a [Reservation],
    room_id: &'a str,
    day: NaiveDate,
) -> Option<&'a Reservation> {
    active_stays_in(reservations, room_id).find(|r| stay_covers_day(r, day))
}

/// Percentage of bookable rooms (not in maintenance) covered by an active
/// stay on `day`. Zero when no room is bookable.
pub fn occupancy_rate(rooms: &[Room], reservations: &[Reservation], day: NaiveDate) -> f64 {
    let bookable: Vec<&Room> = rooms
        .iter()
        .filter(|r| r.status != RoomStatus::Maintenance)
        .collect();

    if bookable.is_empty() {
        return 0.0;
    }

    let occupied = bookable
        .iter()
        .filter(|room| stay_on_day(reservations, &room.id, day).is_some())
        .count();

    occupied as f64 / bookable.len() as f64 * 100.0
}

// =============================================================================
// Dashboard
// =============================================================================

/// Monday and Sunday of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// Records the dashboard is computed from.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub rooms: &'a [Room],
    pub reservations: &'a [Reservation],
    pub invoices: &'a [Invoice],
    pub stock: &'a [StockItem],
    pub events: &'a [Event],
}

/// Home screen figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    #[ts(as = "String")]
    pub day: NaiveDate,
    /// Issued, unpaid invoices.
    pub pending_invoices: usize,
    pub stock_alerts: usize,
    pub rooms_in_maintenance: usize,
    pub occupancy_rate: f64,
    pub events_this_week: Vec<Event>,
    pub todays_dining: Vec<Reservation>,
}

pub fn dashboard(input: DashboardInput<'_>, today: NaiveDate) -> DashboardSummary {
    let (monday, sunday) = week_bounds(today);

    let mut events_this_week: Vec<Event> = input
        .events
        .iter()
        .filter(|e| monday <= e.date && e.date <= sunday)
        .cloned()
        .collect();
    events_this_week.sort_by_key(|e| (e.date, e.hours.start));

    let mut todays_dining: Vec<Reservation> = input
        .reservations
        .iter()
        .filter(|r| r.kind == ReservationKind::Dining && r.start.date() == today)
        .cloned()
        .collect();
    todays_dining.sort_by_key(|r| {
        r.time_slot
            .as_ref()
            .map(|s| s.time())
            .unwrap_or(NaiveTime::MIN)
    });

    DashboardSummary {
        day: today,
        pending_invoices: input
            .invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Issued)
            .count(),
        stock_alerts: alerts(input.stock).len(),
        rooms_in_maintenance: input
            .rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Maintenance)
            .count(),
        occupancy_rate: occupancy_rate(input.rooms, input.reservations, today),
        events_this_week,
        todays_dining,
    }
}

// =============================================================================
// Finance Reports
// =============================================================================

/// Length of the dining trend, today included.
pub const DINING_TREND_DAYS: i64 = 7;

/// Dining bookings of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyDining {
    #[ts(as = "String")]
    pub day: NaiveDate,
    pub reservations: usize,
}

/// Dining bookings per day over the last [`DINING_TREND_DAYS`] days,
/// oldest first. Cancelled bookings are not counted; no-shows are.
pub fn dining_trend(reservations: &[Reservation], today: NaiveDate) -> Vec<DailyDining> {
    (0..DINING_TREND_DAYS)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let count = reservations
                .iter()
                .filter(|r| {
                    r.kind == ReservationKind::Dining
                        && r.status != ReservationStatus::Cancelled
                        && r.start.date() == day
                })
                .count();
            DailyDining {
                day,
                reservations: count,
            }
        })
        .collect()
}

/// Share of a month one room spent under a stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoomMonthOccupancy {
    pub room_id: String,
    pub room_number: String,
    pub occupied_days: u32,
    /// Rounded percentage of the days of the month.
    pub rate: u32,
}

/// Days of `month` each room is covered by a stay, as a rounded
/// percentage. Completed stays count; cancelled and no-show ones do not.
/// A day covered by two stays counts once. Empty for an invalid month.
pub fn monthly_room_occupancy(
    rooms: &[Room],
    reservations: &[Reservation],
    year: i32,
    month: u32,
) -> Vec<RoomMonthOccupancy> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let Some(next) = first.checked_add_months(Months::new(1)) else {
        return Vec::new();
    };
    let days: Vec<NaiveDate> = first.iter_days().take_while(|d| *d < next).collect();

    rooms
        .iter()
        .map(|room| {
            let stays: Vec<&Reservation> = reservations
                .iter()
                .filter(|r| {
                    r.kind == ReservationKind::Lodging
                        && r.room_id.as_deref() == Some(room.id.as_str())
                        && !matches!(
                            r.status,
                            ReservationStatus::Cancelled | ReservationStatus::NoShow
                        )
                })
                .collect();

            let occupied_days = days
                .iter()
                .filter(|day| stays.iter().any(|r| stay_covers_day(r, **day)))
                .count() as u32;

            RoomMonthOccupancy {
                room_id: room.id.clone(),
                room_number: room.number.clone(),
                occupied_days,
                rate: (f64::from(occupied_days) * 100.0 / days.len() as f64).round() as u32,
            }
        })
        .collect()
}

/// Charts of the finance screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinanceReports {
    pub year: i32,
    pub month: u32,
    pub revenue_by_source: Vec<SourceRevenue>,
    pub dining_trend: Vec<DailyDining>,
    pub room_occupancy: Vec<RoomMonthOccupancy>,
}

/// Revenue per source, the dining trend up to `today` and room occupancy
/// for `(year, month)`.
pub fn finance_reports(
    rooms: &[Room],
    reservations: &[Reservation],
    invoices: &[Invoice],
    today: NaiveDate,
    (year, month): (i32, u32),
) -> FinanceReports {
    FinanceReports {
        year,
        month,
        revenue_by_source: revenue_by_source(invoices),
        dining_trend: dining_trend(reservations, today),
        room_occupancy: monthly_room_occupancy(rooms, reservations, year, month),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
