//! # Domain Types
//!
//! Plain records shared by every layer of the back-office.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  LODGING                 DINING                   BACK OFFICE           │
//! │  ───────                 ──────                   ───────────           │
//! │  Room                    Table                    StockItem             │
//! │   └─ RoomCategory         └─ TableStatus           └─ StockMovement     │
//! │                          MenuItem                 Invoice               │
//! │         Client ◄───┐      └─ MenuVariant           └─ InvoiceLine       │
//! │                    │     Order                    Event                 │
//! │            Reservation ◄──┘                                            │
//! │            (lodging | dining | event)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records carry no behaviour beyond small accessors; the rules live in
//! [`crate::rules`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Client
// =============================================================================

/// A guest or diner. Created on first booking, never deleted in-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub dietary_preferences: Option<String>,
}

// =============================================================================
// Room
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RoomCategory {
    Standard,
    Suite,
    Family,
}

string_enum!(RoomCategory {
    Standard => "standard",
    Suite => "suite",
    Family => "family",
});

/// Informational room status. Actual occupancy is derived from stays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RoomStatus {
    #[default]
    Free,
    Occupied,
    Maintenance,
}

string_enum!(RoomStatus {
    Free => "free",
    Occupied => "occupied",
    Maintenance => "maintenance",
});

/// A hotel room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Room {
    pub id: String,
    pub number: String,
    pub category: RoomCategory,
    pub capacity: u32,
    /// Base nightly rate.
    pub base_rate: Money,
    pub status: RoomStatus,
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TableStatus {
    #[default]
    Free,
    Reserved,
    Occupied,
}

string_enum!(TableStatus {
    Free => "free",
    Reserved => "reserved",
    Occupied => "occupied",
});

/// A restaurant table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Table {
    pub id: String,
    pub number: String,
    pub capacity: u32,
    /// Dining zone, e.g. "Indoor" or "Terrace".
    pub zone: Option<String>,
    pub status: TableStatus,
    /// Reservation currently holding the table.
    pub assigned_reservation_id: Option<String>,
}

// =============================================================================
// Time Slot
// =============================================================================

/// Declared time of a dining reservation, always canonical `HH:MM`.
///
/// Two reservations share a slot when their canonical strings are equal;
/// parsing normalises `9:5` style input so string equality and time
/// equality agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(export)]
pub struct TimeSlot(String);

impl TimeSlot {
    /// Parses `H:M`, `HH:MM` (or `HH:MM:SS`) into a canonical slot.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| ValidationError::invalid_format("time slot", "expected HH:MM"))?;
        Ok(Self::from_time(time))
    }

    /// Builds the slot from a clock time, dropping seconds.
    pub fn from_time(time: NaiveTime) -> Self {
        TimeSlot(time.format("%H:%M").to_string())
    }

    /// The slot as a clock time.
    pub fn time(&self) -> NaiveTime {
        // Canonical by construction.
        NaiveTime::parse_from_str(&self.0, "%H:%M").unwrap_or(NaiveTime::MIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TimeSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::parse(s)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeSlot::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.0
    }
}

// =============================================================================
// Reservation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReservationKind {
    Lodging,
    Dining,
    Event,
}

string_enum!(ReservationKind {
    Lodging => "lodging",
    Dining => "dining",
    Event => "event",
});

/// Reservation lifecycle status. Transitions are checked by
/// [`crate::rules::lifecycle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

string_enum!(ReservationStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    CheckedIn => "checked_in",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
});

impl ReservationStatus {
    /// Statuses that still hold a room or a table.
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed | ReservationStatus::CheckedIn
        )
    }
}

/// A lodging stay, a dining booking or an event booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Reservation {
    pub id: String,
    pub kind: ReservationKind,
    pub client_id: Option<String>,
    pub room_id: Option<String>,
    pub table_id: Option<String>,
    #[ts(as = "String")]
    pub start: NaiveDateTime,
    #[ts(as = "Option<String>")]
    pub end: Option<NaiveDateTime>,
    pub time_slot: Option<TimeSlot>,
    pub party_size: Option<u32>,
    pub status: ReservationStatus,
    /// Minutes past the slot before a no-show may be declared.
    pub grace_period_minutes: u32,
    pub notes: Option<String>,
}

// =============================================================================
// Menu
// =============================================================================

/// A priced variant of a menu item (e.g. "XL", +3 000 Ar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuVariant {
    pub name: String,
    pub price_delta: Money,
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub price: Money,
    pub photo_url: Option<String>,
    /// Whether the item can currently be ordered.
    pub enabled: bool,
    pub variants: Vec<MenuVariant>,
}

impl MenuItem {
    /// Price of the item with the named variant applied.
    ///
    /// Returns `None` when the variant does not exist.
    pub fn price_with_variant(&self, variant: &str) -> Option<Money> {
        self.variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(variant))
            .map(|v| self.price + v.price_delta)
    }
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Entered,
    Sent,
    Served,
    Cancelled,
}

string_enum!(OrderStatus {
    Entered => "entered",
    Sent => "sent",
    Served => "served",
    Cancelled => "cancelled",
});

/// One ordered menu item for a dining reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub reservation_id: String,
    pub menu_item_id: String,
    pub quantity: u32,
    pub status: OrderStatus,
    pub cancellation_reason: Option<String>,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockFamily {
    Lodging,
    Restaurant,
}

string_enum!(StockFamily {
    Lodging => "lodging",
    Restaurant => "restaurant",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockSubCategory {
    BedLinen,
    BathLinen,
    Kitchen,
    Breakfast,
    Housekeeping,
}

string_enum!(StockSubCategory {
    BedLinen => "bed_linen",
    BathLinen => "bath_linen",
    Kitchen => "kitchen",
    Breakfast => "breakfast",
    Housekeeping => "housekeeping",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockUnit {
    Unit,
    Kg,
    Litre,
    Pack,
}

string_enum!(StockUnit {
    Unit => "unit",
    Kg => "kg",
    Litre => "litre",
    Pack => "pack",
});

/// A tracked supply. Its level (ok / low / out) is derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockItem {
    pub id: String,
    pub name: String,
    pub family: StockFamily,
    pub sub_category: StockSubCategory,
    pub unit: StockUnit,
    pub quantity: f64,
    pub min_threshold: f64,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MovementKind {
    Purchase,
    Consumption,
    /// Signed correction after a count.
    Adjustment,
}

string_enum!(MovementKind {
    Purchase => "purchase",
    Consumption => "consumption",
    Adjustment => "adjustment",
});

/// An entry of the stock movement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: f64,
    pub note: Option<String>,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
    pub user_id: Option<String>,
}

// =============================================================================
// Invoice
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InvoiceSource {
    Lodging,
    Restaurant,
    Event,
}

string_enum!(InvoiceSource {
    Lodging => "lodging",
    Restaurant => "restaurant",
    Event => "event",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InvoiceStatus {
    #[default]
    Issued,
    Paid,
    Cancelled,
}

string_enum!(InvoiceStatus {
    Issued => "issued",
    Paid => "paid",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl InvoiceLine {
    /// quantity × unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// An issued invoice. `total` is always computed from `lines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub number: String,
    #[ts(as = "String")]
    pub date: NaiveDateTime,
    pub client_name: String,
    pub source: InvoiceSource,
    pub lines: Vec<InvoiceLine>,
    pub total: Money,
    pub status: InvoiceStatus,
}

// =============================================================================
// Event
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EventStatus {
    Planned,
    Confirmed,
    Cancelled,
}

string_enum!(EventStatus {
    Planned => "planned",
    Confirmed => "confirmed",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EventType {
    Music,
    Tasting,
    Birthday,
    Conference,
    Wedding,
    Other,
}

string_enum!(EventType {
    Music => "music",
    Tasting => "tasting",
    Birthday => "birthday",
    Conference => "conference",
    Wedding => "wedding",
    Other => "other",
});

/// Opening and closing time of an event, written `19:00–22:30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TimeRange {
    #[ts(as = "String")]
    pub start: NaiveTime,
    #[ts(as = "String")]
    pub end: NaiveTime,
}

impl TimeRange {
    /// Parses `HH:MM–HH:MM` (en dash) or `HH:MM-HH:MM`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let (start, end) = input
            .split_once('–')
            .or_else(|| input.split_once('-'))
            .ok_or_else(|| ValidationError::invalid_format("hours", "expected HH:MM–HH:MM"))?;
        let start = TimeSlot::parse(start)?.time();
        let end = TimeSlot::parse(end)?.time();
        if end <= start {
            return Err(ValidationError::invalid_format(
                "hours",
                "end must be after start",
            ));
        }
        Ok(TimeRange { start, end })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// A planned event (concert, tasting, private party...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Event {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub hours: TimeRange,
    /// Expected headcount.
    pub expected_guests: u32,
    pub contact: String,
    pub notes: Option<String>,
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_is_canonical() {
        assert_eq!(TimeSlot::parse("9:5").unwrap().as_str(), "09:05");
        assert_eq!(TimeSlot::parse(" 12:10 ").unwrap().as_str(), "12:10");
        assert_eq!(TimeSlot::parse("18:30:00").unwrap().as_str(), "18:30");
        assert!(TimeSlot::parse("25:00").is_err());
        assert!(TimeSlot::parse("noon").is_err());
    }

    #[test]
    fn test_time_slot_time() {
        let slot = TimeSlot::parse("18:30").unwrap();
        assert_eq!(slot.time(), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    }

    #[test]
    fn test_time_range_parse() {
        let range = TimeRange::parse("19:00–22:30").unwrap();
        assert_eq!(range.to_string(), "19:00–22:30");

        let ascii = TimeRange::parse("10:00-12:00").unwrap();
        assert_eq!(ascii.start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());

        assert!(TimeRange::parse("22:00–19:00").is_err());
        assert!(TimeRange::parse("19:00").is_err());
    }

    #[test]
    fn test_string_enums_round_trip() {
        for status in ReservationStatus::ALL {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), *status);
        }
        assert_eq!(
            "CHECKED_IN".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::CheckedIn
        );
        assert!("arrived".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_active_statuses() {
        assert!(ReservationStatus::Pending.is_active());
        assert!(ReservationStatus::CheckedIn.is_active());
        assert!(!ReservationStatus::Cancelled.is_active());
        assert!(!ReservationStatus::Completed.is_active());
        assert!(!ReservationStatus::NoShow.is_active());
    }

    #[test]
    fn test_menu_variant_price() {
        let item = MenuItem {
            id: "m1".to_string(),
            category_id: "mains".to_string(),
            name: "Ravitoto".to_string(),
            price: Money::from_units(10_000),
            photo_url: None,
            enabled: true,
            variants: vec![MenuVariant {
                name: "XL".to_string(),
                price_delta: Money::from_units(3_000),
            }],
        };
        assert_eq!(item.price_with_variant("xl"), Some(Money::from_units(13_000)));
        assert_eq!(item.price_with_variant("small"), None);
    }

    #[test]
    fn test_reservation_serializes_camel_case() {
        let r = Reservation {
            id: "r1".to_string(),
            kind: ReservationKind::Dining,
            client_id: Some("c1".to_string()),
            room_id: None,
            table_id: None,
            start: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            end: None,
            time_slot: Some(TimeSlot::parse("12:10").unwrap()),
            party_size: Some(3),
            status: ReservationStatus::Confirmed,
            grace_period_minutes: 15,
            notes: None,
        };
        let json = serde_json_string(&r);
        assert!(json.contains("\"timeSlot\":\"12:10\""));
        assert!(json.contains("\"gracePeriodMinutes\":15"));
        assert!(json.contains("\"status\":\"confirmed\""));
    }

    fn serde_json_string<T: Serialize>(value: &T) -> String {
        serde_json::to_string(value).unwrap()
    }
}
