//! # Demo Data
//!
//! The data set loaded at startup when `seed_fixtures` is on. Dates are
//! placed around `today` so the dashboard and calendars always have
//! something to show.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use nas_core::{
    Client, Event, EventStatus, EventType, Invoice, InvoiceLine, InvoiceSource, InvoiceStatus,
    MenuItem, MenuVariant, Money, Order, OrderStatus, Reservation, ReservationKind,
    ReservationStatus, Room, RoomCategory, RoomStatus, StockFamily, StockItem, StockSubCategory,
    StockUnit, Table, TableStatus, TimeRange, TimeSlot,
};
use nas_core::rules::invoice::invoice_total;

use crate::dataset::Dataset;

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN))
}

fn slot(hour: u32, minute: u32) -> TimeSlot {
    TimeSlot::from_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN))
}

/// `day` of the month of `today`, clamped to the month's last day.
fn day_of_month(today: NaiveDate, day: u32) -> NaiveDate {
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(today.year(), today.month(), d))
        .unwrap_or(today)
}

fn hours(start: (u32, u32), end: (u32, u32)) -> TimeRange {
    TimeRange {
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or(NaiveTime::MIN),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or(NaiveTime::MIN),
    }
}

fn clients() -> Vec<Client> {
    vec![
        Client {
            id: "c1".to_string(),
            name: "Rabe Andry".to_string(),
            phone: "032 11 111 11".to_string(),
            email: Some("rabe@example.com".to_string()),
            dietary_preferences: None,
        },
        Client {
            id: "c2".to_string(),
            name: "Hanitra Solo".to_string(),
            phone: "033 22 222 22".to_string(),
            email: None,
            dietary_preferences: None,
        },
    ]
}

fn rooms() -> Vec<Room> {
    let room = |n: u32, category, capacity, rate, status| Room {
        id: format!("ch{}", n),
        number: format!("CH-{}", n),
        category,
        capacity,
        base_rate: Money::from_units(rate),
        status,
    };
    vec![
        room(1, RoomCategory::Standard, 2, 80_000, RoomStatus::Free),
        room(2, RoomCategory::Suite, 3, 150_000, RoomStatus::Free),
        room(3, RoomCategory::Family, 4, 120_000, RoomStatus::Maintenance),
        room(4, RoomCategory::Standard, 2, 80_000, RoomStatus::Occupied),
    ]
}

fn tables() -> Vec<Table> {
    const CAPACITIES: [u32; 12] = [2, 4, 4, 6, 2, 8, 3, 4, 2, 6, 2, 4];

    CAPACITIES
        .iter()
        .zip(1u32..)
        .map(|(&capacity, n)| Table {
            id: format!("t{}", n),
            number: format!("T{}", n),
            capacity,
            zone: Some(if n % 2 == 0 { "Terrace" } else { "Indoor" }.to_string()),
            status: if n % 5 == 0 {
                TableStatus::Occupied
            } else if n % 3 == 0 {
                TableStatus::Reserved
            } else {
                TableStatus::Free
            },
            assigned_reservation_id: None,
        })
        .collect()
}

fn menu_items() -> Vec<MenuItem> {
    const DISHES: [(&str, &str); 12] = [
        ("Ravitoto", "mains"),
        ("Romazava", "mains"),
        ("Poulet coco", "mains"),
        ("Zébu grillé", "mains"),
        ("Brochettes", "starters"),
        ("Sambos", "starters"),
        ("Soupe", "starters"),
        ("Thé glacé", "drinks"),
        ("Café", "drinks"),
        ("Jus papaye", "drinks"),
        ("Salade", "starters"),
        ("Poisson", "mains"),
    ];

    DISHES
        .iter()
        .zip(1i64..)
        .map(|(&(name, category), i)| MenuItem {
            id: format!("m{}", i),
            category_id: category.to_string(),
            name: name.to_string(),
            price: Money::from_units(10_000 + i * 2_000),
            photo_url: None,
            enabled: i % 3 != 0,
            variants: if i % 4 == 0 {
                vec![MenuVariant {
                    name: "XL".to_string(),
                    price_delta: Money::from_units(3_000),
                }]
            } else {
                vec![]
            },
        })
        .collect()
}

fn dining(
    id: &str,
    client: &str,
    table: &str,
    start: NaiveDateTime,
    time: TimeSlot,
    party: u32,
    status: ReservationStatus,
) -> Reservation {
    Reservation {
        id: id.to_string(),
        kind: ReservationKind::Dining,
        client_id: Some(client.to_string()),
        room_id: None,
        table_id: Some(table.to_string()),
        start,
        end: None,
        time_slot: Some(time),
        party_size: Some(party),
        status,
        grace_period_minutes: nas_core::DEFAULT_GRACE_MINUTES,
        notes: None,
    }
}

fn stay(
    id: &str,
    client: &str,
    room: &str,
    today: NaiveDate,
    from: i64,
    to: i64,
    status: ReservationStatus,
) -> Reservation {
    Reservation {
        id: id.to_string(),
        kind: ReservationKind::Lodging,
        client_id: Some(client.to_string()),
        room_id: Some(room.to_string()),
        table_id: None,
        start: at(today + Duration::days(from), 14, 0),
        end: Some(at(today + Duration::days(to), 11, 0)),
        time_slot: None,
        party_size: None,
        status,
        grace_period_minutes: 0,
        notes: None,
    }
}

fn reservations(today: NaiveDate) -> Vec<Reservation> {
    vec![
        dining("r1", "c1", "t3", at(today, 12, 0), slot(12, 10), 3, ReservationStatus::CheckedIn),
        dining("r2", "c2", "t10", at(today, 13, 0), slot(13, 5), 4, ReservationStatus::CheckedIn),
        dining("r3", "c1", "t9", at(today, 18, 0), slot(18, 30), 2, ReservationStatus::Confirmed),
        stay("h1", "c2", "ch2", today, 1, 3, ReservationStatus::Pending),
        stay("h2", "c1", "ch1", today, -2, 1, ReservationStatus::CheckedIn),
        stay("h3", "c1", "ch4", today, 5, 8, ReservationStatus::Confirmed),
        stay("h4", "c2", "ch1", today, 10, 12, ReservationStatus::Cancelled),
    ]
}

fn orders(today: NaiveDate) -> Vec<Order> {
    vec![
        Order {
            id: "o1".to_string(),
            reservation_id: "r1".to_string(),
            menu_item_id: "m1".to_string(),
            quantity: 2,
            status: OrderStatus::Sent,
            cancellation_reason: None,
            created_at: at(today, 12, 20),
        },
        Order {
            id: "o2".to_string(),
            reservation_id: "r1".to_string(),
            menu_item_id: "m2".to_string(),
            quantity: 1,
            status: OrderStatus::Served,
            cancellation_reason: None,
            created_at: at(today, 12, 25),
        },
    ]
}

fn stock_items() -> Vec<StockItem> {
    use StockFamily::{Lodging, Restaurant};
    use StockSubCategory::{BathLinen, BedLinen, Breakfast, Housekeeping, Kitchen};
    use StockUnit::{Kg, Litre, Unit};

    let item = |id: &str,
                name: &str,
                family,
                sub_category,
                unit,
                quantity: f64,
                min_threshold: f64| StockItem {
        id: id.to_string(),
        name: name.to_string(),
        family,
        sub_category,
        unit,
        quantity,
        min_threshold,
        photo_url: None,
    };
    vec![
        item("s1", "Draps", Lodging, BedLinen, Unit, 30.0, 20.0),
        item("s2", "Savon", Lodging, Housekeeping, Unit, 10.0, 15.0),
        item("s4", "Serviettes", Lodging, BathLinen, Unit, 12.0, 20.0),
        item("s5", "Shampooing", Lodging, Housekeeping, Unit, 0.0, 10.0),
        item("s6", "Huile", Restaurant, Kitchen, Litre, 3.0, 5.0),
        item("s7", "Riz", Restaurant, Kitchen, Kg, 18.0, 15.0),
        item("s8", "Café", Restaurant, Breakfast, Kg, 2.0, 5.0),
    ]
}

fn invoices() -> Vec<Invoice> {
    let invoice = |id: &str,
                   number: &str,
                   date: NaiveDateTime,
                   client: &str,
                   source,
                   line: InvoiceLine,
                   status| {
        let lines = vec![line];
        Invoice {
            id: id.to_string(),
            number: number.to_string(),
            date,
            client_name: client.to_string(),
            source,
            total: invoice_total(&lines),
            lines,
            status,
        }
    };
    let date = |m, d| at(NaiveDate::from_ymd_opt(2025, m, d).unwrap_or_default(), 10, 0);
    vec![
        invoice(
            "f1",
            "NAS-2025-0001",
            date(1, 15),
            "Rabe Andry",
            InvoiceSource::Restaurant,
            InvoiceLine {
                description: "Lunch".to_string(),
                quantity: 3,
                unit_price: Money::from_units(15_000),
            },
            InvoiceStatus::Issued,
        ),
        invoice(
            "f2",
            "NAS-2025-0002",
            date(1, 20),
            "Hanitra Solo",
            InvoiceSource::Lodging,
            InvoiceLine {
                description: "Night".to_string(),
                quantity: 2,
                unit_price: Money::from_units(80_000),
            },
            InvoiceStatus::Paid,
        ),
    ]
}

fn events(today: NaiveDate) -> Vec<Event> {
    vec![
        Event {
            id: "e1".to_string(),
            name: "Friday jazz".to_string(),
            date: day_of_month(today, 12),
            hours: hours((19, 0), (22, 30)),
            expected_guests: 40,
            contact: "Head waiter".to_string(),
            notes: Some("Tables of 4 preferred.".to_string()),
            status: Some(EventStatus::Planned),
            event_type: Some(EventType::Music),
        },
        Event {
            id: "e2".to_string(),
            name: "Wine tasting".to_string(),
            date: day_of_month(today, 15),
            hours: hours((18, 0), (21, 0)),
            expected_guests: 25,
            contact: "Sommelier".to_string(),
            notes: None,
            status: Some(EventStatus::Confirmed),
            event_type: Some(EventType::Tasting),
        },
        Event {
            id: "e3".to_string(),
            name: "Birthday - Ranaivo family".to_string(),
            date: day_of_month(today, 20),
            hours: hours((12, 0), (15, 0)),
            expected_guests: 30,
            contact: "R. Andriam".to_string(),
            notes: None,
            status: Some(EventStatus::Planned),
            event_type: Some(EventType::Birthday),
        },
        Event {
            id: "e4".to_string(),
            name: "Local conference".to_string(),
            date: day_of_month(today, 30),
            hours: hours((10, 0), (12, 0)),
            expected_guests: 80,
            contact: "Town hall".to_string(),
            notes: None,
            status: Some(EventStatus::Planned),
            event_type: Some(EventType::Conference),
        },
    ]
}

/// Builds the demo data set around `today`.
///
/// Tables holding a demo reservation carry its back-reference: occupied
/// when the guests are seated, reserved otherwise.
pub fn demo_dataset(today: NaiveDate) -> Dataset {
    let reservations = reservations(today);
    let mut tables = tables();

    for reservation in &reservations {
        let Some(table_id) = reservation.table_id.as_deref() else {
            continue;
        };
        if let Some(table) = tables.iter_mut().find(|t| t.id == table_id) {
            table.status = if reservation.status == ReservationStatus::CheckedIn {
                TableStatus::Occupied
            } else {
                TableStatus::Reserved
            };
            table.assigned_reservation_id = Some(reservation.id.clone());
        }
    }

    Dataset {
        clients: clients(),
        rooms: rooms(),
        tables,
        reservations,
        menu_items: menu_items(),
        orders: orders(today),
        stock_items: stock_items(),
        stock_movements: Vec::new(),
        invoices: invoices(),
        events: events(today),
    }
}
