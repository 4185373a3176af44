//! # Access Layer
//!
//! The calls the presentation layer makes. Each one waits the simulated
//! latency, then reads through the query cache or mutates through a
//! repository and invalidates the cached reads of the kinds it touched.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  api.dining_on(today)                api.assign_table("r3", "t9")       │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  QueryCache::get ── hit ──► value    sleep(latency)                     │
//! │       │ miss                              │                             │
//! │       ▼                                   ▼                             │
//! │  sleep(latency)                      ReservationRepository              │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  repository read ──► QueryCache::put invalidate([Reservation, Table])   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time-dependent operations (no-show, end of service, dashboard) read the
//! injected [`Clock`], so tests pin the current time.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use nas_core::rules::invoice::InvoiceSummary;
use nas_core::rules::lifecycle::ServiceReport;
use nas_core::rules::occupancy::{
    dashboard, derived_room_status, finance_reports, occupancy_rate, stay_on_day, DashboardInput,
    DashboardSummary, DerivedRoomStatus, FinanceReports,
};
use nas_core::rules::stock::ReorderSuggestion;
use nas_core::{
    Invoice, InvoiceStatus, Order, Reservation, ReservationKind, ReservationStatus, Room,
    StockFamily, StockItem, StockMovement,
};

use super::cache::{CacheStats, QueryCache, QueryKey};
use crate::error::StoreResult;
use crate::record::{Editable, EntityKind, Record};
use crate::repository::{
    InvoiceFilter, NewDiningReservation, NewInvoice, NewMovement, NewOrder, NewStay, Repository,
};
use crate::store::Store;

/// Source of the current local time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Wall clock in local time.
pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Local::now().naive_local())
}

/// A room and its status on the lodging board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBoardEntry {
    pub room: Room,
    pub status: DerivedRoomStatus,
}

const DASHBOARD_DEPS: &[EntityKind] = &[
    EntityKind::Room,
    EntityKind::Reservation,
    EntityKind::Invoice,
    EntityKind::StockItem,
    EntityKind::Event,
];

/// Async access layer over a [`Store`].
///
/// Cloning is cheap: clones share the store and the cache.
#[derive(Clone)]
pub struct Api {
    store: Store,
    cache: Arc<QueryCache>,
    latency: Duration,
    clock: Clock,
}

impl Api {
    /// Access layer with no latency and the system clock.
    pub fn new(store: Store) -> Self {
        Api {
            store,
            cache: Arc::new(QueryCache::new()),
            latency: Duration::ZERO,
            clock: system_clock(),
        }
    }

    /// Sets the simulated latency of every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Cached read: a hit returns at once, a miss waits the latency and
    /// loads.
    async fn cached<T, F, Fut>(&self, key: QueryKey, deps: &[EntityKind], load: F) -> StoreResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        if let Some(value) = self.cache.get::<T>(&key) {
            return Ok(value);
        }

        self.delay().await;
        let value = load().await?;
        self.cache.put(key, deps, value.clone());
        Ok(value)
    }

    /// Runs a mutation, then drops the cached reads of `kinds`.
    async fn mutate<T, Fut>(&self, kinds: &[EntityKind], op: Fut) -> StoreResult<T>
    where
        Fut: Future<Output = StoreResult<T>>,
    {
        self.delay().await;
        let result = op.await;
        if result.is_ok() {
            self.cache.invalidate(kinds);
        }
        result
    }

    // -------------------------------------------------------------------------
    // Generic CRUD
    // -------------------------------------------------------------------------

    /// Every record of `T`.
    pub async fn fetch_all<T: Record>(&self) -> StoreResult<Vec<T>> {
        let repo = self.store.repo::<T>();
        self.cached(QueryKey::scoped("fetch_all", T::KIND), &[T::KIND], || async move {
            repo.list().await
        })
        .await
    }

    /// One record of `T`.
    pub async fn fetch<T: Record>(&self, id: &str) -> StoreResult<T> {
        self.delay().await;
        self.store.repo::<T>().get(id).await
    }

    /// Creates a record; an empty id gets a generated one.
    pub async fn create<T: Editable>(&self, record: T) -> StoreResult<T> {
        let repo = self.store.repo::<T>();
        self.mutate(&[T::KIND], repo.insert(record)).await
    }

    pub async fn update<T: Editable>(&self, record: T) -> StoreResult<T> {
        let repo = self.store.repo::<T>();
        self.mutate(&[T::KIND], repo.update(record)).await
    }

    pub async fn delete<T: Editable>(&self, id: &str) -> StoreResult<()> {
        let repo = self.store.repo::<T>();
        self.mutate(&[T::KIND], repo.delete(id)).await
    }

    // -------------------------------------------------------------------------
    // Reservations
    // -------------------------------------------------------------------------

    /// Reservations of one kind.
    pub async fn reservations(&self, kind: ReservationKind) -> StoreResult<Vec<Reservation>> {
        let repo = self.store.reservations();
        self.cached(
            QueryKey::scoped("reservations", kind),
            &[EntityKind::Reservation],
            || async move { repo.list_kind(kind).await },
        )
        .await
    }

    /// Dining reservations of `day`, by slot.
    pub async fn dining_on(&self, day: NaiveDate) -> StoreResult<Vec<Reservation>> {
        let repo = self.store.reservations();
        self.cached(
            QueryKey::scoped("dining_on", day),
            &[EntityKind::Reservation],
            || async move { repo.dining_on(day).await },
        )
        .await
    }

    pub async fn create_dining(&self, new: NewDiningReservation) -> StoreResult<Reservation> {
        let repo = self.store.reservations();
        self.mutate(&[EntityKind::Reservation, EntityKind::Table], repo.create_dining(new))
            .await
    }

    /// Assigns a table to a dining reservation.
    pub async fn assign_table(
        &self,
        reservation_id: &str,
        table_id: &str,
    ) -> StoreResult<Reservation> {
        let repo = self.store.reservations();
        self.mutate(
            &[EntityKind::Reservation, EntityKind::Table],
            repo.assign_table(reservation_id, table_id),
        )
        .await
    }

    /// Reservations eligible for no-show right now. Never cached: the
    /// answer moves with the clock.
    pub async fn no_show_candidates(&self) -> StoreResult<Vec<Reservation>> {
        self.delay().await;
        self.store.reservations().no_show_candidates(self.now()).await
    }

    pub async fn mark_no_show(&self, reservation_id: &str) -> StoreResult<Reservation> {
        let repo = self.store.reservations();
        let now = self.now();
        self.mutate(
            &[EntityKind::Reservation, EntityKind::Table],
            repo.mark_no_show(reservation_id, now),
        )
        .await
    }

    pub async fn create_stay(&self, new: NewStay) -> StoreResult<Reservation> {
        let repo = self.store.reservations();
        self.mutate(&[EntityKind::Reservation], repo.create_stay(new)).await
    }

    /// Moves a stay to other dates, or another room.
    pub async fn reschedule_stay(
        &self,
        reservation_id: &str,
        room_id: Option<String>,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> StoreResult<Reservation> {
        let repo = self.store.reservations();
        self.mutate(
            &[EntityKind::Reservation],
            repo.reschedule_stay(reservation_id, room_id.as_deref(), start, end),
        )
        .await
    }

    pub async fn set_reservation_status(
        &self,
        reservation_id: &str,
        to: ReservationStatus,
    ) -> StoreResult<Reservation> {
        let repo = self.store.reservations();
        self.mutate(
            &[EntityKind::Reservation, EntityKind::Table],
            repo.set_status(reservation_id, to),
        )
        .await
    }

    /// Updates client, party size and notes.
    pub async fn update_reservation(&self, reservation: Reservation) -> StoreResult<Reservation> {
        let repo = self.store.reservations();
        self.mutate(&[EntityKind::Reservation], async move { repo.update(reservation).await })
            .await
    }

    /// Deletes a reservation and frees its table.
    pub async fn delete_reservation(&self, reservation_id: &str) -> StoreResult<()> {
        let repo = self.store.reservations();
        self.mutate(
            &[EntityKind::Reservation, EntityKind::Table],
            async move { repo.delete(reservation_id).await },
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Rooms
    // -------------------------------------------------------------------------

    /// Every room with its status over `[from, to]`.
    pub async fn room_board(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<RoomBoardEntry>> {
        let store = self.store.clone();
        self.cached(
            QueryKey::scoped("room_board", format!("{from}..{to}")),
            &[EntityKind::Room, EntityKind::Reservation],
            || async move {
                let data = store.snapshot().await;
                Ok(data
                    .rooms
                    .iter()
                    .map(|room| RoomBoardEntry {
                        status: derived_room_status(room, &data.reservations, from, to),
                        room: room.clone(),
                    })
                    .collect())
            },
        )
        .await
    }

    /// The active stay holding `room_id` on `day`.
    pub async fn stay_on(&self, room_id: &str, day: NaiveDate) -> StoreResult<Option<Reservation>> {
        let stays = self.reservations(ReservationKind::Lodging).await?;
        Ok(stay_on_day(&stays, room_id, day).cloned())
    }

    /// Occupancy percentage of `day`.
    pub async fn occupancy(&self, day: NaiveDate) -> StoreResult<f64> {
        let store = self.store.clone();
        self.cached(
            QueryKey::scoped("occupancy", day),
            &[EntityKind::Room, EntityKind::Reservation],
            || async move {
                let data = store.snapshot().await;
                Ok(occupancy_rate(&data.rooms, &data.reservations, day))
            },
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    pub async fn orders_for(&self, reservation_id: &str) -> StoreResult<Vec<Order>> {
        let repo = self.store.orders();
        let id = reservation_id.to_string();
        self.cached(
            QueryKey::scoped("orders_for", reservation_id),
            &[EntityKind::Order],
            || async move { repo.for_reservation(&id).await },
        )
        .await
    }

    pub async fn add_order(&self, new: NewOrder) -> StoreResult<Order> {
        let repo = self.store.orders();
        let now = self.now();
        self.mutate(&[EntityKind::Order], repo.add(new, now)).await
    }

    pub async fn send_orders(&self, reservation_id: &str) -> StoreResult<Vec<Order>> {
        let repo = self.store.orders();
        self.mutate(&[EntityKind::Order], repo.send_batch(reservation_id)).await
    }

    pub async fn serve_orders(&self, reservation_id: &str) -> StoreResult<Vec<Order>> {
        let repo = self.store.orders();
        self.mutate(&[EntityKind::Order], repo.serve_batch(reservation_id)).await
    }

    pub async fn cancel_order(&self, order_id: &str, reason: Option<String>) -> StoreResult<Order> {
        let repo = self.store.orders();
        self.mutate(&[EntityKind::Order], repo.cancel(order_id, reason)).await
    }

    /// Closes the service and logs the aggregate consumption.
    pub async fn end_of_service(&self, user_id: Option<String>) -> StoreResult<ServiceReport> {
        let repo = self.store.orders();
        let now = self.now();
        self.mutate(&[EntityKind::StockMovement], repo.end_of_service(now, user_id))
            .await
    }

    // -------------------------------------------------------------------------
    // Stock
    // -------------------------------------------------------------------------

    pub async fn stock_items(&self, family: Option<StockFamily>) -> StoreResult<Vec<StockItem>> {
        let repo = self.store.stock();
        self.cached(
            QueryKey::scoped("stock_items", family_scope(family)),
            &[EntityKind::StockItem],
            || async move { repo.by_family(family).await },
        )
        .await
    }

    /// Out items first, then low ones.
    pub async fn stock_alerts(&self, family: Option<StockFamily>) -> StoreResult<Vec<StockItem>> {
        let repo = self.store.stock();
        self.cached(
            QueryKey::scoped("stock_alerts", family_scope(family)),
            &[EntityKind::StockItem],
            || async move { repo.alerts(family).await },
        )
        .await
    }

    pub async fn reorder_suggestions(
        &self,
        family: Option<StockFamily>,
    ) -> StoreResult<Vec<ReorderSuggestion>> {
        let repo = self.store.stock();
        self.cached(
            QueryKey::scoped("reorder_suggestions", family_scope(family)),
            &[EntityKind::StockItem],
            || async move { repo.reorder_suggestions(family).await },
        )
        .await
    }

    pub async fn stock_movements(
        &self,
        product_id: Option<&str>,
    ) -> StoreResult<Vec<StockMovement>> {
        let repo = self.store.stock();
        let product = product_id.map(str::to_string);
        self.cached(
            QueryKey::scoped("stock_movements", product_id.unwrap_or("*")),
            &[EntityKind::StockMovement],
            || async move { repo.movements(product.as_deref()).await },
        )
        .await
    }

    pub async fn record_movement(
        &self,
        new: NewMovement,
    ) -> StoreResult<(StockItem, StockMovement)> {
        let repo = self.store.stock();
        let now = self.now();
        self.mutate(
            &[EntityKind::StockItem, EntityKind::StockMovement],
            repo.record_movement(new, now),
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Invoices
    // -------------------------------------------------------------------------

    pub async fn invoices(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>> {
        let repo = self.store.invoices();
        let owned = filter.clone();
        self.cached(
            QueryKey::scoped("invoices", format!("{filter:?}")),
            &[EntityKind::Invoice],
            || async move { repo.list(&owned).await },
        )
        .await
    }

    pub async fn invoice_summary(&self, filter: &InvoiceFilter) -> StoreResult<InvoiceSummary> {
        let repo = self.store.invoices();
        let owned = filter.clone();
        self.cached(
            QueryKey::scoped("invoice_summary", format!("{filter:?}")),
            &[EntityKind::Invoice],
            || async move { repo.summary(&owned).await },
        )
        .await
    }

    pub async fn create_invoice(&self, new: NewInvoice) -> StoreResult<Invoice> {
        let repo = self.store.invoices();
        self.mutate(&[EntityKind::Invoice], repo.create(new)).await
    }

    pub async fn set_invoice_status(
        &self,
        id: &str,
        status: InvoiceStatus,
    ) -> StoreResult<Invoice> {
        let repo = self.store.invoices();
        self.mutate(&[EntityKind::Invoice], repo.set_status(id, status)).await
    }

    // -------------------------------------------------------------------------
    // Dashboard
    // -------------------------------------------------------------------------

    /// Dashboard figures for today.
    pub async fn dashboard(&self) -> StoreResult<DashboardSummary> {
        let store = self.store.clone();
        let today = self.today();
        let summary = self
            .cached(QueryKey::scoped("dashboard", today), DASHBOARD_DEPS, || async move {
                let data = store.snapshot().await;
                Ok(dashboard(
                    DashboardInput {
                        rooms: &data.rooms,
                        reservations: &data.reservations,
                        invoices: &data.invoices,
                        stock: &data.stock_items,
                        events: &data.events,
                    },
                    today,
                ))
            })
            .await?;

        debug!(day = %summary.day, alerts = summary.stock_alerts, "Dashboard computed");
        Ok(summary)
    }

    /// Finance charts: revenue per source, the dining trend up to today,
    /// and room occupancy over `month` (`(year, month)`).
    pub async fn finance_reports(&self, month: (i32, u32)) -> StoreResult<FinanceReports> {
        let store = self.store.clone();
        let today = self.today();
        self.cached(
            QueryKey::scoped("finance_reports", format!("{today}/{}-{:02}", month.0, month.1)),
            &[EntityKind::Room, EntityKind::Reservation, EntityKind::Invoice],
            || async move {
                let data = store.snapshot().await;
                Ok(finance_reports(
                    &data.rooms,
                    &data.reservations,
                    &data.invoices,
                    today,
                    month,
                ))
            },
        )
        .await
    }

    /// Drops every cached read.
    pub fn refresh(&self) {
        self.cache.clear();
        info!("Query cache cleared");
    }
}

fn family_scope(family: Option<StockFamily>) -> &'static str {
    family.map_or("*", |f| f.as_str())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::StoreConfig;
    use nas_core::{
        Client, CoreError, MovementKind, Table, TableStatus, TimeSlot,
    };

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        day().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn fixed_clock(now: NaiveDateTime) -> Clock {
        Arc::new(move || now)
    }

    fn api() -> Api {
        Api::new(Store::seeded(StoreConfig::default(), day())).with_clock(fixed_clock(at(12, 0)))
    }

    fn client(name: &str) -> Client {
        Client {
            id: String::new(),
            name: name.to_string(),
            phone: "034 00 000 00".to_string(),
            email: None,
            dietary_preferences: None,
        }
    }

    #[tokio::test]
    async fn test_second_read_is_a_hit() {
        let api = api();
        let first = api.fetch_all::<Table>().await.unwrap();
        let second = api.fetch_all::<Table>().await.unwrap();

        assert_eq!(first, second);
        let stats = api.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[tokio::test]
    async fn test_mutation_forces_a_miss() {
        let api = api();
        let before = api.fetch_all::<Client>().await.unwrap();
        api.create(client("Rakoto Jean")).await.unwrap();
        let after = api.fetch_all::<Client>().await.unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(api.cache_stats().misses, 2);
    }

    #[tokio::test]
    async fn test_other_kinds_stay_cached() {
        let api = api();
        api.fetch_all::<Table>().await.unwrap();
        api.create(client("Rakoto Jean")).await.unwrap();
        api.fetch_all::<Table>().await.unwrap();

        assert_eq!(api.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_create_then_read_back() {
        let api = api();
        let created = api.create(client("Rakoto Jean")).await.unwrap();
        assert!(!created.id.is_empty());

        let read = api.fetch::<Client>(&created.id).await.unwrap();
        let mut expected = client("Rakoto Jean");
        expected.id = created.id.clone();
        assert_eq!(read, expected);
    }

    #[tokio::test]
    async fn test_assign_table_refreshes_floor() {
        let api = api();
        let floor = api.fetch_all::<Table>().await.unwrap();
        assert_eq!(floor.iter().find(|t| t.id == "t1").unwrap().status, TableStatus::Free);

        let created = api
            .create_dining(NewDiningReservation {
                client_id: Some("c2".to_string()),
                table_id: None,
                date: day(),
                time_slot: TimeSlot::parse("20:00").unwrap(),
                party_size: 2,
                grace_period_minutes: None,
                notes: None,
            })
            .await
            .unwrap();
        api.assign_table(&created.id, "t1").await.unwrap();

        let floor = api.fetch_all::<Table>().await.unwrap();
        let t1 = floor.iter().find(|t| t.id == "t1").unwrap();
        assert_eq!(t1.status, TableStatus::Reserved);
        assert_eq!(t1.assigned_reservation_id.as_deref(), Some(created.id.as_str()));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let api = api();
        api.dining_on(day()).await.unwrap();

        // r1 holds t3 at 12:10.
        let clash = api
            .create_dining(NewDiningReservation {
                client_id: None,
                table_id: Some("t3".to_string()),
                date: day(),
                time_slot: TimeSlot::parse("12:10").unwrap(),
                party_size: 2,
                grace_period_minutes: None,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(clash, StoreError::Core(CoreError::TableSlotConflict { .. })));

        api.dining_on(day()).await.unwrap();
        assert_eq!(api.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_no_show_follows_clock() {
        let store = Store::seeded(StoreConfig::default(), day());
        let created = store
            .reservations()
            .create_dining(NewDiningReservation {
                client_id: Some("c1".to_string()),
                table_id: None,
                date: day(),
                time_slot: TimeSlot::parse("19:00").unwrap(),
                party_size: 2,
                grace_period_minutes: Some(15),
                notes: None,
            })
            .await
            .unwrap();

        let early = Api::new(store.clone()).with_clock(fixed_clock(at(19, 14)));
        assert!(early.no_show_candidates().await.unwrap().is_empty());
        assert!(early.mark_no_show(&created.id).await.is_err());

        let late = Api::new(store).with_clock(fixed_clock(at(19, 16)));
        let candidates = late.no_show_candidates().await.unwrap();
        assert_eq!(candidates.len(), 1);
        let marked = late.mark_no_show(&created.id).await.unwrap();
        assert_eq!(marked.status, ReservationStatus::NoShow);
    }

    #[tokio::test]
    async fn test_movement_invalidates_alerts() {
        let api = api();
        let before = api.stock_alerts(None).await.unwrap();
        assert!(before.iter().any(|i| i.id == "s5"));

        api.record_movement(NewMovement {
            product_id: "s5".to_string(),
            kind: MovementKind::Purchase,
            quantity: 40.0,
            note: None,
            user_id: None,
        })
        .await
        .unwrap();

        let after = api.stock_alerts(None).await.unwrap();
        assert!(!after.iter().any(|i| i.id == "s5"));
        assert_eq!(api.stock_movements(Some("s5")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_from_fixtures() {
        let api = api();
        let summary = api.dashboard().await.unwrap();

        assert_eq!(summary.day, day());
        assert_eq!(summary.pending_invoices, 1);
        assert_eq!(summary.stock_alerts, 5);
        assert_eq!(summary.rooms_in_maintenance, 1);
        assert_eq!(summary.todays_dining.len(), 3);
    }

    #[tokio::test]
    async fn test_finance_reports_from_fixtures() {
        let api = api();
        let reports = api.finance_reports((2025, 2)).await.unwrap();

        let revenue: Vec<i64> = reports
            .revenue_by_source
            .iter()
            .map(|r| r.revenue.units())
            .collect();
        assert_eq!(revenue, vec![160_000, 45_000, 0]);

        let trend: Vec<usize> = reports.dining_trend.iter().map(|d| d.reservations).collect();
        assert_eq!(trend, vec![0, 0, 0, 0, 0, 0, 3]);

        // h2 covers Feb 8-11 on ch1 (h4 is cancelled), h1 Feb 11-13 on ch2,
        // h3 Feb 15-18 on ch4.
        let days: Vec<(&str, u32)> = reports
            .room_occupancy
            .iter()
            .map(|r| (r.room_id.as_str(), r.occupied_days))
            .collect();
        assert_eq!(days, vec![("ch1", 4), ("ch2", 3), ("ch3", 0), ("ch4", 4)]);
        assert_eq!(reports.room_occupancy[0].rate, 14);

        // A cancelled booking drops out of the next read.
        api.set_reservation_status("r3", ReservationStatus::Cancelled).await.unwrap();
        let reports = api.finance_reports((2025, 2)).await.unwrap();
        assert_eq!(reports.dining_trend[6].reservations, 2);
    }

    #[tokio::test]
    async fn test_latency_is_waited() {
        let api = api().with_latency(Duration::from_millis(20));
        let started = std::time::Instant::now();
        api.fetch_all::<Room>().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));

        // Cache hits answer at once.
        let started = std::time::Instant::now();
        api.fetch_all::<Room>().await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(20));
    }
}
