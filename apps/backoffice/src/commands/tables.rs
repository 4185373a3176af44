//! # Table Commands
//!
//! The floor plan: every table with the reservation holding it.

use serde::Serialize;
use tracing::{debug, info};

use nas_core::validation::validate_label;
use nas_core::{Reservation, ReservationKind, Table};

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// One table on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    #[serde(flatten)]
    pub table: Table,
    pub reservation: Option<Reservation>,
}

/// Tables by number, optionally of one zone.
pub async fn floor_plan(state: &AppState, zone: Option<&str>) -> Result<Vec<TableView>, ApiError> {
    debug!(zone = ?zone, "floor_plan command");
    state.session.require(routes::FLOOR)?;

    let tables = state.api.fetch_all::<Table>().await?;
    let dining = state.api.reservations(ReservationKind::Dining).await?;

    let mut plan: Vec<TableView> = tables
        .into_iter()
        .filter(|t| {
            zone.map_or(true, |z| {
                t.zone.as_deref().is_some_and(|tz| tz.eq_ignore_ascii_case(z))
            })
        })
        .map(|table| {
            let reservation = table
                .assigned_reservation_id
                .as_deref()
                .and_then(|id| dining.iter().find(|r| r.id == id))
                .cloned();
            TableView { table, reservation }
        })
        .collect();

    plan.sort_by_key(|view| table_order(&view.table.number));
    Ok(plan)
}

/// `T12` sorts after `T9`; numbers without digits go last.
fn table_order(number: &str) -> (u32, String) {
    let digits = number.trim_start_matches(|c: char| !c.is_ascii_digit());
    (digits.parse().unwrap_or(u32::MAX), number.to_string())
}

/// Adds a table to the floor.
pub async fn add_table(state: &AppState, table: Table) -> Result<Table, ApiError> {
    state.session.require(routes::FLOOR)?;
    validate_label("table number", &table.number)?;

    let table = state.api.create(table).await?;
    info!(table_id = %table.id, number = %table.number, "Table added");
    Ok(table)
}
