//! # Export Commands
//!
//! CSV files and printable HTML pages of any list the session can see.
//! Each target reads through the command that owns its screen, so an
//! export never shows more than the screen would.
//!
//! ```text
//! export invoices --format html
//!        │
//!        ▼
//! invoices::finance(filter)  ──►  to_html("Invoices", rows, now)
//!        │                               │
//!        ▼                               ▼
//! FORBIDDEN_ROUTE               invoices-2025-02-10.html
//! ```

use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use nas_core::export::{to_csv, to_html, Tabular};
use nas_core::rules::navigation::can_view;
use nas_core::{ReservationKind, CoreResult};
use nas_store::InvoiceFilter;

use super::{clients, events, invoices, menu, reservations, routes, stock};
use crate::error::ApiError;
use crate::state::AppState;

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    Clients,
    Reservations,
    Invoices,
    Stock,
    Movements,
    Menu,
    Events,
}

impl ExportTarget {
    pub fn title(&self) -> &'static str {
        match self {
            ExportTarget::Clients => "Clients",
            ExportTarget::Reservations => "Reservations",
            ExportTarget::Invoices => "Invoices",
            ExportTarget::Stock => "Stock",
            ExportTarget::Movements => "Stock movements",
            ExportTarget::Menu => "Menu",
            ExportTarget::Events => "Events",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            ExportTarget::Clients => "clients",
            ExportTarget::Reservations => "reservations",
            ExportTarget::Invoices => "invoices",
            ExportTarget::Stock => "stock",
            ExportTarget::Movements => "movements",
            ExportTarget::Menu => "menu",
            ExportTarget::Events => "events",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Html,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }
}

/// A rendered export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub target: ExportTarget,
    pub format: ExportFormat,
    /// Suggested name, `<target>-<date>.<ext>`.
    pub file_name: String,
    pub rows: usize,
    #[serde(skip)]
    pub content: String,
}

fn render<T: Tabular>(
    state: &AppState,
    title: &str,
    format: ExportFormat,
    records: &[T],
) -> CoreResult<String> {
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Html => to_html(title, records, state.api.now()),
    }
}

/// Renders `target` in `format`.
///
/// ## Errors
/// - `FORBIDDEN_ROUTE` when the session cannot see the target's screen
/// - `BUSINESS_LOGIC` when there is nothing to export
pub async fn export(
    state: &AppState,
    target: ExportTarget,
    format: ExportFormat,
) -> Result<ExportDocument, ApiError> {
    debug!(target = ?target, format = ?format, "export command");
    let title = target.title();

    let (rows, content) = match target {
        ExportTarget::Clients => {
            let records = clients::list_clients(state, None).await?;
            (records.len(), render(state, title, format, &records)?)
        }
        ExportTarget::Reservations => {
            state.session.require_any(&[routes::LODGING, routes::FLOOR])?;
            let role = state.session.role();

            let mut records = Vec::new();
            if can_view(role, routes::LODGING) {
                records.extend(reservations::list_stays(state).await?);
            }
            if can_view(role, routes::FLOOR) {
                records.extend(state.api.reservations(ReservationKind::Dining).await?);
            }
            records.sort_by_key(|r| r.start);
            (records.len(), render(state, title, format, &records)?)
        }
        ExportTarget::Invoices => {
            let records = invoices::finance(state, InvoiceFilter::default()).await?.invoices;
            (records.len(), render(state, title, format, &records)?)
        }
        ExportTarget::Stock => {
            let records = stock::list_stock(state, None).await?;
            (records.len(), render(state, title, format, &records)?)
        }
        ExportTarget::Movements => {
            let records = stock::movements(state, None).await?;
            (records.len(), render(state, title, format, &records)?)
        }
        ExportTarget::Menu => {
            let records = menu::list_menu(state, None).await?;
            (records.len(), render(state, title, format, &records)?)
        }
        ExportTarget::Events => {
            let records = events::list_events(state, None).await?;
            (records.len(), render(state, title, format, &records)?)
        }
    };

    Ok(ExportDocument {
        target,
        format,
        file_name: format!("{}-{}.{}", target.slug(), state.api.today(), format.extension()),
        rows,
        content,
    })
}

/// Writes the document to `path`, or under its suggested name in `dir`.
pub fn write_document(
    document: &ExportDocument,
    path: Option<PathBuf>,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    let path = path.unwrap_or_else(|| dir.join(&document.file_name));
    std::fs::write(&path, &document.content)
        .map_err(|e| ApiError::internal(format!("Failed to write {}: {}", path.display(), e)))?;

    info!(path = %path.display(), rows = document.rows, "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::state;
    use crate::error::ErrorCode;
    use nas_core::export::UTF8_BOM;
    use nas_core::rules::navigation::Role;

    #[tokio::test]
    async fn test_invoices_csv() {
        let doc = export(&state(Role::Accountant), ExportTarget::Invoices, ExportFormat::Csv)
            .await
            .unwrap();
        assert_eq!(doc.rows, 2);
        assert_eq!(doc.file_name, "invoices-2025-02-10.csv");
        assert!(doc.content.starts_with(UTF8_BOM));
        assert!(doc.content.contains("NAS-2025-0002"));
    }

    #[tokio::test]
    async fn test_stock_html_follows_role() {
        let doc = export(&state(Role::Storekeeper), ExportTarget::Stock, ExportFormat::Html)
            .await
            .unwrap();
        assert_eq!(doc.rows, 4);
        assert!(doc.content.contains("<h1>Stock</h1>"));
        assert!(!doc.content.contains("Huile"));
    }

    #[tokio::test]
    async fn test_reservations_by_screen() {
        // Reception sees both stays and dining.
        let doc = export(&state(Role::Reception), ExportTarget::Reservations, ExportFormat::Csv)
            .await
            .unwrap();
        assert_eq!(doc.rows, 7);

        let doc = export(&state(Role::Waiter), ExportTarget::Reservations, ExportFormat::Csv)
            .await
            .unwrap();
        assert_eq!(doc.rows, 3);
    }

    #[tokio::test]
    async fn test_empty_and_forbidden() {
        let admin = state(Role::Admin);
        let err = export(&admin, ExportTarget::Movements, ExportFormat::Csv).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err = export(&state(Role::Kitchen), ExportTarget::Invoices, ExportFormat::Csv)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);
    }

    #[tokio::test]
    async fn test_write_to_dir() {
        let doc = export(&state(Role::Admin), ExportTarget::Menu, ExportFormat::Csv).await.unwrap();
        let dir = std::env::temp_dir();
        let path = write_document(&doc, None, &dir).unwrap();
        assert_eq!(path, dir.join("menu-2025-02-10.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), doc.content);
        std::fs::remove_file(path).unwrap();
    }
}
