//! # Invoice Commands
//!
//! The finance screen: invoice list with its filters, the summary figures
//! above it, the charts below it, and issuing.
//!
//! Invoice lines are typed `description:quantity:unit_price`, e.g.
//! `Dîner:2:25000`. The description may itself contain colons.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nas_core::rules::invoice::InvoiceSummary;
use nas_core::rules::occupancy::FinanceReports;
use nas_core::{Invoice, InvoiceLine, InvoiceSource, InvoiceStatus, Money, ValidationError};
use nas_store::{InvoiceFilter, NewInvoice};

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// Invoices and their summary, as shown together on the finance screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceView {
    pub summary: InvoiceSummary,
    pub invoices: Vec<Invoice>,
}

/// An invoice as entered at the counter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoiceRequest {
    pub client_name: String,
    pub source: InvoiceSource,
    pub lines: Vec<InvoiceLine>,
}

/// Parses `description:quantity:unit_price`.
pub fn parse_line(input: &str) -> Result<InvoiceLine, ApiError> {
    let invalid = || {
        ValidationError::invalid_format("invoice line", "expected description:quantity:price")
    };

    let mut parts = input.rsplitn(3, ':');
    let price = parts.next().ok_or_else(invalid)?;
    let quantity = parts.next().ok_or_else(invalid)?;
    let description = parts.next().ok_or_else(invalid)?;

    if description.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "line description".to_string(),
        }
        .into());
    }

    Ok(InvoiceLine {
        description: description.trim().to_string(),
        quantity: quantity.trim().parse().map_err(|_| invalid())?,
        unit_price: Money::from_units(price.trim().parse().map_err(|_| invalid())?),
    })
}

/// Invoices matching `filter`, with the summary of the same selection.
pub async fn finance(state: &AppState, filter: InvoiceFilter) -> Result<FinanceView, ApiError> {
    debug!(filter = ?filter, "finance command");
    state.session.require(routes::FINANCE)?;

    let invoices = state.api.invoices(&filter).await?;
    let summary = state.api.invoice_summary(&filter).await?;
    Ok(FinanceView { summary, invoices })
}

/// Finance charts for `month`, the current month by default.
pub async fn reports(
    state: &AppState,
    month: Option<(i32, u32)>,
) -> Result<FinanceReports, ApiError> {
    state.session.require(routes::FINANCE)?;

    let today = state.api.today();
    let month = month.unwrap_or((today.year(), today.month()));
    debug!(year = month.0, month = month.1, "reports command");
    Ok(state.api.finance_reports(month).await?)
}

/// Issues an invoice dated now.
pub async fn create_invoice(
    state: &AppState,
    request: NewInvoiceRequest,
) -> Result<Invoice, ApiError> {
    state.session.require(routes::FINANCE)?;

    if request.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        }
        .into());
    }

    let invoice = state
        .api
        .create_invoice(NewInvoice {
            client_name: request.client_name,
            source: request.source,
            lines: request.lines,
            date: state.api.now(),
        })
        .await?;

    info!(number = %invoice.number, "Invoice created");
    Ok(invoice)
}

pub async fn set_invoice_status(
    state: &AppState,
    invoice_id: &str,
    status: InvoiceStatus,
) -> Result<Invoice, ApiError> {
    state.session.require(routes::FINANCE)?;
    Ok(state.api.set_invoice_status(invoice_id, status).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::state;
    use crate::error::ErrorCode;
    use nas_core::rules::navigation::Role;

    #[test]
    fn test_parse_line() {
        let line = parse_line("Menu: enfant:2:12000").unwrap();
        assert_eq!(line.description, "Menu: enfant");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Money::from_units(12_000));

        assert!(parse_line("Dîner:deux:25000").is_err());
        assert!(parse_line("25000").is_err());
        assert!(parse_line(":1:25000").is_err());
    }

    #[tokio::test]
    async fn test_fixture_summary() {
        let view = finance(&state(Role::Accountant), InvoiceFilter::default()).await.unwrap();
        assert_eq!(view.invoices.len(), 2);
        assert_eq!(view.summary.count, 2);
        assert_eq!(view.summary.total_invoiced, Money::from_units(205_000));
        assert_eq!(view.summary.total_paid, Money::from_units(160_000));
        assert_eq!(view.summary.outstanding, Money::from_units(45_000));
    }

    #[tokio::test]
    async fn test_issue_and_pay() {
        let state = state(Role::Counter);
        let invoice = create_invoice(
            &state,
            NewInvoiceRequest {
                client_name: "Rabe Andry".to_string(),
                source: InvoiceSource::Restaurant,
                lines: vec![
                    parse_line("Dîner:2:25000").unwrap(),
                    parse_line("Jus:2:4000").unwrap(),
                ],
            },
        )
        .await
        .unwrap();
        assert_eq!(invoice.number, "NAS-2025-0003");
        assert_eq!(invoice.total, Money::from_units(58_000));
        assert_eq!(invoice.status, InvoiceStatus::Issued);

        set_invoice_status(&state, &invoice.id, InvoiceStatus::Paid).await.unwrap();

        let filter = InvoiceFilter {
            client: Some("Rabe Andry".to_string()),
            ..Default::default()
        };
        let view = finance(&state, filter).await.unwrap();
        assert_eq!(view.invoices.len(), 2);
        assert_eq!(view.summary.total_paid, Money::from_units(58_000));
        assert_eq!(view.summary.outstanding, Money::from_units(45_000));
    }

    #[tokio::test]
    async fn test_cancelled_left_out_of_summary() {
        let state = state(Role::Admin);
        set_invoice_status(&state, "f2", InvoiceStatus::Cancelled).await.unwrap();

        let view = finance(&state, InvoiceFilter::default()).await.unwrap();
        assert_eq!(view.invoices.len(), 2);
        assert_eq!(view.summary.count, 1);
        assert_eq!(view.summary.total_invoiced, Money::from_units(45_000));
    }

    #[tokio::test]
    async fn test_empty_invoice_refused() {
        let err = create_invoice(
            &state(Role::Admin),
            NewInvoiceRequest {
                client_name: "Hanitra Solo".to_string(),
                source: InvoiceSource::Lodging,
                lines: vec![],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_finance_hidden_for_waiter() {
        let err = finance(&state(Role::Waiter), InvoiceFilter::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);
    }

    #[tokio::test]
    async fn test_reports_default_to_current_month() {
        let state = state(Role::Accountant);
        let reports = reports(&state, None).await.unwrap();
        assert_eq!((reports.year, reports.month), (2025, 2));
        assert_eq!(reports.revenue_by_source[0].revenue, Money::from_units(160_000));
        assert_eq!(reports.dining_trend.last().map(|d| d.reservations), Some(3));

        // January: no stay yet.
        let january = super::reports(&state, Some((2025, 1))).await.unwrap();
        assert!(january.room_occupancy.iter().all(|r| r.occupied_days == 0));

        let err = super::reports(&crate::commands::testing::state(Role::Storekeeper), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);
    }
}
