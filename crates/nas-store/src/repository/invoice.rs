//! # Invoice Repository
//!
//! Issues numbered invoices with computed totals, and answers the finance
//! screen: filtered lists and summary figures.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nas_core::rules::invoice::{
    invoice_total, matches_client, matches_search, next_invoice_number, summarize, InvoiceSummary,
};
use nas_core::validation::{
    validate_client_name, validate_line_quantity, validate_price, validate_search_query,
};
use nas_core::{Invoice, InvoiceLine, InvoiceSource, InvoiceStatus};

use super::{find, find_mut, new_id};
use crate::error::StoreResult;
use crate::store::SharedDataset;

/// An invoice to issue. Number and total are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub client_name: String,
    pub source: InvoiceSource,
    pub lines: Vec<InvoiceLine>,
    pub date: NaiveDateTime,
}

/// Finance screen filters. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    /// Case-insensitive match on client name or number.
    pub search: Option<String>,
    /// Exact client name.
    pub client: Option<String>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceFilter {
    fn accepts(&self, invoice: &Invoice) -> bool {
        self.search.as_deref().map_or(true, |q| matches_search(invoice, q))
            && self.client.as_deref().map_or(true, |c| matches_client(invoice, c))
            && self.status.map_or(true, |s| invoice.status == s)
    }
}

/// Repository for invoices.
#[derive(Clone)]
pub struct InvoiceRepository {
    data: SharedDataset,
    prefix: String,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository numbering with `prefix`.
    pub fn new(data: SharedDataset, prefix: String) -> Self {
        InvoiceRepository { data, prefix }
    }

    /// Invoices matching `filter`, newest first.
    pub async fn list(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>> {
        if let Some(search) = filter.search.as_deref() {
            validate_search_query(search)?;
        }

        let data = self.data.read().await;
        let mut invoices: Vec<Invoice> = data
            .invoices
            .iter()
            .filter(|i| filter.accepts(i))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.number.cmp(&a.number)));

        debug!(count = invoices.len(), filter = ?filter, "Listed invoices");
        Ok(invoices)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Invoice> {
        let data = self.data.read().await;
        find(&data.invoices, id).cloned()
    }

    /// Summary over the invoices matching `filter`.
    pub async fn summary(&self, filter: &InvoiceFilter) -> StoreResult<InvoiceSummary> {
        Ok(summarize(&self.list(filter).await?))
    }

    /// Issues an invoice: next number of the year, total from the lines.
    pub async fn create(&self, new: NewInvoice) -> StoreResult<Invoice> {
        validate_client_name(&new.client_name)?;
        for line in &new.lines {
            validate_line_quantity(line.quantity)?;
            validate_price(line.unit_price.units())?;
        }

        let mut data = self.data.write().await;
        let number = next_invoice_number(
            data.invoices.iter().map(|i| i.number.as_str()),
            &self.prefix,
            new.date.year(),
        );

        let invoice = Invoice {
            id: new_id(),
            number,
            date: new.date,
            client_name: new.client_name.trim().to_string(),
            source: new.source,
            total: invoice_total(&new.lines),
            lines: new.lines,
            status: InvoiceStatus::Issued,
        };
        data.invoices.push(invoice.clone());

        info!(number = %invoice.number, total = %invoice.total, "Invoice issued");
        Ok(invoice)
    }

    /// Marks an invoice paid, cancelled or issued again.
    pub async fn set_status(&self, id: &str, status: InvoiceStatus) -> StoreResult<Invoice> {
        let mut data = self.data.write().await;
        let invoice = find_mut(&mut data.invoices, id)?;
        invoice.status = status;

        info!(number = %invoice.number, status = %status, "Invoice status changed");
        Ok(invoice.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
