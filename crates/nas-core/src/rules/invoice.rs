//! # Invoice Rules
//!
//! Totals, numbering, search and summary figures.
//!
//! ## Numbering
//! ```text
//! PREFIX-YYYY-NNNN      NAS-2025-0001, NAS-2025-0002, ... NAS-2026-0001
//!   │     │    └── sequence, restarts every year
//!   │     └── year of the invoice date
//!   └── settings.invoice_prefix
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Invoice, InvoiceLine, InvoiceSource, InvoiceStatus};

/// Sum of `quantity × unit_price` over the lines. Empty is zero.
///
/// ```rust
/// use nas_core::money::Money;
/// use nas_core::rules::invoice::invoice_total;
/// use nas_core::types::InvoiceLine;
///
/// let lines = vec![InvoiceLine {
///     description: "Lunch".into(),
///     quantity: 3,
///     unit_price: Money::from_units(15_000),
/// }];
/// assert_eq!(invoice_total(&lines), Money::from_units(45_000));
/// assert_eq!(invoice_total(&[]), Money::zero());
/// ```
pub fn invoice_total(lines: &[InvoiceLine]) -> Money {
    lines.iter().map(InvoiceLine::line_total).sum()
}

// =============================================================================
// Numbering
// =============================================================================

/// Formats `PREFIX-YYYY-NNNN`.
pub fn format_invoice_number(prefix: &str, year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", prefix, year, sequence)
}

/// Extracts the sequence of a number issued with `prefix` in `year`.
fn sequence_of(number: &str, prefix: &str, year: i32) -> Option<u32> {
    let rest = number.strip_prefix(prefix)?.strip_prefix('-')?;
    let (y, seq) = rest.split_once('-')?;
    if y.parse::<i32>().ok()? != year {
        return None;
    }
    seq.parse().ok()
}

/// Next free number for `year`, after the highest one already issued.
pub fn next_invoice_number<'a, I>(existing: I, prefix: &str, year: i32) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let last = existing
        .into_iter()
        .filter_map(|n| sequence_of(n, prefix, year))
        .max()
        .unwrap_or(0);
    format_invoice_number(prefix, year, last + 1)
}

// =============================================================================
// Search
// =============================================================================

/// Case-insensitive match of `query` on client name or invoice number.
/// An empty query matches everything.
pub fn matches_search(invoice: &Invoice, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || invoice.client_name.to_lowercase().contains(&query)
        || invoice.number.to_lowercase().contains(&query)
}

/// Exact (case-insensitive) client-name filter.
pub fn matches_client(invoice: &Invoice, client_name: &str) -> bool {
    invoice.client_name.trim().eq_ignore_ascii_case(client_name.trim())
}

// =============================================================================
// Summary
// =============================================================================

/// Figures shown above the invoice list. Cancelled invoices are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceSummary {
    pub count: usize,
    pub total_invoiced: Money,
    pub total_paid: Money,
    pub outstanding: Money,
}

pub fn summarize<'a, I>(invoices: I) -> InvoiceSummary
where
    I: IntoIterator<Item = &'a Invoice>,
{
    invoices
        .into_iter()
        .fold(InvoiceSummary::default(), |mut acc, invoice| {
            match invoice.status {
                InvoiceStatus::Cancelled => return acc,
                InvoiceStatus::Paid => acc.total_paid += invoice.total,
                InvoiceStatus::Issued => acc.outstanding += invoice.total,
            }
            acc.count += 1;
            acc.total_invoiced += invoice.total;
            acc
        })
}

// =============================================================================
// Revenue Report
// =============================================================================

/// Revenue of one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SourceRevenue {
    pub source: InvoiceSource,
    pub revenue: Money,
}

/// Invoiced revenue per source, one row for every source (lodging,
/// restaurant, event) even when it has no invoice. Cancelled invoices are
/// left out, as in [`summarize`].
pub fn revenue_by_source<'a, I>(invoices: I) -> Vec<SourceRevenue>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let counted: Vec<&Invoice> = invoices
        .into_iter()
        .filter(|i| i.status != InvoiceStatus::Cancelled)
        .collect();

    InvoiceSource::ALL
        .iter()
        .map(|&source| SourceRevenue {
            source,
            revenue: counted
                .iter()
                .filter(|i| i.source == source)
                .map(|i| i.total)
                .sum(),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(qty: i64, price: i64) -> InvoiceLine {
        InvoiceLine {
            description: "x".to_string(),
            quantity: qty,
            unit_price: Money::from_units(price),
        }
    }

    fn invoice(number: &str, client: &str, total: i64, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: number.to_lowercase(),
            number: number.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            client_name: client.to_string(),
            source: InvoiceSource::Restaurant,
            lines: vec![line(1, total)],
            total: Money::from_units(total),
            status,
        }
    }

    #[test]
    fn test_total_is_order_independent() {
        let a = vec![line(3, 15_000), line(2, 80_000), line(1, 500)];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(invoice_total(&a), Money::from_units(205_500));
        assert_eq!(invoice_total(&a), invoice_total(&b));
    }

    #[test]
    fn test_numbering() {
        assert_eq!(format_invoice_number("NAS", 2025, 7), "NAS-2025-0007");

        let existing = ["NAS-2025-0001", "NAS-2025-0002", "NAS-2024-0040", "OLD-2025-0099"];
        assert_eq!(
            next_invoice_number(existing.iter().copied(), "NAS", 2025),
            "NAS-2025-0003"
        );
        assert_eq!(
            next_invoice_number(existing.iter().copied(), "NAS", 2026),
            "NAS-2026-0001"
        );
        assert_eq!(next_invoice_number(std::iter::empty(), "NAS", 2025), "NAS-2025-0001");
    }

    #[test]
    fn test_search() {
        let inv = invoice("NAS-2025-0001", "Rabe Andry", 45_000, InvoiceStatus::Issued);
        assert!(matches_search(&inv, ""));
        assert!(matches_search(&inv, "rabe"));
        assert!(matches_search(&inv, "2025-0001"));
        assert!(!matches_search(&inv, "hanitra"));
        assert!(matches_client(&inv, " rabe andry "));
        assert!(!matches_client(&inv, "Rabe"));
    }

    #[test]
    fn test_summary() {
        let invoices = vec![
            invoice("NAS-2025-0001", "Rabe Andry", 45_000, InvoiceStatus::Issued),
            invoice("NAS-2025-0002", "Hanitra Solo", 160_000, InvoiceStatus::Paid),
            invoice("NAS-2025-0003", "Hanitra Solo", 10_000, InvoiceStatus::Cancelled),
        ];
        let summary = summarize(&invoices);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_invoiced, Money::from_units(205_000));
        assert_eq!(summary.total_paid, Money::from_units(160_000));
        assert_eq!(summary.outstanding, Money::from_units(45_000));
    }

    #[test]
    fn test_revenue_by_source() {
        let mut stay = invoice("NAS-2025-0002", "Hanitra Solo", 160_000, InvoiceStatus::Paid);
        stay.source = InvoiceSource::Lodging;
        let invoices = vec![
            invoice("NAS-2025-0001", "Rabe Andry", 45_000, InvoiceStatus::Issued),
            stay,
            invoice("NAS-2025-0003", "Rabe Andry", 12_000, InvoiceStatus::Paid),
            invoice("NAS-2025-0004", "Rabe Andry", 99_000, InvoiceStatus::Cancelled),
        ];

        let report = revenue_by_source(&invoices);
        let rows: Vec<(InvoiceSource, i64)> =
            report.iter().map(|r| (r.source, r.revenue.units())).collect();
        assert_eq!(
            rows,
            vec![
                (InvoiceSource::Lodging, 160_000),
                (InvoiceSource::Restaurant, 57_000),
                (InvoiceSource::Event, 0),
            ]
        );
    }
}
