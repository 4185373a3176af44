//! # Export
//!
//! CSV files and printable HTML documents built from any list of records
//! implementing [`Tabular`].
//!
//! ## Formats
//! ```text
//! CSV   \u{FEFF}number,client,total\n
//!       NAS-2025-0001,"Rabe, Andry",45000\n
//!       └── BOM for spreadsheet apps; fields with , " or newline are quoted
//!
//! HTML  <h1>title</h1> export date, <table> of headers and rows, footer
//!       └── every cell escaped
//! ```

use chrono::NaiveDateTime;

use crate::error::{CoreError, CoreResult};
use crate::types::{Client, Event, Invoice, MenuItem, Reservation, StockItem, StockMovement};

/// Byte order mark prefixed to CSV output.
pub const UTF8_BOM: char = '\u{FEFF}';

/// Footer line of printed documents.
pub const PRINT_FOOTER: &str = "NAS CONNECT - Back-office management system";

/// A record that can be laid out as one row of a table.
pub trait Tabular {
    /// Column titles, in row order.
    fn headers() -> Vec<&'static str>;

    /// Cell values. Absent values are empty strings.
    fn row(&self) -> Vec<String>;
}

// =============================================================================
// CSV
// =============================================================================

/// Quotes a field containing a comma, a quote or a line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| csv_field(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders records as CSV. Empty input is refused with `NothingToExport`.
pub fn to_csv<T: Tabular>(records: &[T]) -> CoreResult<String> {
    if records.is_empty() {
        return Err(CoreError::NothingToExport);
    }

    let mut out = String::new();
    out.push(UTF8_BOM);
    out.push_str(&csv_line(&T::headers()));
    for record in records {
        out.push('\n');
        out.push_str(&csv_line(&record.row()));
    }
    Ok(out)
}

// =============================================================================
// HTML
// =============================================================================

/// Escapes `& < > " '`.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders records as a standalone printable HTML page.
pub fn to_html<T: Tabular>(
    title: &str,
    records: &[T],
    exported_at: NaiveDateTime,
) -> CoreResult<String> {
    if records.is_empty() {
        return Err(CoreError::NothingToExport);
    }

    let title = escape_html(title);
    let head: String = T::headers()
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();
    let body: String = records
        .iter()
        .map(|r| {
            let cells: String = r
                .row()
                .iter()
                .map(|c| format!("<td>{}</td>", escape_html(c)))
                .collect();
            format!("<tr>{}</tr>\n", cells)
        })
        .collect();

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\
         body{{font-family:sans-serif;margin:24px}}\
         table{{border-collapse:collapse;width:100%}}\
         th,td{{border:1px solid #ccc;padding:6px;text-align:left}}\
         th{{background:#f3f3f3}}\
         footer{{margin-top:24px;color:#666;font-size:12px}}\
         </style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n\
         <p>Export date: {date}</p>\n\
         <table>\n<thead><tr>{head}</tr></thead>\n<tbody>\n{body}</tbody>\n</table>\n\
         <footer>{footer}</footer>\n\
         </body>\n</html>\n",
        title = title,
        date = exported_at.format("%Y-%m-%d %H:%M"),
        head = head,
        body = body,
        footer = escape_html(PRINT_FOOTER),
    ))
}

// =============================================================================
// Row Layouts
// =============================================================================

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Tabular for Client {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "phone", "email", "dietaryPreferences"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.phone.clone(),
            opt(&self.email),
            opt(&self.dietary_preferences),
        ]
    }
}

impl Tabular for Reservation {
    fn headers() -> Vec<&'static str> {
        vec![
            "id", "kind", "clientId", "roomId", "tableId", "start", "end", "timeSlot",
            "partySize", "status", "notes",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.kind.to_string(),
            opt(&self.client_id),
            opt(&self.room_id),
            opt(&self.table_id),
            self.start.format("%Y-%m-%d %H:%M").to_string(),
            self.end
                .map(|e| e.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            self.time_slot
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            self.party_size.map(|p| p.to_string()).unwrap_or_default(),
            self.status.to_string(),
            opt(&self.notes),
        ]
    }
}

impl Tabular for Invoice {
    fn headers() -> Vec<&'static str> {
        vec!["number", "date", "client", "source", "lines", "total", "status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.number.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            self.client_name.clone(),
            self.source.to_string(),
            self.lines.len().to_string(),
            self.total.units().to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for StockItem {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "family", "subCategory", "unit", "quantity", "minThreshold", "level"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.family.to_string(),
            self.sub_category.to_string(),
            self.unit.to_string(),
            self.quantity.to_string(),
            self.min_threshold.to_string(),
            crate::rules::stock::level_of(self).to_string(),
        ]
    }
}

impl Tabular for StockMovement {
    fn headers() -> Vec<&'static str> {
        vec!["id", "productId", "kind", "quantity", "note", "createdAt", "userId"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.product_id.clone(),
            self.kind.to_string(),
            self.quantity.to_string(),
            opt(&self.note),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
            opt(&self.user_id),
        ]
    }
}

impl Tabular for MenuItem {
    fn headers() -> Vec<&'static str> {
        vec!["id", "category", "name", "price", "enabled", "variants"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.category_id.clone(),
            self.name.clone(),
            self.price.units().to_string(),
            self.enabled.to_string(),
            self.variants
                .iter()
                .map(|v| format!("{} (+{})", v.name, v.price_delta.units()))
                .collect::<Vec<_>>()
                .join("; "),
        ]
    }
}

impl Tabular for Event {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "date", "hours", "expectedGuests", "contact", "status", "type", "notes"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            self.hours.to_string(),
            self.expected_guests.to_string(),
            self.contact.clone(),
            self.status.map(|s| s.to_string()).unwrap_or_default(),
            self.event_type.map(|t| t.to_string()).unwrap_or_default(),
            opt(&self.notes),
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
