//! # Validation Module
//!
//! Input validation for the back-office forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI parsing (clap)                                           │
//! │  ├── Argument presence and primitive types                             │
//! │  └── Enum names (roles, statuses, units)                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field lengths, ranges, formats                                    │
//! │  └── Stay dates, party size, quantities                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business rules (crate::rules)                                │
//! │  ├── Slot conflicts, overlapping stays                                 │
//! │  └── Status transitions, stock levels                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nas_core::validation::{validate_party_size, validate_client_name};
//!
//! validate_client_name("Rabe Andry").unwrap();
//! validate_party_size(4).unwrap();
//! assert!(validate_party_size(0).is_err());
//! ```

use chrono::NaiveDateTime;

use crate::error::ValidationError;
use crate::{MAX_GRACE_MINUTES, MAX_ORDER_QUANTITY, MAX_PARTY_SIZE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a client name (required, at most 120 characters).
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 120)
}

/// Validates a display name for rooms, menu items, stock items and events.
pub fn validate_label(field: &str, value: &str) -> ValidationResult<()> {
    validate_text(field, value, 200)
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Digits, spaces, `+`, `-`, `.` and parentheses only
/// - At least 6 digits
///
/// ## Example
/// ```rust
/// use nas_core::validation::validate_phone;
///
/// assert!(validate_phone("032 11 111 11").is_ok());
/// assert!(validate_phone("+261 33 22 222 22").is_ok());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_text("phone", phone, 30)?;

    if !phone
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '.' | '(' | ')'))
    {
        return Err(ValidationError::invalid_format(
            "phone",
            "must contain only digits, spaces and + - . ( )",
        ));
    }

    if phone.chars().filter(|c| c.is_ascii_digit()).count() < 6 {
        return Err(ValidationError::invalid_format(
            "phone",
            "must contain at least 6 digits",
        ));
    }

    Ok(())
}

/// Validates an optional email address. Empty input counts as absent.
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    let valid = email
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        })
        .unwrap_or(false);

    if !valid || email.contains(char::is_whitespace) {
        return Err(ValidationError::invalid_format("email", "must look like name@domain.tld"));
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query string. Empty means "no filter".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an invoice number prefix: 1 to 10 ASCII letters or digits.
pub fn validate_invoice_prefix(prefix: &str) -> ValidationResult<()> {
    validate_text("invoice prefix", prefix, 10)?;

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::invalid_format(
            "invoice prefix",
            "must contain only letters and digits",
        ));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a dining party size (1 to MAX_PARTY_SIZE).
pub fn validate_party_size(size: u32) -> ValidationResult<()> {
    if size == 0 || size > MAX_PARTY_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "party size".to_string(),
            min: 1,
            max: i64::from(MAX_PARTY_SIZE),
        });
    }

    Ok(())
}

/// Validates the quantity of an order line.
///
/// ## User Workflow
/// ```text
/// Waiter enters: 2 × Romazava
///      │
///      ▼
/// validate_order_quantity(2) ← THIS FUNCTION
///      │
///      ├── qty == 0?  → Error: "quantity must be positive"
///      ├── qty > 99?  → Error: "quantity must be between 1 and 99"
///      └── OK → order line created as `entered`
/// ```
pub fn validate_order_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ORDER_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a stock quantity or threshold (finite, not negative).
pub fn validate_stock_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::invalid_format(field, "must be a number"));
    }

    if amount < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the amount of a stock movement (finite, strictly positive).
///
/// Adjustments carry their sign separately and are checked with
/// [`validate_adjustment`].
pub fn validate_movement_amount(amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "movement quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a signed adjustment (finite, not zero).
pub fn validate_adjustment(delta: f64) -> ValidationResult<()> {
    if !delta.is_finite() || delta == 0.0 {
        return Err(ValidationError::invalid_format(
            "adjustment",
            "must be a non-zero number",
        ));
    }

    Ok(())
}

/// Validates a price in currency units.
///
/// Zero is allowed (complimentary items).
pub fn validate_price(units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the quantity of an invoice line.
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "line quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a no-show grace period.
pub fn validate_grace_minutes(minutes: u32) -> ValidationResult<()> {
    if minutes > MAX_GRACE_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: "grace period".to_string(),
            min: 0,
            max: i64::from(MAX_GRACE_MINUTES),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates the dates of a lodging stay. The end, when given, must be
/// strictly after the start.
pub fn validate_stay_dates(
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
) -> ValidationResult<()> {
    if let Some(end) = end {
        if end <= start {
            return Err(ValidationError::invalid_format(
                "end date",
                "must be after the start date",
            ));
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Rabe Andry").is_ok());
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"A".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("032 11 111 11").is_ok());
        assert!(validate_phone("(+261) 34-00.000.00").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12 34").is_err());
        assert!(validate_phone("032 11 abc").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("rabe@example.com")).is_ok());
        assert!(validate_email(Some("rabe@example")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
        assert!(validate_email(Some("ra be@example.com")).is_err());
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(MAX_PARTY_SIZE).is_ok());
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(MAX_PARTY_SIZE + 1).is_err());
    }

    #[test]
    fn test_validate_order_quantity() {
        assert!(validate_order_quantity(1).is_ok());
        assert!(validate_order_quantity(99).is_ok());
        assert!(matches!(
            validate_order_quantity(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_order_quantity(100).is_err());
    }

    #[test]
    fn test_validate_stock_amounts() {
        assert!(validate_stock_amount("quantity", 0.0).is_ok());
        assert!(validate_stock_amount("quantity", 12.5).is_ok());
        assert!(validate_stock_amount("quantity", -1.0).is_err());
        assert!(validate_stock_amount("quantity", f64::NAN).is_err());

        assert!(validate_movement_amount(0.5).is_ok());
        assert!(validate_movement_amount(0.0).is_err());

        assert!(validate_adjustment(-3.0).is_ok());
        assert!(validate_adjustment(0.0).is_err());
    }

    #[test]
    fn test_validate_invoice_prefix() {
        assert!(validate_invoice_prefix("NAS").is_ok());
        assert!(validate_invoice_prefix("").is_err());
        assert!(validate_invoice_prefix("NAS-1").is_err());
        assert!(validate_invoice_prefix("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_validate_stay_dates() {
        let d = |day| {
            NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap()
        };
        assert!(validate_stay_dates(d(1), None).is_ok());
        assert!(validate_stay_dates(d(1), Some(d(3))).is_ok());
        assert!(validate_stay_dates(d(3), Some(d(3))).is_err());
        assert!(validate_stay_dates(d(3), Some(d(1))).is_err());
    }

    #[test]
    fn test_validate_misc() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(0).is_err());
        assert!(validate_grace_minutes(15).is_ok());
        assert!(validate_grace_minutes(MAX_GRACE_MINUTES + 1).is_err());
        assert_eq!(validate_search_query("  rabe ").unwrap(), "rabe");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
