//! # Stock Rules
//!
//! Level classification, reorder suggestions and movement arithmetic.
//!
//! ## Levels
//! ```text
//!   quantity:  0 ─────────── threshold ─────────────►
//!              │◄── out      │◄── low    ok ──►
//!              q <= 0        0 < q <= t   q > t
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{MovementKind, StockItem};

// =============================================================================
// Levels
// =============================================================================

/// Derived stock level of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockLevel {
    Out,
    Low,
    Ok,
}

string_enum!(StockLevel {
    Out => "out",
    Low => "low",
    Ok => "ok",
});

/// Classifies a quantity against its minimum threshold.
///
/// ```rust
/// use nas_core::rules::stock::{classify, StockLevel};
///
/// assert_eq!(classify(0.0, 20.0), StockLevel::Out);
/// assert_eq!(classify(20.0, 20.0), StockLevel::Low);
/// assert_eq!(classify(30.0, 20.0), StockLevel::Ok);
/// ```
pub fn classify(quantity: f64, threshold: f64) -> StockLevel {
    if quantity <= 0.0 {
        StockLevel::Out
    } else if quantity <= threshold {
        StockLevel::Low
    } else {
        StockLevel::Ok
    }
}

/// Level of a stock item.
#[inline]
pub fn level_of(item: &StockItem) -> StockLevel {
    classify(item.quantity, item.min_threshold)
}

/// Items needing attention: out of stock first, then low, each group by name.
pub fn alerts(items: &[StockItem]) -> Vec<&StockItem> {
    let mut flagged: Vec<(StockLevel, &StockItem)> = items
        .iter()
        .map(|item| (level_of(item), item))
        .filter(|(level, _)| *level != StockLevel::Ok)
        .collect();
    flagged.sort_by(|(la, a), (lb, b)| la.cmp(lb).then_with(|| a.name.cmp(&b.name)));
    flagged.into_iter().map(|(_, item)| item).collect()
}

// =============================================================================
// Reorder Suggestions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReorderPriority {
    High,
    Medium,
    Low,
}

string_enum!(ReorderPriority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

/// What to order, and how soon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReorderSuggestion {
    pub product_id: String,
    pub name: String,
    pub level: StockLevel,
    pub priority: ReorderPriority,
    pub suggested_quantity: f64,
    /// Days before the order should be placed. `None` when it cannot be
    /// estimated (zero threshold).
    pub order_within_days: Option<u32>,
}

/// Deterministic reorder heuristic.
///
/// ```text
/// out → high,   order 2 × threshold,          within 0 days
/// low → medium, order threshold − qty + 10,   within 2 days
/// ok  → low,    order threshold,              within ⌊qty / threshold × 7⌋ days
/// ```
pub fn suggest_reorder(item: &StockItem) -> ReorderSuggestion {
    let level = level_of(item);
    let threshold = item.min_threshold;

    let (priority, suggested_quantity, order_within_days) = match level {
        StockLevel::Out => (ReorderPriority::High, 2.0 * threshold, Some(0)),
        StockLevel::Low => (
            ReorderPriority::Medium,
            threshold - item.quantity + 10.0,
            Some(2),
        ),
        StockLevel::Ok => {
            let days = if threshold > 0.0 {
                Some((item.quantity / threshold * 7.0).floor() as u32)
            } else {
                None
            };
            (ReorderPriority::Low, threshold, days)
        }
    };

    ReorderSuggestion {
        product_id: item.id.clone(),
        name: item.name.clone(),
        level,
        priority,
        suggested_quantity,
        order_within_days,
    }
}

// =============================================================================
// Movements
// =============================================================================

/// Quantity after applying a movement.
///
/// - purchase: adds `amount`
/// - consumption: subtracts `amount`, refused below zero
/// - adjustment: adds the signed `amount`, clamped at zero
pub fn apply_movement(item: &StockItem, kind: MovementKind, amount: f64) -> CoreResult<f64> {
    match kind {
        MovementKind::Purchase => Ok(item.quantity + amount),
        MovementKind::Consumption => {
            if amount > item.quantity {
                return Err(CoreError::InsufficientStock {
                    name: item.name.clone(),
                    available: item.quantity,
                    requested: amount,
                });
            }
            Ok(item.quantity - amount)
        }
        MovementKind::Adjustment => Ok((item.quantity + amount).max(0.0)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StockFamily, StockSubCategory, StockUnit};

    fn item(name: &str, quantity: f64, threshold: f64) -> StockItem {
        StockItem {
            id: format!("s-{}", name),
            name: name.to_string(),
            family: StockFamily::Restaurant,
            sub_category: StockSubCategory::Kitchen,
            unit: StockUnit::Kg,
            quantity,
            min_threshold: threshold,
            photo_url: None,
        }
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.0, 0.0), StockLevel::Out);
        assert_eq!(classify(0.0, 10.0), StockLevel::Out);
        assert_eq!(classify(-2.0, 10.0), StockLevel::Out);
        assert_eq!(classify(0.5, 10.0), StockLevel::Low);
        assert_eq!(classify(10.0, 10.0), StockLevel::Low);
        assert_eq!(classify(10.5, 10.0), StockLevel::Ok);
        assert_eq!(classify(1.0, 0.0), StockLevel::Ok);
    }

    #[test]
    fn test_alerts_order() {
        let items = vec![
            item("Riz", 18.0, 15.0),
            item("Savon", 10.0, 15.0),
            item("Shampooing", 0.0, 10.0),
            item("Huile", 3.0, 5.0),
        ];
        let names: Vec<&str> = alerts(&items).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Shampooing", "Huile", "Savon"]);
    }

    #[test]
    fn test_reorder_suggestions() {
        let out = suggest_reorder(&item("Shampooing", 0.0, 10.0));
        assert_eq!(out.priority, ReorderPriority::High);
        assert_eq!(out.suggested_quantity, 20.0);
        assert_eq!(out.order_within_days, Some(0));

        let low = suggest_reorder(&item("Savon", 10.0, 15.0));
        assert_eq!(low.priority, ReorderPriority::Medium);
        assert_eq!(low.suggested_quantity, 15.0);
        assert_eq!(low.order_within_days, Some(2));

        let ok = suggest_reorder(&item("Draps", 30.0, 20.0));
        assert_eq!(ok.priority, ReorderPriority::Low);
        assert_eq!(ok.suggested_quantity, 20.0);
        assert_eq!(ok.order_within_days, Some(10));

        let unbounded = suggest_reorder(&item("Sel", 5.0, 0.0));
        assert_eq!(unbounded.order_within_days, None);
    }

    #[test]
    fn test_apply_movement() {
        let riz = item("Riz", 18.0, 15.0);
        assert_eq!(apply_movement(&riz, MovementKind::Purchase, 2.0).unwrap(), 20.0);
        assert_eq!(apply_movement(&riz, MovementKind::Consumption, 18.0).unwrap(), 0.0);
        assert_eq!(apply_movement(&riz, MovementKind::Adjustment, -3.0).unwrap(), 15.0);
        assert_eq!(apply_movement(&riz, MovementKind::Adjustment, -30.0).unwrap(), 0.0);

        let err = apply_movement(&riz, MovementKind::Consumption, 20.0).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { requested, .. } if requested == 20.0));
    }
}
