//! Order value types

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Fulfilment status of one order line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::str::FromStr for OrderItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order item status: {}", other)),
        }
    }
}

/// Upper bound for a unit price or any stored amount
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Upper bound for a line quantity
pub const MAX_QUANTITY: i64 = 100_000;

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub status: OrderItemStatus,
}

impl OrderItem {
    /// `price × quantity`, computed in decimal; `None` on overflow
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        line_subtotal(self.price, self.quantity)
    }

    /// Saturating variant for aggregates over already-stored lines
    pub fn subtotal(&self) -> Decimal {
        self.checked_subtotal().unwrap_or(Decimal::MAX)
    }
}

/// `price × quantity` in decimal; `None` on overflow
pub fn line_subtotal(price: f64, quantity: i64) -> Option<Decimal> {
    to_decimal(price).checked_mul(Decimal::from(quantity))
}

/// Convert an f64 amount into Decimal (non-finite values become zero)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum of line-item subtotals; `None` on overflow
pub fn checked_items_total(items: &[OrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.checked_subtotal()?))
}

/// Sum of line-item subtotals, saturating at `Decimal::MAX`
pub fn items_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::subtotal).fold(Decimal::ZERO, saturating_add)
}

/// Overflow-safe accumulator for money sums
pub fn saturating_add(acc: Decimal, value: Decimal) -> Decimal {
    acc.checked_add(value).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i64) -> OrderItem {
        OrderItem {
            name: "Romper".to_string(),
            price,
            quantity,
            status: OrderItemStatus::Pending,
        }
    }

    #[test]
    fn test_subtotal_is_exact() {
        // 0.1 * 3 is 0.30000000000000004 in f64
        assert_eq!(to_f64(item(0.1, 3).subtotal()), 0.3);
        assert_eq!(to_f64(item(4500.0, 2).subtotal()), 9000.0);
    }

    #[test]
    fn test_items_total() {
        let items = vec![item(1200.5, 2), item(300.0, 1)];
        assert_eq!(to_f64(items_total(&items)), 2701.0);
        assert_eq!(to_f64(items_total(&[])), 0.0);
    }

    #[test]
    fn test_overflow_is_reported_not_panicking() {
        let huge = item(1e20, i64::MAX);
        assert!(huge.checked_subtotal().is_none());
        assert_eq!(huge.subtotal(), Decimal::MAX);

        let items = vec![huge.clone(), item(100.0, 1)];
        assert!(checked_items_total(&items).is_none());
        assert_eq!(items_total(&items), Decimal::MAX);
    }

    #[test]
    fn test_capped_lines_never_overflow() {
        let items = vec![item(MAX_AMOUNT, MAX_QUANTITY); 1000];
        let total = checked_items_total(&items).unwrap();
        assert_eq!(to_f64(total), MAX_AMOUNT * MAX_QUANTITY as f64 * 1000.0);
    }

    #[test]
    fn test_status_default_and_serde() {
        let parsed: OrderItem =
            serde_json::from_str(r#"{"name":"Bib","price":500,"quantity":1}"#).unwrap();
        assert_eq!(parsed.status, OrderItemStatus::Pending);
        assert_eq!(
            serde_json::to_string(&OrderItemStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
