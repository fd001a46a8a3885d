//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{MAX_AMOUNT, MAX_QUANTITY, OrderItem, OrderItemStatus, checked_items_total};
use surrealdb::RecordId;

pub type OrderId = RecordId;

/// Storefront order (`orders` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Line item as posted by the storefront cart
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_i64::deserialize")]
    pub quantity: Option<i64>,
    pub status: Option<OrderItemStatus>,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub note: Option<String>,
}

/// Update order payload
///
/// `status` sets every line item's status at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
    pub status: Option<OrderItemStatus>,
}

impl OrderItemInput {
    /// Resolve into a stored line item, or describe what is wrong with it
    pub fn into_item(self, index: usize) -> Result<OrderItem, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(format!("items[{}].name is required", index));
        }
        let price = self
            .price
            .ok_or_else(|| format!("items[{}].price is required", index))?;
        if !price.is_finite() || price < 0.0 {
            return Err(format!("items[{}].price must not be negative", index));
        }
        if price > MAX_AMOUNT {
            return Err(format!("items[{}].price must not exceed {}", index, MAX_AMOUNT));
        }
        let quantity = self.quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(format!("items[{}].quantity must be positive", index));
        }
        if quantity > MAX_QUANTITY {
            return Err(format!(
                "items[{}].quantity must not exceed {}",
                index, MAX_QUANTITY
            ));
        }
        Ok(OrderItem {
            name: name.to_string(),
            price,
            quantity,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Resolve a posted item list; an empty list is rejected
pub fn resolve_items(items: Vec<OrderItemInput>) -> Result<Vec<OrderItem>, String> {
    if items.is_empty() {
        return Err("Order must contain at least one item".to_string());
    }
    let items = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| item.into_item(i))
        .collect::<Result<Vec<_>, _>>()?;
    if checked_items_total(&items).is_none() {
        return Err("Order total is out of range".to_string());
    }
    Ok(items)
}

impl Order {
    /// Sum of line subtotals
    pub fn total(&self) -> f64 {
        shared::models::order::to_f64(shared::models::items_total(&self.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(json: &str) -> Vec<OrderItemInput> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_resolve_items() {
        let resolved =
            resolve_items(items(r#"[{"name":"Romper","price":"4500","quantity":2}]"#)).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].price, 4500.0);
        assert_eq!(resolved[0].quantity, 2);
        assert_eq!(resolved[0].status, OrderItemStatus::Pending);
    }

    #[test]
    fn test_resolve_items_rejects_bad_lines() {
        assert!(resolve_items(vec![]).is_err());
        assert!(resolve_items(items(r#"[{"name":"A","price":1,"quantity":0}]"#)).is_err());
        assert!(resolve_items(items(r#"[{"name":"A","price":-1,"quantity":1}]"#)).is_err());
        assert!(resolve_items(items(r#"[{"name":" ","price":1,"quantity":1}]"#)).is_err());
        assert!(resolve_items(items(r#"[{"name":"A","quantity":1}]"#)).is_err());
    }

    #[test]
    fn test_resolve_items_caps_price_and_quantity() {
        let huge = r#"[{"name":"A","price":1e20,"quantity":9223372036854775807}]"#;
        let err = resolve_items(items(huge)).unwrap_err();
        assert!(err.contains("price"), "{err}");
        assert!(
            resolve_items(items(r#"[{"name":"A","price":10,"quantity":100001}]"#))
                .unwrap_err()
                .contains("quantity")
        );
        assert!(resolve_items(items(r#"[{"name":"A","price":1e9,"quantity":100000}]"#)).is_ok());
    }

    #[test]
    fn test_total() {
        let order = Order {
            id: None,
            name: "Ada".to_string(),
            phone: "0801".to_string(),
            items: resolve_items(items(
                r#"[{"name":"A","price":0.1,"quantity":3},{"name":"B","price":1000,"quantity":1}]"#,
            ))
            .unwrap(),
            note: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(order.total(), 1000.3);
    }
}
