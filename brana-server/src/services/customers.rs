//! Customer aggregation
//!
//! 顾客不单独存储：按 (规范化) 手机号聚合订单得到。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::order::{to_decimal, to_f64};
use shared::models::{OrderItemStatus, items_total, saturating_add};
use std::collections::{BTreeMap, HashMap};

use crate::db::models::Order;

/// 30 天，毫秒
const MONTH_MILLIS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Spend thresholds (inclusive)
pub const VIP_THRESHOLD: f64 = 500_000.0;
pub const GOLD_THRESHOLD: f64 = 200_000.0;
pub const SILVER_THRESHOLD: f64 = 50_000.0;

/// Customer segment derived from total spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomerTier {
    Bronze,
    Silver,
    Gold,
    #[serde(rename = "VIP")]
    Vip,
}

impl CustomerTier {
    pub fn from_total_spent(total: f64) -> Self {
        if total >= VIP_THRESHOLD {
            Self::Vip
        } else if total >= GOLD_THRESHOLD {
            Self::Gold
        } else if total >= SILVER_THRESHOLD {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Vip => "VIP",
        }
    }
}

impl std::str::FromStr for CustomerTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "vip" => Ok(Self::Vip),
            other => Err(format!("unknown tier: {}", other)),
        }
    }
}

/// Synthesized customer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Name on the most recent order
    pub name: String,
    /// Normalized phone, the grouping key
    pub phone: String,
    pub order_count: usize,
    pub total_spent: f64,
    pub average_order_value: f64,
    pub first_order_at: i64,
    pub last_order_at: i64,
    /// Orders per 30-day month since the first order
    pub frequency: f64,
    pub is_returning: bool,
    pub tier: CustomerTier,
}

/// Strip whitespace and `-` `.` `(` `)` from a phone number
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
        .collect()
}

/// Group orders by normalized phone; highest spend first
pub fn aggregate_customers(orders: &[Order], now: i64) -> Vec<Customer> {
    let mut groups: HashMap<String, Vec<&Order>> = HashMap::new();
    for order in orders {
        let phone = normalize_phone(&order.phone);
        if phone.is_empty() {
            continue;
        }
        groups.entry(phone).or_default().push(order);
    }

    let mut customers: Vec<Customer> = groups
        .into_iter()
        .map(|(phone, orders)| summarize(phone, &orders, now))
        .collect();

    customers.sort_by(|a, b| {
        b.total_spent
            .total_cmp(&a.total_spent)
            .then(b.last_order_at.cmp(&a.last_order_at))
            .then(a.phone.cmp(&b.phone))
    });
    customers
}

fn summarize(phone: String, orders: &[&Order], now: i64) -> Customer {
    let order_count = orders.len();
    let total: Decimal = orders
        .iter()
        .map(|o| items_total(&o.items))
        .fold(Decimal::ZERO, saturating_add);
    let first_order_at = orders.iter().map(|o| o.created_at).min().unwrap_or(now);
    let last_order_at = orders.iter().map(|o| o.created_at).max().unwrap_or(now);
    let name = orders
        .iter()
        .max_by_key(|o| o.created_at)
        .map(|o| o.name.trim().to_string())
        .unwrap_or_default();

    let average = if order_count > 0 {
        total / Decimal::from(order_count as u64)
    } else {
        Decimal::ZERO
    };

    let span_months = ((now - first_order_at).max(0) as f64 / MONTH_MILLIS as f64).max(1.0);
    let frequency = to_f64(to_decimal(order_count as f64 / span_months));

    let total_spent = to_f64(total);
    Customer {
        name,
        phone,
        order_count,
        total_spent,
        average_order_value: to_f64(average),
        first_order_at,
        last_order_at,
        frequency,
        is_returning: order_count > 1,
        tier: CustomerTier::from_total_spent(total_spent),
    }
}

/// Orders belonging to a (normalized) phone, newest first
pub fn orders_for_phone<'a>(orders: &'a [Order], phone: &str) -> Vec<&'a Order> {
    let phone = normalize_phone(phone);
    let mut matched: Vec<&Order> = orders
        .iter()
        .filter(|o| !phone.is_empty() && normalize_phone(&o.phone) == phone)
        .collect();
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matched
}

/// Customers per tier, every tier present
pub fn tier_distribution(customers: &[Customer]) -> BTreeMap<CustomerTier, usize> {
    let mut dist = BTreeMap::from([
        (CustomerTier::Bronze, 0),
        (CustomerTier::Silver, 0),
        (CustomerTier::Gold, 0),
        (CustomerTier::Vip, 0),
    ]);
    for c in customers {
        *dist.entry(c.tier).or_default() += 1;
    }
    dist
}

/// Revenue over line items that were not cancelled
pub fn revenue(orders: &[Order]) -> f64 {
    let total: Decimal = orders
        .iter()
        .flat_map(|o| o.items.iter())
        .filter(|i| i.status != OrderItemStatus::Cancelled)
        .map(|i| i.subtotal())
        .fold(Decimal::ZERO, saturating_add);
    to_f64(total)
}
