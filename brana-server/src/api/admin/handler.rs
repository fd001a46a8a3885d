//! Inventory, promotions and dashboard handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::StockStatus;
use shared::util::now_millis;
use std::collections::BTreeMap;

use crate::core::ServerState;
use crate::db::models::Product;
use crate::db::repository::{CategoryRepository, OrderRepository, ProductRepository};
use crate::services::customers::{CustomerTier, aggregate_customers, revenue, tier_distribution};
use crate::utils::validation::validate_count;
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub threshold: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub threshold: i64,
    /// stock <= threshold, lowest first
    pub products: Vec<Product>,
    pub out_of_stock_count: usize,
}

/// GET /api/admin/inventory - 低库存预警
pub async fn inventory(
    State(state): State<ServerState>,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<InventoryReport>> {
    let threshold = query.threshold.unwrap_or(state.config.low_stock_threshold);
    validate_count(threshold, "threshold")?;

    let products = ProductRepository::new(state.get_db())
        .find_low_stock(threshold)
        .await?;
    let out_of_stock_count = products
        .iter()
        .filter(|p| p.status == StockStatus::OutOfStock)
        .count();

    Ok(Json(InventoryReport {
        threshold,
        products,
        out_of_stock_count,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    #[serde(flatten)]
    pub product: Product,
    /// 相对原价的折扣百分比 (整数)
    pub discount_percent: i64,
}

/// 折扣 = (原价 - 促销价) / 原价; 原价优先取 previousPrice
pub fn discount_percent(product: &Product) -> i64 {
    let Some(deal) = product.deal_price else {
        return 0;
    };
    let base = product
        .previous_price
        .filter(|p| *p > 0.0)
        .unwrap_or(product.price);
    if base <= 0.0 || deal >= base {
        return 0;
    }
    ((base - deal) / base * 100.0).round() as i64
}

/// GET /api/admin/promotions - 促销中的商品
pub async fn promotions(State(state): State<ServerState>) -> AppResult<Json<Vec<Promotion>>> {
    let deals = ProductRepository::new(state.get_db()).find_deals().await?;
    let promotions = deals
        .into_iter()
        .map(|product| Promotion {
            discount_percent: discount_percent(&product),
            product,
        })
        .collect();
    Ok(Json(promotions))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub product_count: usize,
    pub category_count: i64,
    pub order_count: usize,
    pub customer_count: usize,
    pub out_of_stock_count: usize,
    pub deal_count: usize,
    /// 未取消明细的金额合计
    pub revenue: f64,
    pub tier_distribution: BTreeMap<CustomerTier, usize>,
}

/// GET /api/admin/dashboard
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<Dashboard>> {
    let products = ProductRepository::new(state.get_db()).find_all().await?;
    let category_count = CategoryRepository::new(state.get_db()).count().await?;
    let orders = OrderRepository::new(state.get_db()).find_all().await?;
    let customers = aggregate_customers(&orders, now_millis());

    Ok(Json(Dashboard {
        product_count: products.len(),
        category_count,
        order_count: orders.len(),
        customer_count: customers.len(),
        out_of_stock_count: products
            .iter()
            .filter(|p| p.status == StockStatus::OutOfStock)
            .count(),
        deal_count: products.iter().filter(|p| p.is_deal).count(),
        revenue: revenue(&orders),
        tier_distribution: tier_distribution(&customers),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(price: f64, deal_price: Option<f64>, previous: Option<f64>) -> Product {
        let mut p: Product = serde_json::from_value(serde_json::json!({
            "name": "Tutu Skirt",
            "category": "Girls",
            "price": price,
            "stock": 3,
            "status": "in-stock",
            "isDeal": true,
        }))
        .unwrap();
        p.deal_price = deal_price;
        p.previous_price = previous;
        p
    }

    #[test]
    fn test_discount_against_price() {
        assert_eq!(discount_percent(&deal(10000.0, Some(7500.0), None)), 25);
    }

    #[test]
    fn test_discount_prefers_previous_price() {
        assert_eq!(discount_percent(&deal(8000.0, Some(6000.0), Some(12000.0))), 50);
    }

    #[test]
    fn test_discount_degenerate_cases() {
        assert_eq!(discount_percent(&deal(8000.0, None, None)), 0);
        assert_eq!(discount_percent(&deal(8000.0, Some(9000.0), None)), 0);
        assert_eq!(discount_percent(&deal(0.0, Some(0.0), None)), 0);
    }
}
