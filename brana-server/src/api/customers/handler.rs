//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::util::now_millis;

use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::services::customers::{
    Customer, CustomerTier, aggregate_customers, normalize_phone, orders_for_phone,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    /// Bronze / Silver / Gold / VIP (忽略大小写)
    pub tier: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    pub customer: Customer,
    /// 新的在前
    pub orders: Vec<Order>,
}

/// GET /api/admin/customers - 按累计消费降序
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let tier = match query.tier.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => Some(t.parse::<CustomerTier>().map_err(AppError::validation)?),
        None => None,
    };

    let orders = OrderRepository::new(state.get_db()).find_all().await?;
    let mut customers = aggregate_customers(&orders, now_millis());
    if let Some(tier) = tier {
        customers.retain(|c| c.tier == tier);
    }
    Ok(Json(customers))
}

/// GET /api/admin/customers/{phone}
pub async fn get_by_phone(
    State(state): State<ServerState>,
    Path(phone): Path<String>,
) -> AppResult<Json<CustomerDetail>> {
    let orders = OrderRepository::new(state.get_db()).find_all().await?;
    let matched: Vec<Order> = orders_for_phone(&orders, &phone)
        .into_iter()
        .cloned()
        .collect();

    let key = normalize_phone(&phone);
    let customer = aggregate_customers(&matched, now_millis())
        .into_iter()
        .find(|c| normalize_phone(&c.phone) == key)
        .ok_or_else(|| AppError::not_found(format!("Customer {}", phone)))?;

    Ok(Json(CustomerDetail {
        customer,
        orders: matched,
    }))
}
