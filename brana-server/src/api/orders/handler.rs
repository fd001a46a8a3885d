//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::checked_items_total;
use shared::models::order::to_f64;
use shared::util::now_millis;

use crate::api::AppJson;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderUpdate, resolve_items};
use crate::db::repository::{OrderRepository, RepoError};
use crate::services::customers::normalize_phone;
use crate::services::whatsapp::{CheckoutContact, build_checkout_link};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, repo_error};

fn order_error(err: RepoError) -> AppError {
    repo_error(err, ErrorCode::OrderNotFound, ErrorCode::AlreadyExists)
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    /// 按手机号筛选 (忽略空格、横线等格式)
    pub phone: Option<String>,
}

/// 下单结果: 订单 + WhatsApp 跳转链接
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order: Order,
    pub whatsapp_url: String,
    pub message: String,
}

/// POST /api/orders - 店面结账
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<OrderCreate>,
) -> AppResult<Json<OrderCreated>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    let items = resolve_items(payload.items).map_err(AppError::validation)?;
    // 金额在写库前算好，溢出直接拒绝
    let total = checked_items_total(&items).ok_or_else(|| {
        AppError::with_message(ErrorCode::ValueOutOfRange, "Order total is out of range")
    })?;

    let now = now_millis();
    let note = payload
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let order = Order {
        id: None,
        name: payload.name.trim().to_string(),
        phone: payload.phone.trim().to_string(),
        items,
        note,
        created_at: now,
        updated_at: now,
    };

    let repo = OrderRepository::new(state.get_db());
    let order = repo.create(order).await?;

    let link = build_checkout_link(
        &state.config.whatsapp_number,
        &state.config.store_name,
        &order.items,
        &CheckoutContact {
            name: &order.name,
            phone: &order.phone,
            note: order.note.as_deref(),
        },
    );

    tracing::info!(
        order_id = %order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        items = order.items.len(),
        total = to_f64(total),
        "Order placed"
    );

    Ok(Json(OrderCreated {
        order,
        whatsapp_url: link.whatsapp_url,
        message: link.message,
    }))
}

/// GET /api/orders - 新的在前
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let mut orders = repo.find_all().await?;

    if let Some(phone) = query.phone.as_deref().map(normalize_phone)
        && !phone.is_empty()
    {
        orders.retain(|o| normalize_phone(&o.phone) == phone);
    }
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(order_error)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order))
}

/// PATCH /api/orders/{id}
///
/// `status` 一次性设置所有明细的状态; `items` 整体替换
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<OrderUpdate>,
) -> AppResult<Json<Order>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.phone {
        validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    if payload.items.as_ref().is_some_and(|items| items.is_empty()) {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let repo = OrderRepository::new(state.get_db());
    let updated = repo
        .update(&id, payload, now_millis())
        .await
        .map_err(order_error)?;
    Ok(Json(updated))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let deleted = repo.delete(&id).await.map_err(order_error)?;
    tracing::info!(customer = %deleted.name, "Order deleted");
    Ok(Json(ApiResponse::success_with_message(
        "Order deleted",
        deleted,
    )))
}
