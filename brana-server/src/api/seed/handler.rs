//! Seed handler

use axum::{Json, extract::State};
use shared::util::now_millis;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::services::seed::{SeedSummary, seed_catalog};
use crate::utils::{ApiResponse, AppResult};

/// POST /api/admin/seed-data
///
/// 清空商品/分类/横幅并写入演示数据，订单与用户保留
pub async fn seed(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<ApiResponse<SeedSummary>>> {
    security_log!(
        "WARN",
        "catalog_reset",
        user_id = current.id.clone(),
        email = current.email.clone()
    );

    let summary = seed_catalog(&state.db, now_millis()).await?;
    tracing::info!(
        products = summary.products,
        categories = summary.categories,
        banners = summary.banners,
        "Demo catalog seeded"
    );

    Ok(Json(ApiResponse::success_with_message(
        "Seed data inserted",
        summary,
    )))
}
