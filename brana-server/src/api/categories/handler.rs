//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::CategoryStatus;
use shared::util::now_millis;

use crate::api::AppJson;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::{CategoryRepository, ProductRepository, RepoError};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, repo_error};

fn category_error(err: RepoError) -> AppError {
    repo_error(err, ErrorCode::CategoryNotFound, ErrorCode::CategoryNameExists)
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub featured: Option<bool>,
    pub status: Option<CategoryStatus>,
}

/// GET /api/categories - 按名称排序
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_filtered(query.featured, query.status).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await
        .map_err(category_error)?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(Json(category))
}

/// POST /api/categories
///
/// 未提供 slug 时由名称生成; productCount 按现有商品计算
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.slug, "slug", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.color, "color", MAX_SHORT_TEXT_LEN)?;
    if payload.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "description is too long (max {MAX_NOTE_LEN})"
        )));
    }

    let mut category = Category::from_create(payload, now_millis());
    let products = ProductRepository::new(state.get_db()).find_all().await?;
    category.product_count = products
        .iter()
        .filter(|p| category.matches(&p.category))
        .count() as i64;

    let repo = CategoryRepository::new(state.get_db());
    let created = repo.create(category).await.map_err(category_error)?;
    tracing::info!(category = %created.name, slug = %created.slug, "Category created");
    Ok(Json(created))
}

/// PATCH /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.slug, "slug", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = CategoryRepository::new(state.get_db());
    let updated = repo
        .update(&id, payload, now_millis())
        .await
        .map_err(category_error)?;
    Ok(Json(updated))
}

/// DELETE /api/categories/{id}
///
/// 商品的 category 是自由文本，删除分类不影响商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let deleted = repo.delete(&id).await.map_err(category_error)?;
    tracing::info!(category = %deleted.name, "Category deleted");
    Ok(Json(ApiResponse::success_with_message(
        "Category deleted",
        deleted,
    )))
}

/// POST /api/categories/recount - 重新统计每个分类的商品数
pub async fn recount(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let products = ProductRepository::new(state.get_db()).find_all().await?;
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.recount(&products).await?;
    tracing::info!(
        categories = categories.len(),
        products = products.len(),
        "Category counts recomputed"
    );
    Ok(Json(categories))
}
