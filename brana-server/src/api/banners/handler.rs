//! Banner API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::util::now_millis;

use crate::api::AppJson;
use crate::core::ServerState;
use crate::db::models::{Banner, BannerCreate, BannerUpdate};
use crate::db::repository::{BannerRepository, RepoError};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, repo_error};

fn banner_error(err: RepoError) -> AppError {
    repo_error(err, ErrorCode::BannerNotFound, ErrorCode::AlreadyExists)
}

#[derive(Debug, Default, Deserialize)]
pub struct BannerQuery {
    /// `true` 只返回启用的横幅
    pub active: Option<bool>,
}

/// GET /api/banners - 按 order 升序
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<BannerQuery>,
) -> AppResult<Json<Vec<Banner>>> {
    let repo = BannerRepository::new(state.get_db());
    let banners = repo.find_all(query.active.unwrap_or(false)).await?;
    Ok(Json(banners))
}

/// GET /api/banners/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Banner>> {
    let repo = BannerRepository::new(state.get_db());
    let banner = repo
        .find_by_id(&id)
        .await
        .map_err(banner_error)?
        .ok_or_else(|| AppError::new(ErrorCode::BannerNotFound))?;
    Ok(Json(banner))
}

/// POST /api/banners - title 与 image 必填
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<BannerCreate>,
) -> AppResult<Json<Banner>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&payload.image, "image", MAX_URL_LEN)?;
    if payload.subtitle.len() > MAX_NAME_LEN || payload.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation("subtitle or description is too long"));
    }

    let repo = BannerRepository::new(state.get_db());
    let created = repo
        .create(Banner::from_create(payload, now_millis()))
        .await
        .map_err(banner_error)?;
    tracing::info!(banner = %created.title, order = created.order, "Banner created");
    Ok(Json(created))
}

/// PATCH /api/banners/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<BannerUpdate>,
) -> AppResult<Json<Banner>> {
    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    if let Some(image) = &payload.image {
        validate_required_text(image, "image", MAX_URL_LEN)?;
    }
    validate_optional_text(&payload.subtitle, "subtitle", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = BannerRepository::new(state.get_db());
    let updated = repo
        .update(&id, payload, now_millis())
        .await
        .map_err(banner_error)?;
    Ok(Json(updated))
}

/// DELETE /api/banners/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let repo = BannerRepository::new(state.get_db());
    let deleted = repo.delete(&id).await.map_err(banner_error)?;
    tracing::info!(banner = %deleted.title, "Banner deleted");
    Ok(Json(ApiResponse::success_with_message(
        "Banner deleted",
        deleted,
    )))
}
