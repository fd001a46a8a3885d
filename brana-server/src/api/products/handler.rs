//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{MAX_PRODUCT_IMAGES, ProductVariant, VariantAttribute};
use shared::util::now_millis;

use crate::api::AppJson;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::models::serde_helpers;
use crate::db::repository::{BannerRepository, ProductFilter, ProductRepository, RepoError};
use crate::services::image_store::{spawn_image_cleanup, unreferenced_images};
use crate::services::variants::generate_variants;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_amount, validate_count,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, repo_error};

fn product_error(err: RepoError) -> AppError {
    repo_error(err, ErrorCode::ProductNotFound, ErrorCode::ProductNameExists)
}

/// 校验完整商品 (创建后 / 合并更新后)
fn validate_product(product: &Product) -> AppResult<()> {
    validate_required_text(&product.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&product.category, "category", MAX_NAME_LEN)?;
    if product.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "description is too long (max {MAX_NOTE_LEN})"
        )));
    }
    validate_amount(product.price, "price")?;
    validate_count(product.stock, "stock")?;

    if product.images.len() > MAX_PRODUCT_IMAGES {
        return Err(AppError::with_message(
            ErrorCode::ProductTooManyImages,
            format!("A product can have at most {} images", MAX_PRODUCT_IMAGES),
        ));
    }
    if product.images.iter().any(|img| img.url.len() > MAX_URL_LEN) {
        return Err(AppError::validation("image url is too long"));
    }
    if product.tags.iter().any(|t| t.len() > MAX_SHORT_TEXT_LEN) {
        return Err(AppError::validation("tag is too long"));
    }

    if let Some(previous) = product.previous_price {
        validate_amount(previous, "previousPrice")?;
    }
    if product.is_deal {
        let deal = product.deal_price.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductInvalidPrice,
                "dealPrice is required when isDeal is true",
            )
        })?;
        validate_amount(deal, "dealPrice")?;
        if deal >= product.price {
            return Err(AppError::with_message(
                ErrorCode::ProductInvalidPrice,
                "dealPrice must be lower than price",
            ));
        }
    }

    for variant in &product.variants {
        validate_amount(variant.price, "variants.price")?;
        validate_count(variant.stock, "variants.stock")?;
    }
    Ok(())
}

/// GET /api/products - 商品列表 (新的在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    Ok(Json(repo.find_filtered(&filter).await?))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(product_error)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    if payload.price.is_none() {
        return Err(AppError::required("price"));
    }

    let product = Product::from_create(payload, now_millis());
    validate_product(&product)?;

    let repo = ProductRepository::new(state.get_db());
    let created = repo.create(product).await.map_err(product_error)?;

    tracing::info!(
        product = %created.name,
        stock = created.stock,
        "Product created"
    );
    Ok(Json(created))
}

/// PATCH /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let mut merged = repo
        .find_by_id(&id)
        .await
        .map_err(product_error)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let now = now_millis();
    merged.apply_update(payload.clone(), now);
    validate_product(&merged)?;

    let updated = repo
        .update(&id, payload, now)
        .await
        .map_err(product_error)?;
    Ok(Json(updated))
}

/// DELETE /api/products/{id}
///
/// 图片在后台任务里尽力删除，失败只记日志
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let deleted = repo.delete(&id).await.map_err(product_error)?;

    let urls = deleted.image_urls();
    if !urls.is_empty() {
        // 其他商品、变体或横幅还在用的图片不删
        let mut in_use: Vec<String> = repo
            .find_all()
            .await?
            .iter()
            .flat_map(Product::image_urls)
            .collect();
        in_use.extend(
            BannerRepository::new(state.get_db())
                .find_all(false)
                .await?
                .into_iter()
                .map(|b| b.image),
        );
        let orphaned = unreferenced_images(urls, in_use);
        spawn_image_cleanup(state.image_store(), orphaned);
    }

    tracing::info!(product = %deleted.name, "Product deleted");
    Ok(Json(ApiResponse::success_with_message(
        "Product deleted",
        deleted,
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    #[serde(default)]
    pub attributes: Vec<VariantAttribute>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub base_price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_i64::deserialize")]
    pub base_stock: Option<i64>,
}

/// POST /api/products/variants - 按属性生成变体 (不落库)
pub async fn variants(
    AppJson(req): AppJson<VariantRequest>,
) -> AppResult<Json<Vec<ProductVariant>>> {
    let base_price = req.base_price.unwrap_or(0.0);
    let base_stock = req.base_stock.unwrap_or(0);
    validate_amount(base_price, "basePrice")?;
    validate_count(base_stock, "baseStock")?;

    Ok(Json(generate_variants(
        &req.attributes,
        base_price,
        base_stock,
    )))
}
