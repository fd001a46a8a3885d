//! Cart API Handlers

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::order::{to_decimal, to_f64};
use shared::models::{MAX_QUANTITY, line_subtotal};
use shared::util::eq_ignore_case;

use crate::api::AppJson;
use crate::core::ServerState;
use crate::db::models::serde_helpers;
use crate::db::models::{OrderItemInput, Product, resolve_items};
use crate::db::repository::ProductRepository;
use crate::services::whatsapp::{CheckoutContact, CheckoutLink, build_checkout_link};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// One cart line as kept by the storefront
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(default)]
    pub product_id: String,
    /// Variant name, e.g. `Small / Red`
    pub variant: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_i64::deserialize")]
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub unit_price: f64,
    pub quantity: i64,
    pub subtotal: f64,
    /// Units left for this product or variant
    pub stock: i64,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<QuoteLine>,
    /// Units across available lines
    pub item_count: i64,
    /// Sum of available line subtotals
    pub total: f64,
}

impl QuoteLine {
    fn unavailable(line: &CartLine, quantity: i64, reason: &str) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: String::new(),
            variant: line.variant.clone(),
            image: None,
            unit_price: 0.0,
            quantity,
            subtotal: 0.0,
            stock: 0,
            available: false,
            reason: Some(reason.to_string()),
        }
    }
}

fn out_of_range(message: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, message)
}

/// Price one line against the stored product
///
/// 指定变体时用变体价格和库存，否则用商品的当前售价 (促销价优先)
fn price_line(product: &Product, line: &CartLine, quantity: i64) -> AppResult<QuoteLine> {
    let variant_name = line
        .variant
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let (unit_price, stock, image) = match variant_name {
        Some(name) => {
            let Some(variant) = product
                .variants
                .iter()
                .find(|v| eq_ignore_case(&v.name, name))
            else {
                let mut out = QuoteLine::unavailable(line, quantity, "Variant not found");
                out.name = product.name.clone();
                return Ok(out);
            };
            let image = variant
                .images
                .first()
                .or(product.images.first())
                .map(|img| img.url.clone());
            (variant.price, variant.stock, image)
        }
        None => (
            product.effective_price(),
            product.stock,
            product.images.first().map(|img| img.url.clone()),
        ),
    };

    let available = stock >= quantity;
    let subtotal = line_subtotal(unit_price, quantity)
        .ok_or_else(|| out_of_range(format!("{} subtotal is out of range", product.name)))?;

    Ok(QuoteLine {
        product_id: product
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| line.product_id.clone()),
        name: product.name.clone(),
        variant: variant_name.map(str::to_string),
        image,
        unit_price,
        quantity,
        subtotal: to_f64(subtotal),
        stock,
        available,
        reason: (!available).then(|| "Not enough stock".to_string()),
    })
}

/// POST /api/cart/quote
///
/// 找不到的商品作为不可用行返回，不报错
pub async fn quote(
    State(state): State<ServerState>,
    AppJson(lines): AppJson<Vec<CartLine>>,
) -> AppResult<Json<CartQuote>> {
    let repo = ProductRepository::new(state.get_db());
    let mut quoted = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let quantity = line.quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(out_of_range(format!("lines[{}].quantity must be positive", i)));
        }
        if quantity > MAX_QUANTITY {
            return Err(out_of_range(format!(
                "lines[{}].quantity must not exceed {}",
                i, MAX_QUANTITY
            )));
        }

        // 非法 id 与不存在的商品一样处理
        let product = match repo.find_by_id(&line.product_id).await {
            Ok(found) => found,
            Err(crate::db::repository::RepoError::Database(e)) => {
                return Err(AppError::database(e));
            }
            Err(_) => None,
        };

        quoted.push(match product {
            Some(product) => price_line(&product, line, quantity)?,
            None => QuoteLine::unavailable(line, quantity, "Product not found"),
        });
    }

    let available = || quoted.iter().filter(|l| l.available);
    let total = available()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(to_decimal(l.subtotal)))
        .ok_or_else(|| out_of_range("Cart total is out of range"))?;
    let item_count = available()
        .try_fold(0i64, |acc, l| acc.checked_add(l.quantity))
        .ok_or_else(|| out_of_range("Cart item count is out of range"))?;

    Ok(Json(CartQuote {
        total: to_f64(total),
        item_count,
        lines: quoted,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// POST /api/checkout/whatsapp - 只生成链接，不保存订单
pub async fn whatsapp_checkout(
    State(state): State<ServerState>,
    AppJson(req): AppJson<CheckoutRequest>,
) -> AppResult<Json<CheckoutLink>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    let items = resolve_items(req.items).map_err(AppError::validation)?;

    let note = req.note.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let link = build_checkout_link(
        &state.config.whatsapp_number,
        &state.config.store_name,
        &items,
        &CheckoutContact {
            name: req.name.trim(),
            phone: req.phone.trim(),
            note,
        },
    );
    Ok(Json(link))
}
