//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{ProductImage, ProductVariant, StockStatus};
use shared::util::eq_ignore_case;
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Product record (`product` table)
///
/// `status` mirrors `stock` and is rewritten on every create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub status: StockStatus,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub is_deal: bool,
    #[serde(default)]
    pub deal_price: Option<f64>,
    #[serde(default)]
    pub previous_price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create product payload
///
/// Numeric fields accept numbers or numeric strings (admin form input).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_i64::deserialize")]
    pub stock: Option<i64>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub is_deal: bool,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub deal_price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub previous_price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// Update product payload (all optional)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_i64::deserialize")]
    pub stock: Option<i64>,
    pub images: Option<Vec<ProductImage>>,
    pub is_deal: Option<bool>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub deal_price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_f64::deserialize")]
    pub previous_price: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub variants: Option<Vec<ProductVariant>>,
}

impl Product {
    /// Build a new record from a validated create payload
    pub fn from_create(data: ProductCreate, now: i64) -> Self {
        let stock = data.stock.unwrap_or(0);
        let mut product = Self {
            id: None,
            name: data.name.trim().to_string(),
            description: data.description,
            category: data.category.trim().to_string(),
            price: data.price.unwrap_or(0.0),
            stock,
            status: StockStatus::from_stock(stock),
            images: data.images,
            is_deal: data.is_deal,
            deal_price: data.deal_price,
            previous_price: data.previous_price,
            tags: normalize_tags(data.tags),
            variants: data.variants,
            created_at: now,
            updated_at: now,
        };
        product.clear_deal_if_off();
        product
    }

    /// Apply a partial update; `status` follows the resulting stock
    pub fn apply_update(&mut self, data: ProductUpdate, now: i64) {
        if let Some(name) = data.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = data.description {
            self.description = description;
        }
        if let Some(category) = data.category {
            self.category = category.trim().to_string();
        }
        if let Some(price) = data.price {
            self.price = price;
        }
        if let Some(stock) = data.stock {
            self.stock = stock;
        }
        if let Some(images) = data.images {
            self.images = images;
        }
        if let Some(is_deal) = data.is_deal {
            self.is_deal = is_deal;
        }
        if data.deal_price.is_some() {
            self.deal_price = data.deal_price;
        }
        if data.previous_price.is_some() {
            self.previous_price = data.previous_price;
        }
        if let Some(tags) = data.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(variants) = data.variants {
            self.variants = variants;
        }

        self.status = StockStatus::from_stock(self.stock);
        self.clear_deal_if_off();
        self.updated_at = now;
    }

    /// Price the storefront charges (deal price while on deal)
    pub fn effective_price(&self) -> f64 {
        match (self.is_deal, self.deal_price) {
            (true, Some(deal)) => deal,
            _ => self.price,
        }
    }

    /// Every hosted image url, including variant images
    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .iter()
            .chain(self.variants.iter().flat_map(|v| v.images.iter()))
            .map(|img| img.url.clone())
            .collect()
    }

    fn clear_deal_if_off(&mut self) {
        if !self.is_deal {
            self.deal_price = None;
        }
    }
}

/// Trim, drop blanks, dedupe case-insensitively (first spelling wins)
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| eq_ignore_case(t, tag)) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
