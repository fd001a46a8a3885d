//! Product value types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of images attached to a product
pub const MAX_PRODUCT_IMAGES: usize = 3;

/// Stock status, derived from the stock level and never set directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

impl StockStatus {
    /// `0` (or a negative value) is out of stock, anything positive is in stock
    pub fn from_stock(stock: i64) -> Self {
        if stock > 0 {
            Self::InStock
        } else {
            Self::OutOfStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in-stock",
            Self::OutOfStock => "out-of-stock",
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-stock" => Ok(Self::InStock),
            "out-of-stock" => Ok(Self::OutOfStock),
            other => Err(format!("unknown stock status: {}", other)),
        }
    }
}

/// Image reference hosted on the image store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    /// Media kind, e.g. `image` or `video`
    #[serde(rename = "type", default = "default_image_type")]
    pub kind: String,
}

fn default_image_type() -> String {
    "image".to_string()
}

impl ProductImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: default_image_type(),
        }
    }
}

/// One attribute combination of a product (e.g. Size=Small, Color=Red)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Option values joined in attribute order, e.g. `Small / Red`
    pub name: String,
    /// attribute name -> chosen option
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// Attribute definition used by the variant generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAttribute {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_stock() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(-3), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::InStock);
        assert_eq!(StockStatus::from_stock(250), StockStatus::InStock);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"out-of-stock\""
        );
        let s: StockStatus = serde_json::from_str("\"in-stock\"").unwrap();
        assert_eq!(s, StockStatus::InStock);
        assert_eq!("in-stock".parse::<StockStatus>(), Ok(StockStatus::InStock));
    }

    #[test]
    fn test_image_type_field() {
        let img: ProductImage = serde_json::from_str(r#"{"url":"https://x/a.jpg"}"#).unwrap();
        assert_eq!(img.kind, "image");
        let json = serde_json::to_value(ProductImage::new("u")).unwrap();
        assert_eq!(json["type"], "image");
    }
}
