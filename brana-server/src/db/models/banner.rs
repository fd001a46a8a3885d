//! Banner Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type BannerId = RecordId;

fn default_true() -> bool {
    true
}

/// Homepage hero banner (`banner` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<BannerId>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub button_link: String,
    /// Display position, ascending
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create banner payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerCreate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub button_link: String,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_i64::deserialize")]
    pub order: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Update banner payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub button_link: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_option_i64::deserialize")]
    pub order: Option<i64>,
    pub is_active: Option<bool>,
}

impl Banner {
    pub fn from_create(data: BannerCreate, now: i64) -> Self {
        Self {
            id: None,
            title: data.title.trim().to_string(),
            subtitle: data.subtitle,
            description: data.description,
            image: data.image.trim().to_string(),
            button_link: data.button_link,
            order: clamp_order(data.order.unwrap_or(0)),
            is_active: data.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, data: BannerUpdate, now: i64) {
        if let Some(title) = data.title {
            self.title = title.trim().to_string();
        }
        if let Some(subtitle) = data.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(description) = data.description {
            self.description = description;
        }
        if let Some(image) = data.image {
            self.image = image.trim().to_string();
        }
        if let Some(button_link) = data.button_link {
            self.button_link = button_link;
        }
        if let Some(order) = data.order {
            self.order = clamp_order(order);
        }
        if let Some(is_active) = data.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}

fn clamp_order(order: i64) -> i32 {
    order.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
