//! Category Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::CategoryStatus;
use shared::util::{eq_ignore_case, slugify};
use surrealdb::RecordId;

pub type CategoryId = RecordId;

fn default_color() -> String {
    "#F472B6".to_string()
}

/// Category record (`category` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: CategoryStatus,
    #[serde(default)]
    pub age_groups: Vec<String>,
    #[serde(default = "default_color")]
    pub color: String,
    /// Denormalized; refreshed by recount
    #[serde(default)]
    pub product_count: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: CategoryStatus,
    #[serde(default)]
    pub age_groups: Vec<String>,
    pub color: Option<String>,
}

/// Update category payload (all optional, single-field toggles allowed)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<CategoryStatus>,
    pub age_groups: Option<Vec<String>>,
    pub color: Option<String>,
}

impl Category {
    pub fn from_create(data: CategoryCreate, now: i64) -> Self {
        let name = data.name.trim().to_string();
        let slug = match data.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => slugify(s),
            _ => slugify(&name),
        };
        Self {
            id: None,
            name,
            slug,
            description: data.description,
            icon: data.icon,
            featured: data.featured,
            status: data.status,
            age_groups: data.age_groups,
            color: data.color.unwrap_or_else(default_color),
            product_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, data: CategoryUpdate, now: i64) {
        if let Some(name) = data.name {
            self.name = name.trim().to_string();
        }
        if let Some(slug) = data.slug {
            let slug = slug.trim();
            self.slug = if slug.is_empty() {
                slugify(&self.name)
            } else {
                slugify(slug)
            };
        }
        if let Some(description) = data.description {
            self.description = description;
        }
        if let Some(icon) = data.icon {
            self.icon = icon;
        }
        if let Some(featured) = data.featured {
            self.featured = featured;
        }
        if let Some(status) = data.status {
            self.status = status;
        }
        if let Some(age_groups) = data.age_groups {
            self.age_groups = age_groups;
        }
        if let Some(color) = data.color {
            self.color = color;
        }
        self.updated_at = now;
    }

    /// Whether a product's free-text category refers to this category
    pub fn matches(&self, product_category: &str) -> bool {
        let c = product_category.trim();
        eq_ignore_case(c, &self.name) || eq_ignore_case(c, &self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_derived_from_name() {
        let c: CategoryCreate = serde_json::from_str(r#"{"name":"Baby Girls"}"#).unwrap();
        let c = Category::from_create(c, 1);
        assert_eq!(c.slug, "baby-girls");
        assert_eq!(c.status, CategoryStatus::Active);
        assert!(!c.featured);
    }

    #[test]
    fn test_toggle_featured() {
        let c: CategoryCreate = serde_json::from_str(r#"{"name":"Shoes"}"#).unwrap();
        let mut c = Category::from_create(c, 1);
        c.apply_update(
            CategoryUpdate {
                featured: Some(true),
                ..Default::default()
            },
            2,
        );
        assert!(c.featured);
        assert_eq!(c.name, "Shoes");
        assert_eq!(c.updated_at, 2);
    }

    #[test]
    fn test_matches_name_or_slug() {
        let c: CategoryCreate = serde_json::from_str(r#"{"name":"Baby Girls"}"#).unwrap();
        let c = Category::from_create(c, 1);
        assert!(c.matches("baby girls"));
        assert!(c.matches("BABY-GIRLS"));
        assert!(!c.matches("Boys"));

        let c: CategoryCreate = serde_json::from_str(r#"{"name":"Niñas"}"#).unwrap();
        assert!(Category::from_create(c, 1).matches("NIÑAS"));
    }
}
