//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductUpdate};
use shared::models::StockStatus;
use shared::util::{contains_ignore_case, eq_ignore_case};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

/// Storefront list filters (`GET /api/products?...`)
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive match on the product's category
    pub category: Option<String>,
    /// Case-insensitive substring of name, description or a tag
    pub search: Option<String>,
    pub status: Option<StockStatus>,
    /// `true` keeps only products on deal
    pub deal: Option<bool>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = non_blank(&self.category)
            && !eq_ignore_case(product.category.trim(), category)
        {
            return false;
        }
        if let Some(search) = non_blank(&self.search) {
            let hit = contains_ignore_case(&product.name, search)
                || contains_ignore_case(&product.description, search)
                || product.tags.iter().any(|t| contains_ignore_case(t, search));
            if !hit {
                return false;
            }
        }
        if let Some(status) = self.status
            && product.status != status
        {
            return false;
        }
        if self.deal == Some(true) && !product.is_deal {
            return false;
        }
        if let Some(tag) = non_blank(&self.tag)
            && !product.tags.iter().any(|t| eq_ignore_case(t, tag))
        {
            return false;
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Products matching `filter`, newest first
    pub async fn find_filtered(&self, filter: &ProductFilter) -> RepoResult<Vec<Product>> {
        let products = self
            .find_all()
            .await?
            .into_iter()
            .filter(|p| filter.matches(p));
        Ok(match filter.limit {
            Some(limit) => products.take(limit).collect(),
            None => products.collect(),
        })
    }

    /// Products with `stock <= threshold`, lowest stock first
    pub async fn find_low_stock(&self, threshold: i64) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE stock <= $threshold ORDER BY stock ASC, name ASC")
            .bind(("threshold", threshold))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Products currently on deal
    pub async fn find_deals(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE isDeal = true ORDER BY updatedAt DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Find product by name, ignoring case
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let name_lower = name.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE string::lowercase(name) = $name LIMIT 1")
            .bind(("name", name_lower))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Insert a new product; the name must be unique ignoring case
    pub async fn create(&self, mut product: Product) -> RepoResult<Product> {
        if self.find_by_name(&product.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                product.name
            )));
        }

        product.id = None;
        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Apply a partial update; renames are checked against other products
    pub async fn update(&self, id: &str, data: ProductUpdate, now: i64) -> RepoResult<Product> {
        let thing = parse_record_id(TABLE, id)?;
        let mut product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && let Some(other) = self.find_by_name(new_name).await?
            && other.id.as_ref() != Some(&thing)
        {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                new_name.trim()
            )));
        }

        product.apply_update(data, now);
        product.id = None;

        let updated: Option<Product> = self.base.db().update(thing).content(product).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete; returns the removed record so its images can be cleaned up
    pub async fn delete(&self, id: &str) -> RepoResult<Product> {
        let thing = parse_record_id(TABLE, id)?;
        let deleted: Option<Product> = self.base.db().delete(thing).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count(TABLE).await
    }

    /// Remove every product (seed route)
    pub async fn delete_all(&self) -> RepoResult<()> {
        self.base.wipe(TABLE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ProductCreate;

    fn product(json: &str) -> Product {
        let data: ProductCreate = serde_json::from_str(json).unwrap();
        Product::from_create(data, 1)
    }

    #[test]
    fn test_filter_category_and_search() {
        let p = product(
            r#"{"name":"Denim Dungarees","description":"Soft cotton","category":"Boys","price":1,"stock":2,"tags":["Denim"]}"#,
        );

        let f = ProductFilter {
            category: Some("boys".to_string()),
            ..Default::default()
        };
        assert!(f.matches(&p));

        let f = ProductFilter {
            search: Some("COTTON".to_string()),
            ..Default::default()
        };
        assert!(f.matches(&p));

        let f = ProductFilter {
            search: Some("tutu".to_string()),
            ..Default::default()
        };
        assert!(!f.matches(&p));

        let f = ProductFilter {
            category: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(f.matches(&p));
    }

    #[test]
    fn test_filters_fold_non_ascii_case() {
        let p = product(
            r#"{"name":"Pijama ALGODÓN","category":"Niñas","price":1,"stock":2,"tags":["Été"]}"#,
        );

        let f = ProductFilter {
            category: Some("NIÑAS".to_string()),
            tag: Some("ÉTÉ".to_string()),
            search: Some("algodón".to_string()),
            ..Default::default()
        };
        assert!(f.matches(&p));
    }

    #[test]
    fn test_filter_status_deal_tag() {
        let p = product(r#"{"name":"Tutu","category":"Girls","price":1,"stock":0,"tags":["party"]}"#);

        let f = ProductFilter {
            status: Some(StockStatus::OutOfStock),
            tag: Some("Party".to_string()),
            ..Default::default()
        };
        assert!(f.matches(&p));

        let f = ProductFilter {
            deal: Some(true),
            ..Default::default()
        };
        assert!(!f.matches(&p));

        let f = ProductFilter {
            status: Some(StockStatus::InStock),
            ..Default::default()
        };
        assert!(!f.matches(&p));
    }
}
