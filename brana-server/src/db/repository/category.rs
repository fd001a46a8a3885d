//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, CategoryUpdate, Product};
use shared::models::CategoryStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Categories filtered by `featured` / `status`
    pub async fn find_filtered(
        &self,
        featured: Option<bool>,
        status: Option<CategoryStatus>,
    ) -> RepoResult<Vec<Category>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|c| featured.is_none_or(|f| c.featured == f))
            .filter(|c| status.is_none_or(|s| c.status == s))
            .collect())
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let thing = parse_record_id(TABLE, id)?;
        let category: Option<Category> = self.base.db().select(thing).await?;
        Ok(category)
    }

    /// Find category by name, ignoring case
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let name_lower = name.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE string::lowercase(name) = $name LIMIT 1")
            .bind(("name", name_lower))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category
    pub async fn create(&self, mut category: Category) -> RepoResult<Category> {
        if self.find_by_name(&category.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                category.name
            )));
        }

        category.id = None;
        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category
    pub async fn update(&self, id: &str, data: CategoryUpdate, now: i64) -> RepoResult<Category> {
        let thing = parse_record_id(TABLE, id)?;
        let mut category = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && let Some(other) = self.find_by_name(new_name).await?
            && other.id.as_ref() != Some(&thing)
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                new_name.trim()
            )));
        }

        category.apply_update(data, now);
        category.id = None;

        let updated: Option<Category> = self.base.db().update(thing).content(category).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Hard delete a category
    pub async fn delete(&self, id: &str) -> RepoResult<Category> {
        let thing = parse_record_id(TABLE, id)?;
        let deleted: Option<Category> = self.base.db().delete(thing).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Recompute every category's `productCount` from the given products
    pub async fn recount(&self, products: &[Product]) -> RepoResult<Vec<Category>> {
        let categories = self.find_all().await?;
        let mut updated = Vec::with_capacity(categories.len());

        for (category, count) in count_products(categories, products) {
            let Some(thing) = category.id.clone() else {
                continue;
            };
            let mut result = self
                .base
                .db()
                .query("UPDATE $thing SET productCount = $count RETURN AFTER")
                .bind(("thing", thing))
                .bind(("count", count))
                .await?;
            if let Some(c) = result.take::<Option<Category>>(0)? {
                updated.push(c);
            }
        }

        tracing::debug!(categories = updated.len(), "Category product counts refreshed");
        Ok(updated)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count(TABLE).await
    }

    /// Remove every category (seed route)
    pub async fn delete_all(&self) -> RepoResult<()> {
        self.base.wipe(TABLE).await
    }
}

/// Pair each category with the number of products that reference it
pub fn count_products(categories: Vec<Category>, products: &[Product]) -> Vec<(Category, i64)> {
    categories
        .into_iter()
        .map(|c| {
            let n = products.iter().filter(|p| c.matches(&p.category)).count() as i64;
            (c, n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CategoryCreate, ProductCreate};

    fn category(name: &str) -> Category {
        let data: CategoryCreate =
            serde_json::from_value(serde_json::json!({ "name": name })).unwrap();
        Category::from_create(data, 1)
    }

    fn product(category: &str) -> Product {
        let data: ProductCreate = serde_json::from_value(serde_json::json!({
            "name": "x", "category": category, "price": 1
        }))
        .unwrap();
        Product::from_create(data, 1)
    }

    #[test]
    fn test_count_products() {
        let products = vec![product("Girls"), product("girls"), product("baby-boys"), product("Toys")];
        let counts = count_products(vec![category("Girls"), category("Baby Boys"), category("Shoes")], &products);
        let counts: Vec<(String, i64)> = counts.into_iter().map(|(c, n)| (c.name, n)).collect();
        assert_eq!(
            counts,
            vec![
                ("Girls".to_string(), 2),
                ("Baby Boys".to_string(), 1),
                ("Shoes".to_string(), 0)
            ]
        );
    }
}
