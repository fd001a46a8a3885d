//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Catalog
pub mod banner;
pub mod category;
pub mod product;

// Orders
pub mod order;

// Auth
pub mod user;

// Re-exports
pub use banner::BannerRepository;
pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::{ProductFilter, ProductRepository};
pub use user::{NewUser, UserRepository};

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: parse_record_id("product", "product:abc") 或裸 key "abc"
//   - 获取表名: id.table()
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Parse an id for `table`; a bare key is accepted, another table's id is not
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepoError::Validation("ID is required".to_string()));
    }
    if !id.contains(':') {
        return Ok(RecordId::from_table_key(table, id));
    }
    let thing: RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
    if thing.table() != table {
        return Err(RepoError::NotFound(format!("{} not found", id)));
    }
    Ok(thing)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// `count()` over a whole table
    pub async fn count(&self, table: &str) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: i64,
        }
        let rows: Vec<Count> = self
            .db
            .query("SELECT count() AS count FROM type::table($tb) GROUP ALL")
            .bind(("tb", table.to_string()))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Remove every record of a table
    pub async fn wipe(&self, table: &str) -> RepoResult<()> {
        self.db
            .query("DELETE type::table($tb)")
            .bind(("tb", table.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        let id = parse_record_id("product", "product:abc").unwrap();
        assert_eq!(id.table(), "product");
        assert_eq!(id.to_string(), "product:abc");

        let bare = parse_record_id("product", "abc").unwrap();
        assert_eq!(bare.table(), "product");

        assert!(matches!(
            parse_record_id("product", "user:abc"),
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(
            parse_record_id("product", " "),
            Err(RepoError::Validation(_))
        ));
    }
}
