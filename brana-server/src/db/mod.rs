//! Database Module
//!
//! Embedded SurrealDB (RocksDB on disk, in-memory for tests)

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Tables and indexes; statements are idempotent
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
DEFINE TABLE IF NOT EXISTS banner SCHEMALESS;
DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS order_phone ON TABLE orders FIELDS phone;
DEFINE INDEX IF NOT EXISTS product_category ON TABLE product FIELDS category;
"#;

/// Database service, owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) a RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str, namespace: &str, database: &str) -> Result<Self, AppError> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::database(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_path, "Database connection established (SurrealDB RocksDB)");

        Self::prepare(db, namespace, database).await
    }

    /// In-memory database (tests, demos)
    pub async fn memory(namespace: &str, database: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        tracing::info!("Database connection established (SurrealDB in-memory)");

        Self::prepare(db, namespace, database).await
    }

    async fn prepare(db: Surreal<Db>, namespace: &str, database: &str) -> Result<Self, AppError> {
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}
