//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderUpdate, resolve_items};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Store a new order
    pub async fn create(&self, mut order: Order) -> RepoResult<Order> {
        order.id = None;
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Update customer fields, replace items, or set every item's status
    pub async fn update(&self, id: &str, data: OrderUpdate, now: i64) -> RepoResult<Order> {
        let thing = parse_record_id(TABLE, id)?;
        let mut order = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if let Some(name) = data.name {
            order.name = name.trim().to_string();
        }
        if let Some(phone) = data.phone {
            order.phone = phone.trim().to_string();
        }
        if let Some(note) = data.note {
            let note = note.trim();
            order.note = (!note.is_empty()).then(|| note.to_string());
        }
        if let Some(items) = data.items {
            order.items = resolve_items(items).map_err(RepoError::Validation)?;
        }
        if let Some(status) = data.status {
            for item in order.items.iter_mut() {
                item.status = status;
            }
        }
        order.updated_at = now;
        order.id = None;

        let updated: Option<Order> = self.base.db().update(thing).content(order).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Order> {
        let thing = parse_record_id(TABLE, id)?;
        let deleted: Option<Order> = self.base.db().delete(thing).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count(TABLE).await
    }
}
