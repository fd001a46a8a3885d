//! Banner Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Banner, BannerUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "banner";

#[derive(Clone)]
pub struct BannerRepository {
    base: BaseRepository,
}

impl BannerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All banners by display order (`order` is a reserved word, sorted here)
    pub async fn find_all(&self, active_only: bool) -> RepoResult<Vec<Banner>> {
        let mut banners: Vec<Banner> = self
            .base
            .db()
            .query("SELECT * FROM banner")
            .await?
            .take(0)?;
        if active_only {
            banners.retain(|b| b.is_active);
        }
        banners.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
        Ok(banners)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Banner>> {
        let thing = parse_record_id(TABLE, id)?;
        let banner: Option<Banner> = self.base.db().select(thing).await?;
        Ok(banner)
    }

    pub async fn create(&self, mut banner: Banner) -> RepoResult<Banner> {
        banner.id = None;
        let created: Option<Banner> = self.base.db().create(TABLE).content(banner).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create banner".to_string()))
    }

    pub async fn update(&self, id: &str, data: BannerUpdate, now: i64) -> RepoResult<Banner> {
        let thing = parse_record_id(TABLE, id)?;
        let mut banner = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Banner {} not found", id)))?;

        banner.apply_update(data, now);
        banner.id = None;

        let updated: Option<Banner> = self.base.db().update(thing).content(banner).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Banner {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Banner> {
        let thing = parse_record_id(TABLE, id)?;
        let deleted: Option<Banner> = self.base.db().delete(thing).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Banner {} not found", id)))
    }

    /// Remove every banner (seed route)
    pub async fn delete_all(&self) -> RepoResult<()> {
        self.base.wipe(TABLE).await
    }
}
