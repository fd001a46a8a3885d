//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserPatch, normalize_email};
use shared::models::{UserRole, UserStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

/// Fields of a new account; `password` is plain text and hashed here
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub permissions: Vec<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All users, oldest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY createdAt ASC")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", normalize_email(email)))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: NewUser, now: i64) -> RepoResult<User> {
        let email = normalize_email(&data.email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                email
            )));
        }

        let password = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    password = $password,
                    role = $role,
                    status = $status,
                    permissions = $permissions,
                    lastLoginAt = NONE,
                    createdAt = $now,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name.trim().to_string()))
            .bind(("email", email))
            .bind(("password", password))
            .bind(("role", data.role))
            .bind(("status", data.status))
            .bind(("permissions", data.permissions))
            .bind(("now", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Merge a patch into a user; `patch.password` must already be hashed
    pub async fn update(&self, id: &str, mut patch: UserPatch) -> RepoResult<User> {
        let thing = parse_record_id(TABLE, id)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("User {} not found", id)));
        }

        if let Some(ref email) = patch.email {
            let email = normalize_email(email);
            if let Some(other) = self.find_by_email(&email).await?
                && other.id.as_ref() != Some(&thing)
            {
                return Err(RepoError::Duplicate(format!(
                    "Email '{}' already registered",
                    email
                )));
            }
            patch.email = Some(email);
        }

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", patch))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Stamp `lastLoginAt`
    pub async fn record_login(&self, id: &str, now: i64) -> RepoResult<()> {
        let thing = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET lastLoginAt = $now")
            .bind(("thing", thing))
            .bind(("now", now))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<User> {
        let thing = parse_record_id(TABLE, id)?;
        let deleted: Option<User> = self.base.db().delete(thing).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count(TABLE).await
    }
}
