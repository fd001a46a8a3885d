//! User Model (admin accounts)

use std::sync::OnceLock;

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{UserRole, UserStatus};
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

/// Admin user matching the `user` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<UserId>,
    pub name: String,
    /// Stored lowercased
    pub email: String,
    /// argon2 PHC string, never sent to clients
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub last_login_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create user payload (admin-created accounts)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub permissions: Option<Vec<String>>,
}

/// Update user payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub permissions: Option<Vec<String>>,
}

/// Fields written by `UPDATE $thing MERGE $data`; `password` is already hashed
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<i64>,
    pub updated_at: i64,
}

impl User {
    /// "user:xxx"
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| User::hash_password("brana-dummy-password").ok())
        .as_deref()
}

/// 邮箱不存在时也跑一次 argon2，让两种失败耗时一致
pub fn verify_dummy_password(password: &str) {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    if let Some(parsed) = dummy_hash().and_then(|h| PasswordHash::new(h).ok()) {
        let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    }
}

/// Emails compare case-insensitively; stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(hash: String) -> User {
        User {
            id: None,
            name: "Ada".to_string(),
            email: "ada@brana.kids".to_string(),
            password: hash,
            role: UserRole::Admin,
            status: UserStatus::Active,
            permissions: vec!["all".to_string()],
            last_login_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = User::hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        let u = user(hash);
        assert!(u.verify_password("s3cret-pass").unwrap());
        assert!(!u.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_value(user("$argon2id$fake".to_string())).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "admin");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_dummy_hash_is_real_argon2() {
        verify_dummy_password("whatever");
        let hash = dummy_hash().unwrap();
        assert!(hash.starts_with("$argon2"));
        // 同一个缓存值
        assert_eq!(dummy_hash().unwrap(), hash);
        let u = user(hash.to_string());
        assert!(!u.verify_password("whatever").unwrap());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Brana.KIDS "), "ada@brana.kids");
    }
}
