//! Admin User API Handlers
//!
//! super_admin 账号只能由 super_admin 创建、修改、删除。

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{UserRole, UserStatus};
use shared::util::now_millis;

use crate::api::AppJson;
use crate::auth::CurrentUser;
use crate::auth::permissions::{get_default_permissions, validate_permissions};
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserPatch, UserUpdate, normalize_email};
use crate::db::repository::{NewUser, UserRepository};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_email, validate_password, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, repo_error};

fn user_error(err: crate::db::repository::RepoError) -> AppError {
    repo_error(err, ErrorCode::UserNotFound, ErrorCode::UserEmailExists)
}

fn require_super_admin(actor: &CurrentUser, action: &str) -> AppResult<()> {
    if actor.role != UserRole::SuperAdmin {
        security_log!(
            "WARN",
            "super_admin_required",
            user_id = actor.id.clone(),
            action = action.to_string()
        );
        return Err(AppError::new(ErrorCode::SuperAdminRequired));
    }
    Ok(())
}

async fn load(repo: &UserRepository, id: &str) -> AppResult<User> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
}

/// GET /api/admin/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let repo = UserRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/admin/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.get_db());
    Ok(Json(load(&repo, &id).await?))
}

/// POST /api/admin/users
///
/// 后台直接创建的账号默认 active，未指定权限时按角色取默认权限
pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentUser,
    AppJson(payload): AppJson<UserCreate>,
) -> AppResult<Json<User>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let role = payload.role.unwrap_or_default();
    if role == UserRole::SuperAdmin {
        require_super_admin(&actor, "create")?;
    }

    let permissions = match payload.permissions {
        Some(permissions) => {
            validate_permissions(&permissions).map_err(AppError::validation)?;
            permissions
        }
        None => get_default_permissions(role),
    };

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(
            NewUser {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role,
                status: payload.status.unwrap_or(UserStatus::Active),
                permissions,
            },
            now_millis(),
        )
        .await
        .map_err(user_error)?;

    tracing::info!(
        actor = %actor.id,
        user_id = %user.id_string(),
        role = %user.role,
        "Admin user created"
    );
    Ok(Json(user))
}

/// PATCH /api/admin/users/{id}
///
/// 修改角色但未给出权限时，权限重置为新角色的默认值
pub async fn update(
    State(state): State<ServerState>,
    actor: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserUpdate>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.get_db());
    let target = load(&repo, &id).await?;

    if target.role == UserRole::SuperAdmin || payload.role == Some(UserRole::SuperAdmin) {
        require_super_admin(&actor, "update")?;
    }

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    if let Some(permissions) = &payload.permissions {
        validate_permissions(permissions).map_err(AppError::validation)?;
    }

    let password = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            Some(
                User::hash_password(password)
                    .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?,
            )
        }
        None => None,
    };

    // 激活一个还没有权限的账号时，按角色补上默认权限
    let activating = payload.status == Some(UserStatus::Active)
        && target.status != UserStatus::Active
        && target.permissions.is_empty();
    let permissions = payload.permissions.or_else(|| {
        let role = payload.role.unwrap_or(target.role);
        (role != target.role || activating).then(|| get_default_permissions(role))
    });

    let patch = UserPatch {
        name: payload.name.map(|n| n.trim().to_string()),
        email: payload.email.map(|e| normalize_email(&e)),
        password,
        role: payload.role,
        status: payload.status,
        permissions,
        last_login_at: None,
        updated_at: now_millis(),
    };

    let user = repo.update(&id, patch).await.map_err(user_error)?;
    tracing::info!(actor = %actor.id, user_id = %user.id_string(), "Admin user updated");
    Ok(Json(user))
}

/// DELETE /api/admin/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<User>>> {
    let repo = UserRepository::new(state.get_db());
    let target = load(&repo, &id).await?;

    if target.id_string() == actor.id {
        return Err(AppError::new(ErrorCode::UserCannotDeleteSelf));
    }
    if target.role == UserRole::SuperAdmin {
        require_super_admin(&actor, "delete")?;
    }

    let deleted = repo.delete(&id).await.map_err(user_error)?;
    security_log!(
        "INFO",
        "user_deleted",
        actor = actor.id.clone(),
        user_id = deleted.id_string()
    );
    Ok(Json(ApiResponse::success_with_message("User deleted", deleted)))
}
