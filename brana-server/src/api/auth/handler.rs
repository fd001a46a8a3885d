//! Authentication Handlers
//!
//! Handles signup, login, logout and the current-user lookup

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::models::{UserRole, UserStatus};
use shared::util::now_millis;
use validator::Validate;

use crate::api::AppJson;
use crate::auth::CurrentUser;
use crate::auth::permissions::get_default_permissions;
use crate::core::ServerState;
use crate::db::models::{User, verify_dummy_password};
use crate::db::repository::{NewUser, UserRepository};
use crate::security_log;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, repo_error};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `{token, expiresIn, user}`; 待审批账号只有 `user`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// 秒
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    pub user: User,
}

fn issue_token(state: &ServerState, user: User) -> AppResult<AuthResponse> {
    let jwt = state.get_jwt_service();
    let token = jwt
        .generate_token(
            &user.id_string(),
            &user.email,
            &user.name,
            user.role,
            &user.permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    Ok(AuthResponse {
        token: Some(token),
        expires_in: Some(jwt.expires_in_seconds()),
        user,
    })
}

/// POST /api/admin/auth/signup
///
/// 第一个账号成为 super_admin 并直接激活，之后的注册为 user/pending，需管理员激活。
/// 待审批账号没有权限，也不签发令牌。
pub async fn signup(
    State(state): State<ServerState>,
    AppJson(req): AppJson<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let first_account = repo.count().await? == 0;
    let (role, status) = if first_account {
        (UserRole::SuperAdmin, UserStatus::Active)
    } else {
        (UserRole::User, UserStatus::Pending)
    };

    let user = repo
        .create(
            NewUser {
                name: req.name,
                email: req.email,
                password: req.password,
                role,
                status,
                permissions: if first_account {
                    get_default_permissions(role)
                } else {
                    Vec::new()
                },
            },
            now_millis(),
        )
        .await
        .map_err(|e| repo_error(e, ErrorCode::UserNotFound, ErrorCode::UserEmailExists))?;

    tracing::info!(
        user_id = %user.id_string(),
        email = %user.email,
        role = %user.role,
        status = ?user.status,
        "Admin account registered"
    );

    if user.status != UserStatus::Active {
        return Ok(Json(AuthResponse {
            token: None,
            expires_in: None,
            user,
        }));
    }
    Ok(Json(issue_token(&state, user)?))
}

/// POST /api/admin/auth/login
///
/// Wrong email and wrong password return the same error
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let repo = UserRepository::new(state.get_db());
    let found = repo.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let mut user = match found {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    email = req.email.clone(),
                    reason = "invalid_password"
                );
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            verify_dummy_password(&req.password);
            security_log!(
                "WARN",
                "login_failed",
                email = req.email.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    match user.status {
        UserStatus::Active => {}
        UserStatus::Pending => {
            security_log!("WARN", "login_pending", email = user.email.clone());
            return Err(AppError::new(ErrorCode::AccountPending));
        }
        UserStatus::Inactive => {
            security_log!("WARN", "login_disabled", email = user.email.clone());
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }
    }

    let user_id = user.id_string();
    let now = now_millis();
    repo.record_login(&user_id, now).await?;
    user.last_login_at = Some(now);

    tracing::info!(
        user_id = %user_id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(issue_token(&state, user)?))
}

/// GET /api/admin/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user))
}

/// POST /api/admin/auth/logout
///
/// 无状态: 客户端丢弃令牌即可，这里只记录事件
pub async fn logout(current: CurrentUser) -> Json<ApiResponse<()>> {
    security_log!(
        "INFO",
        "logout",
        user_id = current.id.clone(),
        email = current.email.clone()
    );
    tracing::info!(user_id = %current.id, email = %current.email, "User logged out");

    Json(ApiResponse::message("Logged out"))
}
