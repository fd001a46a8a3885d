//! 统一错误处理
//!
//! 错误类型来自 `shared::error`，此处补充仓储错误到 [`AppError`] 的映射。
//!
//! # 使用示例
//!
//! ```ignore
//! let product = repo
//!     .find_by_id(&id)
//!     .await?
//!     .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Map a repository error, using resource-specific codes for not-found and duplicates
pub fn repo_error(err: RepoError, not_found: ErrorCode, duplicate: ErrorCode) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(not_found, msg),
        RepoError::Duplicate(msg) => AppError::with_message(duplicate, msg),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_repo_error_mapping() {
        let e: AppError = RepoError::Database("boom".to_string()).into();
        assert_eq!(e.http_status(), StatusCode::INTERNAL_SERVER_ERROR);

        let e: AppError = RepoError::Validation("bad".to_string()).into();
        assert_eq!(e.http_status(), StatusCode::BAD_REQUEST);

        let e = repo_error(
            RepoError::Duplicate("Product 'x' already exists".to_string()),
            ErrorCode::ProductNotFound,
            ErrorCode::ProductNameExists,
        );
        assert_eq!(e.code, ErrorCode::ProductNameExists);
        assert_eq!(e.http_status(), StatusCode::BAD_REQUEST);

        let e = repo_error(
            RepoError::NotFound("gone".to_string()),
            ErrorCode::ProductNotFound,
            ErrorCode::ProductNameExists,
        );
        assert_eq!(e.http_status(), StatusCode::NOT_FOUND);
    }
}
