//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::BannerNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::SuperAdminRequired
            | Self::AccountPending
            | Self::AccountDisabled
            | Self::UserCannotDeleteSelf => StatusCode::FORBIDDEN,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::NetworkError
            | Self::ConfigError
            | Self::ImageHostError
            | Self::ImageProcessingFailed
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, duplicates, business rules)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
