//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors (products, categories, banners, uploads)
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin UI can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is waiting for approval
    AccountPending = 1006,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Only a super admin may touch super admin accounts
    SuperAdminRequired = 2004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4007,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Product name already exists (case-insensitive)
    ProductNameExists = 6004,
    /// Product has more images than allowed
    ProductTooManyImages = 6005,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category name already exists
    CategoryNameExists = 6103,
    /// Banner not found
    BannerNotFound = 6201,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Email already registered
    UserEmailExists = 8002,
    /// Users cannot delete themselves
    UserCannotDeleteSelf = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9005,
    /// External image host failed
    ImageHostError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountPending => "Account is pending approval",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::SuperAdminRequired => "Super administrator role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::ProductNameExists => "Product with this name already exists",
            ErrorCode::ProductTooManyImages => "A product can have at most 3 images",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::BannerNotFound => "Banner not found",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserEmailExists => "Email is already registered",
            ErrorCode::UserCannotDeleteSelf => "Cannot delete own account",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ImageHostError => "Image host request failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1006 => Ok(ErrorCode::AccountPending),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::SuperAdminRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::ProductNameExists),
            6005 => Ok(ErrorCode::ProductTooManyImages),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6103 => Ok(ErrorCode::CategoryNameExists),
            6201 => Ok(ErrorCode::BannerNotFound),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UserEmailExists),
            8003 => Ok(ErrorCode::UserCannotDeleteSelf),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ImageHostError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::ProductNameExists.code(), 6004);
        assert_eq!(ErrorCode::UserEmailExists.code(), 8002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::AccountPending,
            ErrorCode::ProductTooManyImages,
            ErrorCode::BannerNotFound,
            ErrorCode::FileTooLarge,
            ErrorCode::ImageHostError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown() {
        assert_eq!(ErrorCode::try_from(3333), Err(InvalidErrorCode(3333)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::ProductNotFound).unwrap();
        assert_eq!(json, "6001");
        let code: ErrorCode = serde_json::from_str("1002").unwrap();
        assert_eq!(code, ErrorCode::InvalidCredentials);
    }
}
