//! Unified error system for the storefront
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorResponse`]: `{ "error": ..., "code": ... }` body sent on failure
//! - [`ApiResponse`]: Success envelope for operations without a resource body
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 8xxx: User errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::new(ErrorCode::ProductNameExists);
//! assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
//!
//! let err = AppError::validation("price must be a number").with_detail("field", "price");
//! let body = ErrorResponse::from(&err);
//! assert_eq!(body.error, "price must be a number");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorResponse};
