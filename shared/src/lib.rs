//! Shared types for the BRANA KIDS storefront
//!
//! Error types, response structures and catalog/order value types used by
//! the server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse};
pub use http;
pub use serde::{Deserialize, Serialize};
