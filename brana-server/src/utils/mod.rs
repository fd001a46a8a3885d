//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - 日志、输入校验

pub mod error;
pub mod logger;
pub mod validation;

// Re-export error types from the error module (which re-exports from shared)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, repo_error};
