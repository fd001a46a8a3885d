//! BRANA KIDS Server - 童装电商店面与后台
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (商品、分类、横幅、订单、用户)
//! - **认证** (`auth`): JWT + Argon2，按权限控制后台路由
//! - **服务** (`services`): 图片存储、变体生成、顾客聚合、WhatsApp 下单链接
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! brana-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # JWT 认证、权限
//! ├── services/      # 路由装配、图片、变体、顾客、WhatsApp、演示数据
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use services::build_router;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 .env 并初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty());
    let log_json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    init_logger_with_file(Some(&log_level), Some(log_json), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  ___    _   _____       __ __ ________  _____
   / __ )/ __ \/   |  / | / /   |     / //_//  _/ __ \/ ___/
  / __  / /_/ / /| | /  |/ / /| |    / ,<   / // / / /\__ \
 / /_/ / _, _/ ___ |/ /|  / ___ |   / /| |_/ // /_/ /___/ /
/_____/_/ |_/_/  |_/_/ |_/_/  |_|  /_/ |_/___/_____//____/
    "#
    );
}
