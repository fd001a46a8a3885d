use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::{AppError, ErrorCode};

/// 图片存储后端
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStoreKind {
    /// 本地文件系统 ({WORK_DIR}/images)
    Local,
    /// 外部图床 (HTTP API)
    Remote,
}

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、本地图片) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/database/brana.db | RocksDB 路径, `memory` 为内存库 |
/// | DB_NAMESPACE | brana | SurrealDB namespace |
/// | DB_NAME | store | SurrealDB database |
/// | ENVIRONMENT | development | 运行环境 |
/// | IMAGE_STORE | local | 图片存储: local / remote |
/// | IMAGE_HOST_URL | - | 外部图床地址 |
/// | IMAGE_HOST_API_KEY | - | 外部图床密钥 |
/// | PUBLIC_BASE_URL | "" | 本地图片 URL 前缀 |
/// | WHATSAPP_NUMBER | 2348000000000 | 下单 WhatsApp 号码 |
/// | STORE_NAME | BRANA KIDS | 店铺名称 |
/// | LOW_STOCK_THRESHOLD | 5 | 低库存阈值 |
///
/// 日志相关的 LOG_LEVEL / LOG_DIR / LOG_JSON 由 [`crate::setup_environment`] 读取。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/brana HTTP_PORT=8080 cargo run -p brana-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库路径 (`memory` 表示内存库)
    pub database_path: String,
    pub db_namespace: String,
    pub db_name: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub image_store: ImageStoreKind,
    pub image_host_url: Option<String>,
    pub image_host_api_key: Option<String>,
    pub public_base_url: String,
    /// 结账用 WhatsApp 号码 (国际格式)
    pub whatsapp_number: String,
    pub store_name: String,
    pub low_stock_threshold: i64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("database")
                .join("brana.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "brana".into()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "store".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            image_store: match std::env::var("IMAGE_STORE").as_deref() {
                Ok("remote") => ImageStoreKind::Remote,
                _ => ImageStoreKind::Local,
            },
            image_host_url: std::env::var("IMAGE_HOST_URL").ok().filter(|s| !s.is_empty()),
            image_host_api_key: std::env::var("IMAGE_HOST_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or_default(),
            whatsapp_number: std::env::var("WHATSAPP_NUMBER")
                .unwrap_or_else(|_| "2348000000000".into()),
            store_name: std::env::var("STORE_NAME").unwrap_or_else(|_| "BRANA KIDS".into()),
            low_stock_threshold: std::env::var("LOW_STOCK_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            work_dir,
        }
    }

    /// 测试配置: 内存数据库 + 指定工作目录
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            database_path: "memory".into(),
            db_namespace: "brana".into(),
            db_name: "test".into(),
            jwt: JwtConfig::with_secret("test-secret-that-is-definitely-32-chars-long"),
            environment: "test".into(),
            image_store: ImageStoreKind::Local,
            image_host_url: None,
            image_host_api_key: None,
            public_base_url: String::new(),
            whatsapp_number: "2348000000000".into(),
            store_name: "BRANA KIDS".into(),
            low_stock_threshold: 5,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 启动前检查: 生产环境必须显式配置 JWT_SECRET
    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_production() && std::env::var("JWT_SECRET").map_or(true, |s| s.len() < 32) {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "JWT_SECRET (at least 32 characters) is required in production",
            ));
        }
        if !self.whatsapp_number.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "WHATSAPP_NUMBER must contain digits",
            ));
        }
        Ok(())
    }

    /// 是否使用内存数据库
    pub fn is_memory_db(&self) -> bool {
        self.database_path == "memory" || self.database_path == "mem://"
    }

    /// 本地图片目录: {work_dir}/images
    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("images")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tests_uses_memory_db() {
        let config = Config::for_tests("/tmp/brana-test");
        assert!(config.is_memory_db());
        assert!(!config.is_production());
        assert_eq!(config.images_dir(), PathBuf::from("/tmp/brana-test/images"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_whatsapp_number_must_have_digits() {
        let mut config = Config::for_tests("/tmp/brana-test");
        config.whatsapp_number = "+".into();
        assert!(config.validate().is_err());
    }
}
