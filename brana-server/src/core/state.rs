use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::config::ImageStoreKind;
use crate::db::DbService;
use crate::services::{ImageStore, LocalImageStore, RemoteImageStore};
use crate::utils::{AppError, ErrorCode};

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个请求 clone 一份。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | images | Arc<dyn ImageStore> | 图片存储 (本地 / 外部图床) |
///
/// # 使用示例
///
/// ```ignore
/// let repo = ProductRepository::new(state.get_db());
/// let token = state.get_jwt_service().generate_token(...)?;
/// ```
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 图片存储
    pub images: Arc<dyn ImageStore>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("jwt_service", &self.jwt_service)
            .field("images", &self.images.kind())
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            images,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 0. 配置检查
    /// 1. 工作目录
    /// 2. 数据库 (RocksDB 或内存库)
    /// 3. JWT 服务与图片存储
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config.validate()?;
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::with_message(
                ErrorCode::ConfigError,
                format!("Failed to create work dir {}: {}", config.work_dir, e),
            )
        })?;

        let db_service = if config.is_memory_db() {
            DbService::memory(&config.db_namespace, &config.db_name).await?
        } else {
            DbService::new(&config.database_path, &config.db_namespace, &config.db_name).await?
        };

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let images = build_image_store(config)?;
        tracing::info!(store = images.kind(), "Image store ready");

        Ok(Self::new(config.clone(), db_service.db, jwt_service, images))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取图片存储
    pub fn image_store(&self) -> Arc<dyn ImageStore> {
        self.images.clone()
    }
}

fn build_image_store(config: &Config) -> Result<Arc<dyn ImageStore>, AppError> {
    match config.image_store {
        ImageStoreKind::Local => Ok(Arc::new(LocalImageStore::new(
            config.images_dir(),
            config.public_base_url.clone(),
        ))),
        ImageStoreKind::Remote => {
            let (Some(url), Some(key)) = (&config.image_host_url, &config.image_host_api_key)
            else {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    "IMAGE_STORE=remote requires IMAGE_HOST_URL and IMAGE_HOST_API_KEY",
                ));
            };
            Ok(Arc::new(RemoteImageStore::new(url.clone(), key.clone())?))
        }
    }
}
