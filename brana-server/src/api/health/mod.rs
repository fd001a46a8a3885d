//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 数据库 + 图片存储检查 | 无 |
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "store": "BRANA KIDS",
//!   "version": "0.1.0",
//!   "uptimeSeconds": 42,
//!   "checks": {
//!     "database": { "status": "ok", "latencyMs": 1 },
//!     "imageStore": { "status": "ok", "message": "local" }
//!   },
//!   "catalog": { "products": 12, "orders": 3 }
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

use crate::core::{ImageStoreKind, ServerState};
use crate::db::repository::{OrderRepository, ProductRepository};

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    store: String,
    version: &'static str,
    uptime_seconds: u64,
    checks: HealthChecks,
    /// 数据库不可用时省略
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog: Option<CatalogSize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    database: Check,
    image_store: Check,
}

#[derive(Serialize)]
pub struct CatalogSize {
    products: i64,
    orders: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    /// ok | error
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Check {
    fn ok(latency_ms: Option<u64>, message: Option<String>) -> Self {
        Self {
            status: "ok",
            latency_ms,
            message,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

static STARTED: OnceLock<Instant> = OnceLock::new();

async fn check_database(state: &ServerState) -> Check {
    let started = Instant::now();
    match state.db.query("RETURN 1").await.and_then(|r| r.check()) {
        Ok(_) => Check::ok(Some(started.elapsed().as_millis() as u64), None),
        Err(e) => {
            tracing::error!(error = %e, "Health check database query failed");
            Check::failed("database unreachable")
        }
    }
}

/// 本地存储检查目录可用; 外部图床只报告配置
async fn check_image_store(state: &ServerState) -> Check {
    let kind = state.image_store().kind();
    if state.config.image_store == ImageStoreKind::Remote {
        return Check::ok(None, Some(kind.to_string()));
    }

    let dir = state.config.images_dir();
    match tokio::fs::create_dir_all(&dir).await {
        Ok(()) => Check::ok(None, Some(kind.to_string())),
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "Image directory unavailable");
            Check::failed("image directory unavailable")
        }
    }
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let uptime_seconds = STARTED.get_or_init(Instant::now).elapsed().as_secs();
    let database = check_database(&state).await;
    let image_store = check_image_store(&state).await;

    let catalog = if database.is_ok() {
        let products = ProductRepository::new(state.get_db()).count().await;
        let orders = OrderRepository::new(state.get_db()).count().await;
        match (products, orders) {
            (Ok(products), Ok(orders)) => Some(CatalogSize { products, orders }),
            _ => None,
        }
    } else {
        None
    };

    let status = if database.is_ok() && image_store.is_ok() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        store: state.config.store_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        checks: HealthChecks {
            database,
            image_store,
        },
        catalog,
    })
}
