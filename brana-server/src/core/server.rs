//! Server Implementation
//!
//! HTTP 服务器启动和优雅关闭

use crate::core::{Config, Result, ServerState};
use crate::services::build_router;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn new(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// 监听 `0.0.0.0:{HTTP_PORT}`，Ctrl-C 后停止接收新连接
    pub async fn run(self) -> Result<()> {
        let app = build_router(self.state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            store = %self.config.store_name,
            image_store = ?self.config.image_store,
            "BRANA KIDS server listening on {}",
            addr
        );

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
