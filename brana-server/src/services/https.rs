use crate::auth::require_auth;
use crate::core::ServerState;
use axum::{Router, middleware};
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis();

    tracing::info!(target: "http_access", "{} {} {} {}ms", method, uri, status, latency_ms);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::users::router())
        .merge(crate::api::upload::router())
        // Storefront
        .merge(crate::api::products::router())
        .merge(crate::api::categories::router())
        .merge(crate::api::banners::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::cart::router())
        // Back-office
        .merge(crate::api::customers::router())
        .merge(crate::api::admin::router())
        .merge(crate::api::seed::router())
}

/// Full application: routes, auth, CORS, compression and access log
pub fn build_router(state: ServerState) -> Router {
    build_app()
        // JWT 认证中间件 - 在 Router 级别应用，require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}
