//! Customer API 模块
//!
//! 顾客由订单按手机号聚合，不单独存储

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::CUSTOMERS_VIEW;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/customers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{phone}", get(handler::get_by_phone))
        .route_layer(middleware::from_fn(require_permission(CUSTOMERS_VIEW)))
}
