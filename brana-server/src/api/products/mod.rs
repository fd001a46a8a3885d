//! Product API 模块
//!
//! 读接口公开，写接口需要 `products:manage`

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::guarded;
use crate::auth::permissions::PRODUCTS_MANAGE;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list).merge(guarded(PRODUCTS_MANAGE, post(handler::create))),
        )
        .route("/variants", guarded(PRODUCTS_MANAGE, post(handler::variants)))
        .route(
            "/{id}",
            get(handler::get_by_id).merge(guarded(
                PRODUCTS_MANAGE,
                patch(handler::update).merge(delete(handler::delete)),
            )),
        )
}
