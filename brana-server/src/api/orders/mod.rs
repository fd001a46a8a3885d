//! Order API 模块
//!
//! | 方法 | 路径 | 权限 |
//! |------|------|------|
//! | POST | /api/orders | 公开 (店面结账) |
//! | GET | /api/orders, /api/orders/{id} | orders:view |
//! | PATCH, DELETE | /api/orders/{id} | orders:manage |

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::guarded;
use crate::auth::permissions::{ORDERS_MANAGE, ORDERS_VIEW};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            post(handler::create).merge(guarded(ORDERS_VIEW, get(handler::list))),
        )
        .route(
            "/{id}",
            guarded(ORDERS_VIEW, get(handler::get_by_id)).merge(guarded(
                ORDERS_MANAGE,
                patch(handler::update).merge(delete(handler::delete)),
            )),
        )
}
