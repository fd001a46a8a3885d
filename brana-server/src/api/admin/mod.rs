//! Back-office read models
//!
//! | 路径 | 权限 |
//! |------|------|
//! | GET /api/admin/inventory | inventory:view |
//! | GET /api/admin/promotions | products:manage |
//! | GET /api/admin/dashboard | orders:view |

mod handler;

use axum::{Router, routing::get};

use crate::api::guarded;
use crate::auth::permissions::{INVENTORY_VIEW, ORDERS_VIEW, PRODUCTS_MANAGE};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/admin/inventory",
            guarded(INVENTORY_VIEW, get(handler::inventory)),
        )
        .route(
            "/api/admin/promotions",
            guarded(PRODUCTS_MANAGE, get(handler::promotions)),
        )
        .route(
            "/api/admin/dashboard",
            guarded(ORDERS_VIEW, get(handler::dashboard)),
        )
}
