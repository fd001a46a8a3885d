//! Category API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::guarded;
use crate::auth::permissions::CATEGORIES_MANAGE;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list).merge(guarded(CATEGORIES_MANAGE, post(handler::create))),
        )
        .route(
            "/recount",
            guarded(CATEGORIES_MANAGE, post(handler::recount)),
        )
        .route(
            "/{id}",
            get(handler::get_by_id).merge(guarded(
                CATEGORIES_MANAGE,
                patch(handler::update).merge(delete(handler::delete)),
            )),
        )
}
