//! Banner API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::guarded;
use crate::auth::permissions::BANNERS_MANAGE;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/banners", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list).merge(guarded(BANNERS_MANAGE, post(handler::create))),
        )
        .route(
            "/{id}",
            get(handler::get_by_id).merge(guarded(
                BANNERS_MANAGE,
                patch(handler::update).merge(delete(handler::delete)),
            )),
        )
}
