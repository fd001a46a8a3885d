//! Demo data route

mod handler;

use axum::{Router, routing::post};

use crate::api::guarded;
use crate::auth::permissions::ALL;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/admin/seed-data",
        guarded(ALL, post(handler::seed)),
    )
}
