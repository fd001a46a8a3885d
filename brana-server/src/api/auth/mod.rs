//! Admin Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/admin/auth/signup, /api/admin/auth/login: public (no auth required)
/// - /api/admin/auth/me, /api/admin/auth/logout: token checked by the global require_auth middleware
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/logout", post(handler::logout))
}
