//! Cart API 模块
//!
//! 购物车在客户端保存，服务端只负责报价和生成 WhatsApp 结账链接 (均为公开接口)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/cart/quote", post(handler::quote))
        .route("/api/checkout/whatsapp", post(handler::whatsapp_checkout))
}
