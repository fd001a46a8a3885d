//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 后台登录/注册
//! - [`users`] - 后台用户管理
//! - [`upload`] - 图片上传与本地图片访问
//! - [`products`] - 商品接口 (含变体生成)
//! - [`categories`] - 分类接口
//! - [`banners`] - 首页横幅接口
//! - [`orders`] - 订单接口
//! - [`cart`] - 购物车报价与 WhatsApp 结账
//! - [`customers`] - 客户分析
//! - [`admin`] - 库存/促销/看板
//! - [`seed`] - 演示数据

mod extract;

pub mod auth;
pub mod health;
pub mod upload;
pub mod users;

// Storefront data
pub mod banners;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

// Back-office read models
pub mod admin;
pub mod customers;
pub mod seed;

use axum::{middleware, routing::MethodRouter};

use crate::auth::require_permission;
use crate::core::ServerState;

pub use extract::AppJson;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// 给单个方法挂权限检查，同一路径上的公开 GET 不受影响
///
/// ```ignore
/// .route("/", get(handler::list).merge(guarded(PRODUCTS_MANAGE, post(handler::create))))
/// ```
pub(crate) fn guarded(
    permission: &'static str,
    route: MethodRouter<ServerState>,
) -> MethodRouter<ServerState> {
    route.route_layer(middleware::from_fn(require_permission(permission)))
}
