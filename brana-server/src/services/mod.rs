//! 服务层
//!
//! # 服务列表
//!
//! - [`https`] - 路由装配与访问日志
//! - [`image_store`] - 图片存储 (本地 / 外部图床)
//! - [`variants`] - 商品变体生成
//! - [`customers`] - 顾客聚合与分级
//! - [`whatsapp`] - WhatsApp 下单链接
//! - [`seed`] - 演示数据

pub mod customers;
pub mod https;
pub mod image_store;
pub mod seed;
pub mod variants;
pub mod whatsapp;

pub use https::{build_app, build_router};
pub use image_store::{ImageStore, LocalImageStore, RemoteImageStore, StoredImage};
