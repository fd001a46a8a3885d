//! Data models
//!
//! Value types shared between the server and API clients. Stored records
//! (with database ids) live in the server's `db::models`.

pub mod category;
pub mod order;
pub mod product;
pub mod user;

// Re-exports
pub use category::*;
pub use order::{
    MAX_AMOUNT, MAX_QUANTITY, OrderItem, OrderItemStatus, checked_items_total, items_total,
    line_subtotal, saturating_add,
};
pub use product::*;
pub use user::*;
