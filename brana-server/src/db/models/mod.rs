//! Database Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod banner;
pub mod category;
pub mod product;

// Orders
pub mod order;

// Auth
pub mod user;

// Re-exports
pub use banner::{Banner, BannerCreate, BannerId, BannerUpdate};
pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use order::{Order, OrderCreate, OrderId, OrderItemInput, OrderUpdate, resolve_items};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use user::{
    User, UserCreate, UserId, UserPatch, UserUpdate, normalize_email, verify_dummy_password,
};
