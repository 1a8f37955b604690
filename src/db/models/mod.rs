//! Database models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod user;

// Catalog
pub mod product;

// Cart and orders
pub mod cart;
pub mod order;

// Re-exports
pub use cart::{Cart, CartItem, ItemKey};
pub use order::{DEFAULT_PAYMENT_METHOD, Order, OrderItem, OrderStatus};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::{User, UserInfo};
