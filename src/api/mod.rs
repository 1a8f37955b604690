//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - registration and login
//! - [`cart`] - cart reconciliation endpoints
//! - [`orders`] - order lifecycle endpoints
//! - [`products`] - catalog browsing and admin CRUD
//! - [`stats`] - admin dashboard reports

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod stats;

use axum::Router;
use serde::Serialize;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Simple `{message}` response body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Full application router
pub fn router() -> Router<ServerState> {
    health::router()
        .merge(auth::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(stats::router())
}
