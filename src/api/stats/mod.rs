//! Admin report API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/stats", get(handler::dashboard))
        .route("/api/admin/users", get(handler::users_with_stats))
        .route("/api/admin/orders/recent", get(handler::recent_orders))
        .route("/api/admin/products/top", get(handler::top_products))
}
