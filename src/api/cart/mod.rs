//! Cart API module
//!
//! Every cart route uses the optional auth discipline: reads degrade to an
//! empty cart for anonymous callers, mutations require a known user.

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart).post(handler::add_to_cart))
        .route("/update", axum::routing::put(handler::update_item))
        .route("/remove", delete(handler::remove_item))
        .route("/clear", delete(handler::clear_cart))
}
