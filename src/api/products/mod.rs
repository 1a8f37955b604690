//! Product API module
//!
//! Public catalog browsing plus admin-gated CRUD.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/products", routes())
        .route("/api/admin/products", post(handler::create))
        .route(
            "/api/admin/products/{id}",
            put(handler::update).delete(handler::delete),
        )
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/slug/{slug}", get(handler::get_by_slug))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/related", get(handler::get_related))
}
