//! Order API module
//!
//! Customer-facing lifecycle routes plus the admin listing. Status updates
//! and deletion require an admin principal; cancellation is self-service
//! while an order is still pending.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/orders", routes())
        .route("/api/admin/orders", get(handler::list_all))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update_status)
                .delete(handler::delete_order),
        )
        .route("/{id}/cancel", put(handler::cancel))
}
