//! Guest API 模块
//!
//! Public: guest card and check-in. Admin: full CRUD and check-in cancel.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/guests", public_routes())
        .nest("/api/admin/guests", admin_routes())
}

fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::detail))
        .route("/{id}/arrival", post(handler::mark_arrived))
}

/// Session enforced by the router-level middleware
fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/arrival", axum::routing::delete(handler::cancel_arrival))
}
