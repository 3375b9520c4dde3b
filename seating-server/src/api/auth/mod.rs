//! Admin Session Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build admin session router
/// - /api/admin/login: public (skipped by the session middleware)
/// - /api/admin/logout, /api/admin/session: require a live session
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/login", post(handler::login))
        .route("/api/admin/logout", post(handler::logout))
        .route("/api/admin/session", get(handler::session))
}
