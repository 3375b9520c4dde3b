//! Overview API (public)

use axum::{Json, Router, extract::State, routing::get};
use shared::models::Overview;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/overview", get(overview))
}

/// GET /api/overview - 汇总数据与各桌名单
pub async fn overview(State(state): State<ServerState>) -> Json<Overview> {
    Json(state.seating.overview().await)
}
