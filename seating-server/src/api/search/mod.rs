//! Guest search API (public)

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use shared::models::{SearchQuery, SearchResponse};

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/search", get(search))
}

/// GET /api/search?q= - 精确匹配或相似列表
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let q = query.q.unwrap_or_default();
    let response = state.seating.search(&q, &state.config.search).await?;
    Ok(Json(response))
}
