//! Sync API (public)
//!
//! Full snapshot of guests and tables plus the per-resource versions, so a
//! client can poll cheaply and only re-render when a version moved.

use axum::{Json, Router, extract::State, routing::get};
use shared::models::SyncSnapshot;
use shared::util::now_millis;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync", get(sync))
}

/// GET /api/sync - 全量快照
pub async fn sync(State(state): State<ServerState>) -> Json<SyncSnapshot> {
    // versions first: a write landing mid-read then shows up as a newer version next poll
    let versions = state.resource_versions.snapshot();
    let (guests, tables) = tokio::join!(
        state.seating.guests_or_empty(),
        state.seating.tables_or_empty()
    );

    Json(SyncSnapshot {
        guests,
        tables,
        timestamp: now_millis(),
        epoch: state.epoch.clone(),
        versions,
    })
}
