//! Guest API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Guest, GuestCreate, GuestDetail, GuestUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/guests/:id - 宾客及其桌位 (公共)
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<GuestDetail>> {
    let detail = state.seating.guest_detail(&id).await?;
    Ok(Json(detail))
}

/// POST /api/guests/:id/arrival - 签到 (公共)
pub async fn mark_arrived(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Guest>> {
    let guest = state.seating.mark_arrived(&id).await?;
    Ok(Json(guest))
}

/// DELETE /api/admin/guests/:id/arrival - 取消签到
pub async fn cancel_arrival(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Guest>> {
    let guest = state.seating.cancel_arrival(&id).await?;
    Ok(Json(guest))
}

/// GET /api/admin/guests - 获取所有宾客
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Guest>> {
    Json(state.seating.guests_or_empty().await)
}

/// GET /api/admin/guests/:id - 获取单个宾客
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Guest>> {
    let guest = state.seating.get_guest(&id).await?;
    Ok(Json(guest))
}

/// POST /api/admin/guests - 创建宾客
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GuestCreate>,
) -> AppResult<Json<Guest>> {
    let guest = state.seating.create_guest(payload).await?;
    Ok(Json(guest))
}

/// PUT /api/admin/guests/:id - 更新宾客
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<GuestUpdate>,
) -> AppResult<Json<Guest>> {
    let guest = state.seating.update_guest(&id, payload).await?;
    Ok(Json(guest))
}

/// DELETE /api/admin/guests/:id - 删除宾客
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Guest>> {
    let guest = state.seating.delete_guest(&id).await?;
    Ok(Json(guest))
}
