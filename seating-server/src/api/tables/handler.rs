//! Seating Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ApiResponse;
use shared::models::{Table, TableCreate, TableUpdate};

use crate::core::ServerState;
use crate::utils::{AppResult, ok_with_message};

/// GET /api/admin/tables - 获取所有桌位 (按编号排序)
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Table>> {
    Json(state.seating.tables_or_empty().await)
}

/// GET /api/admin/tables/:id - 获取单个桌位
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Table>> {
    let table = state.seating.get_table(&id).await?;
    Ok(Json(table))
}

/// POST /api/admin/tables - 创建桌位
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TableCreate>,
) -> AppResult<Json<Table>> {
    let table = state.seating.create_table(payload).await?;
    Ok(Json(table))
}

/// PUT /api/admin/tables/:id - 更新桌位
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableUpdate>,
) -> AppResult<Json<Table>> {
    let table = state.seating.update_table(&id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/admin/tables/:id - 删除桌位 (仍有宾客时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Table>> {
    let table = state.seating.delete_table(&id).await?;
    Ok(Json(table))
}

/// POST /api/admin/tables/refresh-counts - 重新计算所有桌位人数
pub async fn refresh_counts(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Table>>>> {
    let tables = state.seating.recompute_table_counts().await?;
    Ok(ok_with_message(tables, "Counts refreshed"))
}
