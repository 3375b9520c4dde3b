//! Export API (admin)

use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use shared::util::now_millis;

use crate::core::ServerState;
use crate::export::{export_filename, render_guest_list};
use crate::utils::{AppError, ErrorCode};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/admin/export/pdf", get(pdf))
}

/// GET /api/admin/export/pdf - 宾客名单 PDF
pub async fn pdf(State(state): State<ServerState>) -> Result<Response, AppError> {
    let overview = state.seating.overview().await;
    let bytes = render_guest_list(&overview, &state.config.event, Local::now()).map_err(|e| {
        tracing::error!(error = %e, "Guest list export failed");
        AppError::with_message(ErrorCode::ExportFailed, e.to_string())
    })?;

    let disposition = format!("attachment; filename=\"{}\"", export_filename(now_millis()));
    tracing::info!(bytes = bytes.len(), tables = overview.tables.len(), "Guest list exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
