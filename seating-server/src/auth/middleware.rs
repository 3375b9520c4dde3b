//! Admin session middleware

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::session::{SESSION_COOKIE, Session, SessionError};
use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

/// Public login endpoint under the admin prefix
const LOGIN_PATH: &str = "/api/admin/login";
const ADMIN_PREFIX: &str = "/api/admin";

/// Require a live admin session on `/api/admin/*`
///
/// On success the [`Session`] is inserted into the request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - paths outside `/api/admin`
/// - `/api/admin/login`
pub async fn require_admin_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let is_admin = path == ADMIN_PREFIX || path.starts_with("/api/admin/");
    if !is_admin || path == LOGIN_PATH {
        return Ok(next.run(req).await);
    }

    let Some(token) = session_token(req.headers()) else {
        security_log!(WARN, "admin_session_missing", uri = %req.uri());
        return Err(AppError::not_authenticated());
    };

    match state.sessions.validate(&token) {
        Ok(session) => {
            req.extensions_mut().insert::<Session>(session);
            Ok(next.run(req).await)
        }
        Err(SessionError::Expired) => {
            security_log!(INFO, "admin_session_expired", uri = %req.uri());
            Err(AppError::session_expired())
        }
        Err(SessionError::Missing) => {
            security_log!(WARN, "admin_session_invalid", uri = %req.uri());
            Err(AppError::not_authenticated())
        }
    }
}

/// Session token from the `Cookie` header(s), if present and non-empty
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
