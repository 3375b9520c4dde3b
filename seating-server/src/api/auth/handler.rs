//! Admin Session Handlers
//!
//! Handles login, logout, and session introspection

use std::time::Duration;

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use shared::models::{LoginRequest, SessionInfo};

use crate::AppError;
use crate::auth::{SESSION_COOKIE, Session, session_token};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::ok_with_message;
use crate::utils::validation::{MAX_PASSWORD_LEN, validate_required_text};

/// `Set-Cookie` value carrying a session token
fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Login handler
///
/// Checks the admin password and sets the session cookie
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    // Every failed attempt waits the same fixed delay before answering
    let delay = Duration::from_millis(state.config.login_delay_ms);

    if let Err(e) = validate_required_text(&req.password, "Password", MAX_PASSWORD_LEN) {
        tokio::time::sleep(delay).await;
        security_log!(WARN, "admin_login_failed", reason = "invalid_payload");
        return Err(e);
    }

    if !state.credentials.verify(&req.password) {
        tokio::time::sleep(delay).await;
        security_log!(WARN, "admin_login_failed", reason = "invalid_password");
        return Err(AppError::invalid_credentials());
    }

    let session = state.sessions.create();
    security_log!(INFO, "admin_login", expires_at = session.expires_at);

    let cookie = session_cookie(
        &session.token,
        state.sessions.ttl().as_secs(),
        state.config.is_production(),
    );
    let body = SessionInfo {
        authenticated: true,
        expires_at: session.expires_at,
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Logout handler
///
/// Revokes the session and expires the cookie
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(&token);
    }
    security_log!(INFO, "admin_logout", sessions = state.sessions.len());

    let cookie = session_cookie("", 0, state.config.is_production());
    ([(header::SET_COOKIE, cookie)], ok_with_message((), "Logged out")).into_response()
}

/// Current session
pub async fn session(Extension(session): Extension<Session>) -> Json<SessionInfo> {
    Json(SessionInfo {
        authenticated: true,
        expires_at: session.expires_at,
    })
}
