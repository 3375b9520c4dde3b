//! End-to-end API flows through the in-process router

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, to_bytes};
use http::{Method, Request, StatusCode, header};
use seating_server::core::Secret;
use seating_server::db::MemoryStore;
use seating_server::{Config, ServerState, StorageBackend};
use serde_json::{Value, json};

const PASSWORD: &str = "correct horse";

fn test_state() -> ServerState {
    state_with_login_delay(0)
}

fn state_with_login_delay(login_delay_ms: u64) -> ServerState {
    let mut config = Config::with_overrides("./target/test-work", 0, StorageBackend::Memory);
    config.admin_password = Secret::new(PASSWORD);
    config.login_delay_ms = login_delay_ms;
    config.environment = "development".to_string();
    ServerState::with_store(&config, Arc::new(MemoryStore::new())).unwrap()
}

struct Reply {
    status: StatusCode,
    headers: http::HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn send(
    state: &ServerState,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = state.https.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    Reply {
        status,
        headers,
        body: body.to_vec(),
    }
}

async fn login(state: &ServerState) -> String {
    let reply = send(
        state,
        Method::POST,
        "/api/admin/login",
        None,
        Some(json!({ "password": PASSWORD })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["authenticated"], true);

    let set_cookie = reply
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let state = test_state();

    let reply = send(&state, Method::GET, "/api/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["backend"], "memory");

    let reply = send(&state, Method::GET, "/api/health/detailed", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["checks"]["storage"]["status"], "ok");
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let state = test_state();

    let reply = send(&state, Method::GET, "/api/admin/guests", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json()["code"], 1001);

    let reply = send(
        &state,
        Method::GET,
        "/api/admin/tables",
        Some("admin_session=forged"),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password() {
    let state = test_state();
    let reply = send(
        &state,
        Method::POST,
        "/api/admin/login",
        None,
        Some(json!({ "password": "nope" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json()["code"], 1002);
    assert!(reply.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_failed_logins_wait_fixed_delay() {
    let state = state_with_login_delay(150);

    for password in ["   ", "nope"] {
        let started = Instant::now();
        let reply = send(
            &state,
            Method::POST,
            "/api/admin/login",
            None,
            Some(json!({ "password": password })),
        )
        .await;
        assert!(reply.status.is_client_error());
        assert!(started.elapsed() >= Duration::from_millis(150));
    }
}

#[tokio::test]
async fn test_seating_flow() {
    let state = test_state();
    let cookie = login(&state).await;
    let cookie = Some(cookie.as_str());

    // table with 10 seats
    let reply = send(
        &state,
        Method::POST,
        "/api/admin/tables",
        cookie,
        Some(json!({ "number": 1, "name": "Famille", "capacity": 10 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let table_id = reply.json()["id"].as_str().unwrap().to_string();

    // 6 adults + 2 children fit
    let reply = send(
        &state,
        Method::POST,
        "/api/admin/guests",
        cookie,
        Some(json!({
            "name": "Élodie Lefèvre",
            "places": 6,
            "children": 2,
            "tableId": table_id,
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let guest_id = reply.json()["id"].as_str().unwrap().to_string();

    let reply = send(
        &state,
        Method::GET,
        &format!("/api/admin/tables/{}", table_id),
        cookie,
        None,
    )
    .await;
    assert_eq!(reply.json()["currentCount"], 8);

    // 3 more do not
    let reply = send(
        &state,
        Method::POST,
        "/api/admin/guests",
        cookie,
        Some(json!({ "name": "Paul", "places": 3, "tableId": table_id })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.json()["code"], 7003);

    // public search, case and accent insensitive
    let reply = send(
        &state,
        Method::GET,
        "/api/search?q=elodie%20LEFEVRE",
        None,
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["exactMatch"]["id"], guest_id.as_str());
    assert_eq!(body["table"]["id"], table_id.as_str());
    assert!(body.get("similar").is_none());

    // public check-in
    let reply = send(
        &state,
        Method::POST,
        &format!("/api/guests/{}/arrival", guest_id),
        None,
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["arrived"], true);
    assert!(reply.json()["arrivalTime"].is_string());

    // admin cancel
    let reply = send(
        &state,
        Method::DELETE,
        &format!("/api/admin/guests/{}/arrival", guest_id),
        cookie,
        None,
    )
    .await;
    assert_eq!(reply.json()["arrived"], false);
    assert!(reply.json()["arrivalTime"].is_null());

    // table still referenced
    let reply = send(
        &state,
        Method::DELETE,
        &format!("/api/admin/tables/{}", table_id),
        cookie,
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.json()["code"], 7004);

    // sync carries versions
    let reply = send(&state, Method::GET, "/api/sync", None, None).await;
    let body = reply.json();
    assert_eq!(body["guests"].as_array().unwrap().len(), 1);
    assert_eq!(body["tables"].as_array().unwrap().len(), 1);
    assert!(body["versions"]["guest"].as_u64().unwrap() >= 3);

    // overview totals
    let reply = send(&state, Method::GET, "/api/overview", None, None).await;
    let body = reply.json();
    assert_eq!(body["totals"]["guests"], 1);
    assert_eq!(body["totals"]["usedCapacity"], 8);

    // export
    let reply = send(&state, Method::GET, "/api/admin/export/pdf", cookie, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = reply
        .headers
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"guest-list-"));
    assert!(reply.body.starts_with(b"%PDF-1.4"));

    // delete guest, then the table can go
    let reply = send(
        &state,
        Method::DELETE,
        &format!("/api/admin/guests/{}", guest_id),
        cookie,
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(
        &state,
        Method::DELETE,
        &format!("/api/admin/tables/{}", table_id),
        cookie,
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_search_requires_query() {
    let state = test_state();

    let reply = send(&state, Method::GET, "/api/search?q=%20%20", None, None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "Query required");

    let reply = send(&state, Method::GET, "/api/search", None, None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_guest_is_404() {
    let state = test_state();
    let reply = send(&state, Method::GET, "/api/guests/g-missing", None, None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.json()["code"], 7002);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let state = test_state();
    let cookie = login(&state).await;

    let reply = send(&state, Method::GET, "/api/admin/session", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["authenticated"], true);

    let reply = send(&state, Method::POST, "/api/admin/logout", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let cleared = reply
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let reply = send(&state, Method::GET, "/api/admin/session", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}
