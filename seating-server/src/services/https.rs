use crate::auth::require_admin_session;
use crate::core::{Config, ServerState};
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tower::Service;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub type OneshotResult =
    Result<http::Response<axum::body::Body>, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", elapsed_ms, "{} {} {}", method, uri, status);

    response
}

/// Requests running past `timeout` are answered with 408
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(http::StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Public APIs
        .merge(crate::api::health::router())
        .merge(crate::api::search::router())
        .merge(crate::api::sync::router())
        .merge(crate::api::overview::router())
        // Admin session
        .merge(crate::api::auth::router())
        // Data model APIs (guests router also carries the public check-in routes)
        .merge(crate::api::guests::router())
        .merge(crate::api::tables::router())
        .merge(crate::api::export::router())
}

#[derive(Clone, Debug)]
pub struct HttpsService {
    config: Config,
    router: Arc<RwLock<Option<Router>>>,
}

impl HttpsService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Arc::new(RwLock::new(None)),
        }
    }

    /// Initialize the router with the given server state.
    /// This should be called after ServerState is fully initialized.
    pub fn initialize(&self, state: ServerState) {
        let timeout = Duration::from_millis(self.config.request_timeout_ms);

        let app = build_app()
            // 会话中间件 - require_admin_session 内部只拦截 /api/admin/*
            .layer(middleware::from_fn_with_state(
                state.clone(),
                require_admin_session,
            ))
            .with_state(state)
            // Tower HTTP 中间件
            .layer(timeout_layer(timeout))
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(TraceLayer::new_for_http())
            // HTTP 请求日志中间件
            .layer(middleware::from_fn(log_request));

        let mut router = self
            .router
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *router = Some(app);
    }

    pub fn router(&self) -> Option<Router> {
        self.router
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Run one request through the router in-process
    pub async fn oneshot(&self, request: http::Request<axum::body::Body>) -> OneshotResult {
        match self.router() {
            Some(mut service) => match service.call(request).await {
                Ok(response) => Ok(response),
                Err(_) => Err(crate::utils::AppError::internal("Oneshot call failed").into()),
            },
            None => Err(crate::utils::AppError::internal("HttpsService not initialized").into()),
        }
    }

    /// Start the HTTP server and serve until `shutdown_signal` resolves
    pub async fn start_server<F>(
        &self,
        shutdown_signal: F,
        grace: Duration,
    ) -> Result<(), crate::utils::AppError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self.router().ok_or_else(|| {
            crate::utils::AppError::internal("HttpsService not initialized with router")
        })?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🚀 Starting HTTP server on {}", addr);

        let handle = axum_server::Handle::new();

        // Handle shutdown signal
        let handle_clone = handle.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            handle_clone.graceful_shutdown(Some(grace));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| crate::utils::AppError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
