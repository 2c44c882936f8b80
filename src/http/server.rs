//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, CORS)
//! - Bind the registry API under the configured prefix
//! - Serve until the shutdown signal fires
//!
//! # Design Decisions
//! - `/health` lives outside the API prefix so probes survive prefix changes
//! - Request IDs are UUIDs, set on entry and propagated to responses
//! - Metrics middleware records the matched route template, not the raw
//!   path, to keep label cardinality bounded

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::{RegistryConfig, ServerConfig};
use crate::http::handlers;
use crate::observability::metrics;
use crate::registry::RegistryClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RegistryClient>,
}

/// HTTP server for the registry API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given registry client.
    pub fn new(config: &RegistryConfig, registry: Arc<RegistryClient>) -> Self {
        let state = AppState { registry };
        let router = Self::build_router(&config.server, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/status", get(handlers::service_status))
            .route(
                "/models",
                post(handlers::register_model).get(handlers::list_models),
            )
            .route("/models/{id}", get(handlers::get_model))
            .route(
                "/models/{id}/validations",
                post(handlers::record_validation).get(handlers::list_validations),
            );

        // axum rejects nest("") outright; an empty prefix means the
        // API mounts at the root.
        let router = if config.api_prefix.is_empty() {
            Router::new().merge(api)
        } else {
            Router::new().nest(&config.api_prefix, api)
        };

        router
            .route("/health", get(handlers::health))
            .route_layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(CorsLayer::permissive())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Record per-request metrics keyed by the matched route template.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => request.uri().path().to_owned(),
    };
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}

/// UUID v4 request IDs for the `x-request-id` header.
#[derive(Clone, Copy)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}
