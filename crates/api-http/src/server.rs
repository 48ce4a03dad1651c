//! HTTP Server
//!
//! Router construction and serving with graceful shutdown.

use crate::error::ApiError;
use crate::handler::HttpHandler;
use crate::types::{AckResponse, HealthResponse};
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use jobqueue_core::application::MetricsSnapshot;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 5003;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Build the gateway router
pub fn router(handler: Arc<HttpHandler>) -> Router {
    Router::new()
        .route("/enqueue", post(enqueue))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(handler)
}

async fn enqueue(
    State(handler): State<Arc<HttpHandler>>,
    body: Bytes,
) -> Result<Json<AckResponse>, ApiError> {
    handler.enqueue(&body).await.map(Json)
}

async fn metrics(State(handler): State<Arc<HttpHandler>>) -> Json<MetricsSnapshot> {
    Json(handler.metrics())
}

async fn health(State(handler): State<Arc<HttpHandler>>) -> Json<HealthResponse> {
    Json(handler.health())
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    handler: Arc<HttpHandler>,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, handler: HttpHandler) -> Self {
        Self {
            config,
            handler: Arc::new(handler),
        }
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!(host = %self.config.host, port = self.config.port, "HTTP gateway listening");

        axum::serve(listener, router(self.handler))
            .with_graceful_shutdown(shutdown)
            .await
    }
}
