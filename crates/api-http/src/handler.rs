//! HTTP Handlers
//!
//! Request decoding and use-case dispatch for each endpoint.

use crate::error::ApiError;
use crate::types::{AckResponse, HealthResponse, QueueHealth};
use axum::body::Bytes;
use jobqueue_core::application::submission::submit::ID_AND_PHASE_REQUIRED;
use jobqueue_core::application::submission::{SubmissionService, SubmitRequest};
use jobqueue_core::application::{MetricsCollector, MetricsSnapshot, PoolConfig};
use jobqueue_core::domain::Phase;
use jobqueue_core::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

/// Handler with injected dependencies
pub struct HttpHandler {
    submission: SubmissionService,
    metrics: Arc<MetricsCollector>,
    pool: PoolConfig,
}

impl HttpHandler {
    pub fn new(
        submission: SubmissionService,
        metrics: Arc<MetricsCollector>,
        pool: PoolConfig,
    ) -> Self {
        Self {
            submission,
            metrics,
            pool,
        }
    }

    /// POST /enqueue
    ///
    /// The body is decoded by hand so that any non-JSON body, whatever its
    /// content type, is answered with "invalid json". So are bodies that are
    /// not an object, and the empty object.
    pub async fn enqueue(&self, body: &Bytes) -> Result<AckResponse, ApiError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;
        // An empty object carries nothing to submit
        match value.as_object() {
            Some(fields) if !fields.is_empty() => {}
            _ => return Err(ApiError::InvalidJson),
        }
        // Well-formed JSON with mistyped fields is a validation failure
        let req: SubmitRequest = serde_json::from_value(value)
            .map_err(|_| AppError::Validation(ID_AND_PHASE_REQUIRED.to_string()))?;

        let job = self.submission.submit(req).await?;
        info!(job_id = %job.id(), phase = %job.phase(), "Accepted job");

        Ok(AckResponse { ack: true })
    }

    /// GET /metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// GET /health
    pub fn health(&self) -> HealthResponse {
        let queues = Phase::ALL
            .iter()
            .map(|phase| {
                let queue = self.submission.queues().get(*phase);
                (
                    phase.to_string(),
                    QueueHealth {
                        depth: queue.depth(),
                        capacity: queue.capacity(),
                    },
                )
            })
            .collect();
        debug!("Health check requested");

        HealthResponse {
            status: "ok".to_string(),
            static_workers: self.pool.static_workers,
            dynamic_workers: self.pool.dynamic_workers,
            queues,
        }
    }
}
