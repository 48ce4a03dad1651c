// Remote executor: delegates one phase of analysis to an HTTP worker
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use jobqueue_core::domain::{Job, JobPayload};
use jobqueue_core::port::{ExecutionError, ExecutionResult, Executor};
use jobqueue_core::{AppError, Result};

/// Remote worker settings
#[derive(Debug, Clone)]
pub struct RemoteExecutorConfig {
    pub url: String,
    /// Whole-request deadline; exceeding it is reported as a timeout
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct RemoteRequest<'a> {
    job_id: &'a str,
    payload: &'a JobPayload,
}

/// Executor backed by an external analysis worker.
///
/// POSTs `{job_id, payload}` and parses the body as an [`ExecutionResult`].
/// Non-2xx responses, transport errors and undecodable bodies are failures;
/// only an exceeded deadline is reported as a timeout.
#[derive(Debug, Clone)]
pub struct RemoteExecutor {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl RemoteExecutor {
    /// # Errors
    /// `AppError::Config` when the URL does not parse or the client cannot be built.
    pub fn new(config: RemoteExecutorConfig) -> Result<Self> {
        let url = Url::parse(&config.url)
            .map_err(|e| AppError::Config(format!("invalid worker URL '{}': {}", config.url, e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build worker HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            timeout: config.timeout,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ExecutionError {
        if err.is_timeout() {
            ExecutionError::Timeout(self.timeout.as_millis() as u64)
        } else if err.is_decode() {
            ExecutionError::InvalidResponse(err.to_string())
        } else {
            ExecutionError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Executor for RemoteExecutor {
    async fn process(&self, job: &Job) -> std::result::Result<ExecutionResult, ExecutionError> {
        debug!(job_id = %job.id(), url = %self.url, "Calling remote worker");

        let body = RemoteRequest {
            job_id: job.id(),
            payload: job.payload(),
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(job_id = %job.id(), status = %status, "Remote worker returned error status");
            return Err(ExecutionError::Failed(format!(
                "worker returned status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<ExecutionResult>()
            .await
            .map_err(|e| self.map_transport_error(e))
    }

    fn kind(&self) -> &'static str {
        "remote"
    }
}
