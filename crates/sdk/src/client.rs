//! Job Queue Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{AckResponse, ErrorResponse, HealthResponse, Metrics, SubmitRequest};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Phase Job Queue Client
///
/// # Example
///
/// ```no_run
/// use jobqueue_sdk::JobQueueClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JobQueueClient::connect("http://127.0.0.1:5003")?;
/// let health = client.health().await?;
/// assert_eq!(health.status, "ok");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JobQueueClient {
    client: Client,
    base_url: Url,
}

impl JobQueueClient {
    /// Create a client for the gateway at `url` (e.g., `http://127.0.0.1:5003`)
    pub fn connect(url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(url.as_ref()).map_err(|e| SdkError::InvalidUrl(e.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Transport(format!("Failed to create client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SdkError::InvalidUrl(e.to_string()))
    }

    /// Submit a job
    ///
    /// # Errors
    /// * `SdkError::Saturated` - the phase queue is full (HTTP 429)
    /// * `SdkError::Rejected` - the request was malformed (HTTP 400)
    pub async fn submit(&self, request: &SubmitRequest) -> Result<AckResponse> {
        let response = self
            .client
            .post(self.endpoint("enqueue")?)
            .json(request)
            .send()
            .await?;

        decode(response).await
    }

    /// Fetch the counter snapshot
    pub async fn metrics(&self) -> Result<Metrics> {
        let response = self.client.get(self.endpoint("metrics")?).send().await?;
        decode(response).await
    }

    /// Fetch worker counts and queue occupancy
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.client.get(self.endpoint("health")?).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }

    // Prefer the gateway's {"error": ...} message, fall back to the raw body
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => SdkError::Saturated(message),
        StatusCode::BAD_REQUEST => SdkError::Rejected(message),
        other => SdkError::Http {
            status: other.as_u16(),
            message,
        },
    })
}
