// Local executor: simulated analysis with payload-driven fault injection
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use jobqueue_core::domain::Job;
use jobqueue_core::port::{ExecutionError, ExecutionResult, Executor, TimeProvider};

/// Payload keys understood by the simulation
const SIMULATED_LATENCY: &str = "simulated_latency";
const SIMULATE_TIMEOUT: &str = "simulate_timeout";
const SIMULATE_FAIL: &str = "simulate_fail";
const SCORE: &str = "score";
const FORWARD_TO_DYNAMIC: &str = "forward_to_dynamic";

/// In-process executor used when no remote worker is configured.
///
/// Sleeps for the configured latency (or `simulated_latency` seconds from the
/// payload), then reports according to the payload flags. There is no deadline:
/// a `simulate_timeout` job still waits out its latency first.
pub struct LocalExecutor {
    default_latency: Duration,
    time_provider: Arc<dyn TimeProvider>,
}

impl LocalExecutor {
    /// Create a new local executor
    ///
    /// # Arguments
    /// * `default_latency` - Simulated work time when the payload does not override it
    /// * `time_provider` - Clock used to measure processing time
    pub fn new(default_latency: Duration, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            default_latency,
            time_provider,
        }
    }

    fn latency_for(&self, job: &Job) -> Duration {
        job.payload()
            .number(SIMULATED_LATENCY)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(self.default_latency)
    }
}

/// `score` from the payload, 0.0 when absent.
///
/// A present but non-numeric score (null, object, unparsable string) fails the
/// attempt so it goes through the retry loop.
fn score_of(job: &Job) -> Result<f64, ExecutionError> {
    match job.payload().get(SCORE) {
        None => Ok(0.0),
        Some(serde_json::Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(raw) => job.payload().number(SCORE).ok_or_else(|| {
            warn!(job_id = %job.id(), score = %raw, "Invalid score in payload");
            ExecutionError::Failed(format!("invalid score: {}", raw))
        }),
    }
}

#[async_trait]
impl Executor for LocalExecutor {
    async fn process(&self, job: &Job) -> Result<ExecutionResult, ExecutionError> {
        let payload = job.payload();
        let latency = self.latency_for(job);
        let started = self.time_provider.now_millis();

        debug!(job_id = %job.id(), phase = %job.phase(), latency_ms = latency.as_millis() as u64, "Simulating work");
        tokio::time::sleep(latency).await;

        let elapsed_ms = (self.time_provider.now_millis() - started).max(0);

        if payload.flag(SIMULATE_TIMEOUT) {
            info!(job_id = %job.id(), "Simulated timeout");
            return Err(ExecutionError::Timeout(elapsed_ms as u64));
        }

        if payload.flag(SIMULATE_FAIL) {
            info!(job_id = %job.id(), "Simulated failure");
            return Ok(ExecutionResult::error(Some(elapsed_ms)));
        }

        let score = score_of(job)?;
        let forward = payload.flag(FORWARD_TO_DYNAMIC);

        Ok(ExecutionResult::done(Some(score), forward, Some(elapsed_ms)))
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobqueue_core::domain::{JobPayload, Phase};
    use jobqueue_core::port::time_provider::SystemTimeProvider;
    use jobqueue_core::port::ExecutionStatus;
    use serde_json::json;
    use std::time::Instant;

    fn executor() -> LocalExecutor {
        LocalExecutor::new(Duration::from_millis(5), Arc::new(SystemTimeProvider))
    }

    fn job(payload: serde_json::Value) -> Job {
        Job::new(
            "job-1",
            Phase::Static,
            JobPayload::from_value(payload).unwrap(),
            0,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_default_result_is_done_without_forward() {
        let result = executor().process(&job(json!({}))).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::Done);
        assert_eq!(result.score, Some(0.0));
        assert!(!result.forward);
        assert!(result.processing_time_ms.unwrap() >= 0);
    }

    #[tokio::test]
    async fn test_score_and_forward_come_from_payload() {
        let result = executor()
            .process(&job(json!({"forward_to_dynamic": true, "score": 0.8})))
            .await
            .unwrap();

        assert!(result.is_done());
        assert_eq!(result.score, Some(0.8));
        assert!(result.forward);
    }

    #[tokio::test]
    async fn test_numeric_string_score_is_accepted() {
        let result = executor()
            .process(&job(json!({"score": "0.25"})))
            .await
            .unwrap();

        assert_eq!(result.score, Some(0.25));
    }

    #[tokio::test]
    async fn test_non_numeric_score_fails_attempt() {
        for score in [json!(null), json!("high"), json!({"value": 1})] {
            let err = executor()
                .process(&job(json!({"score": score})))
                .await
                .unwrap_err();

            assert!(!err.is_timeout());
            assert!(matches!(err, ExecutionError::Failed(ref msg) if msg.starts_with("invalid score")));
        }
    }

    #[tokio::test]
    async fn test_simulate_fail_reports_error_status() {
        let result = executor()
            .process(&job(json!({"simulate_fail": true, "forward_to_dynamic": true})))
            .await
            .unwrap();

        assert_eq!(result.status, ExecutionStatus::Error);
        assert!(!result.forward);
    }

    #[tokio::test]
    async fn test_simulate_timeout_is_timeout_kind() {
        let err = executor()
            .process(&job(json!({"simulate_timeout": true})))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_payload_latency_overrides_default() {
        let slow_default = LocalExecutor::new(Duration::from_secs(30), Arc::new(SystemTimeProvider));
        let started = Instant::now();

        slow_default
            .process(&job(json!({"simulated_latency": 0.02})))
            .await
            .unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_latency_falls_back_to_default() {
        let exec = executor();
        assert_eq!(exec.latency_for(&job(json!({"simulated_latency": -1.0}))), Duration::from_millis(5));
        assert_eq!(exec.latency_for(&job(json!({"simulated_latency": "abc"}))), Duration::from_millis(5));
        assert_eq!(exec.latency_for(&job(json!({"simulated_latency": "0.5"}))), Duration::from_millis(500));
    }
}
