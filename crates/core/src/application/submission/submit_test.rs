//! Unit tests for submission validation and admission

use super::*;
use crate::application::metrics::{Counter, MetricsCollector};
use crate::domain::JobStatus;
use crate::port::notifier::mocks::RecordingNotifier;
use crate::port::time_provider::FixedTimeProvider;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn request(job_id: Option<&str>, phase: Option<&str>, payload: Option<serde_json::Value>) -> SubmitRequest {
    SubmitRequest {
        job_id: job_id.map(String::from),
        phase: phase.map(String::from),
        payload,
    }
}

fn assert_validation(result: Result<ValidSubmission>, expected: &str) {
    match result {
        Err(AppError::Validation(msg)) => assert_eq!(msg, expected),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_validate_missing_job_id() {
    let result = validate_request(request(None, Some("static"), None));
    assert_validation(result, ID_AND_PHASE_REQUIRED);
}

#[test]
fn test_validate_empty_job_id() {
    let result = validate_request(request(Some(""), Some("static"), None));
    assert_validation(result, ID_AND_PHASE_REQUIRED);
}

#[test]
fn test_validate_unknown_phase() {
    let result = validate_request(request(Some("job-1"), Some("runtime"), None));
    assert_validation(result, ID_AND_PHASE_REQUIRED);

    let result = validate_request(request(Some("job-1"), None, None));
    assert_validation(result, ID_AND_PHASE_REQUIRED);
}

#[test]
fn test_validate_payload_must_be_object() {
    let result = validate_request(request(Some("job-1"), Some("dynamic"), Some(json!([1, 2]))));
    assert_validation(result, PAYLOAD_MUST_BE_OBJECT);
}

#[test]
fn test_validate_missing_payload_defaults_to_empty() {
    let valid = validate_request(request(Some("job-1"), Some("dynamic"), None)).unwrap();
    assert_eq!(valid.phase, Phase::Dynamic);
    assert!(valid.payload.as_map().is_empty());
}

#[test]
fn test_request_deserializes_with_missing_fields() {
    let req: SubmitRequest = serde_json::from_value(json!({"phase": "static"})).unwrap();
    assert!(req.job_id.is_none());
    assert!(req.payload.is_none());
}

#[tokio::test]
async fn test_execute_admits_job_with_injected_time() {
    let notifier = Arc::new(RecordingNotifier::new());
    let metrics = Arc::new(MetricsCollector::new());
    let queues = PhaseQueues::with_capacities(
        2,
        2,
        Duration::from_millis(10),
        notifier.clone(),
        metrics.clone(),
    )
    .unwrap();
    let clock = FixedTimeProvider(42);

    let job = execute(
        &queues,
        &clock,
        SubmitRequest::new("job-1", Phase::Static, json!({"repo": "acme/app"})),
    )
    .await
    .unwrap();

    assert_eq!(job.enqueued_at(), 42);
    assert_eq!(job.payload().get("repo"), Some(&json!("acme/app")));
    assert_eq!(queues.get(Phase::Static).depth(), 1);
    assert_eq!(notifier.statuses_for("job-1"), vec![JobStatus::Queued]);
    assert_eq!(metrics.get(Counter::EnqueueCount), 1);
}

#[tokio::test]
async fn test_execute_invalid_request_touches_nothing() {
    let notifier = Arc::new(RecordingNotifier::new());
    let metrics = Arc::new(MetricsCollector::new());
    let queues = PhaseQueues::with_capacities(
        2,
        2,
        Duration::from_millis(10),
        notifier.clone(),
        metrics.clone(),
    )
    .unwrap();

    let result = execute(&queues, &FixedTimeProvider(0), request(None, Some("static"), None)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(notifier.calls().is_empty());
    assert_eq!(metrics.get(Counter::EnqueueCount), 0);
    assert_eq!(metrics.get(Counter::EnqueueFailQueueFull), 0);
}

#[tokio::test]
async fn test_execute_saturated_queue_is_admission_rejected() {
    let notifier = Arc::new(RecordingNotifier::new());
    let metrics = Arc::new(MetricsCollector::new());
    let queues = PhaseQueues::with_capacities(
        1,
        1,
        Duration::from_millis(10),
        notifier,
        metrics.clone(),
    )
    .unwrap();
    let clock = FixedTimeProvider(0);

    execute(&queues, &clock, SubmitRequest::new("A", Phase::Static, json!({})))
        .await
        .unwrap();
    let result = execute(&queues, &clock, SubmitRequest::new("B", Phase::Static, json!({}))).await;

    assert!(matches!(
        result,
        Err(AppError::AdmissionRejected {
            phase: Phase::Static,
            capacity: 1
        })
    ));
    assert_eq!(metrics.get(Counter::EnqueueFailQueueFull), 1);
}
