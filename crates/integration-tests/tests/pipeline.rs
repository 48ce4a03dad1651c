//! End-to-end pipeline tests: submission -> static workers -> forwarding ->
//! dynamic workers, with the local executor driven by payload flags

mod common;

use common::{Harness, Setup};
use jobqueue_core::application::Counter;
use jobqueue_core::domain::{JobStatus, Phase};
use jobqueue_core::port::notifier::mocks::Notification;
use serde_json::json;

#[tokio::test]
async fn test_plain_job_reports_done() {
    let h = Harness::start(Setup::default());

    h.submit("job-1", Phase::Static, json!({"score": 0.3})).await;

    assert_eq!(h.wait_for(Counter::JobsProcessed, 1).await, 1);
    let statuses = h.notifier.statuses_for("job-1");
    assert!(statuses.contains(&JobStatus::Queued));
    assert_eq!(statuses.last(), Some(&JobStatus::Done));
    assert_eq!(h.metrics.get(Counter::WorkerRetries), 0);
    assert_eq!(h.queues.get(Phase::Dynamic).depth(), 0);

    h.stop().await;
}

#[tokio::test]
async fn test_forwarding_static_job_reaches_dynamic_phase() {
    let h = Harness::start(Setup::default());

    h.submit(
        "apk-1",
        Phase::Static,
        json!({"forward_to_dynamic": true, "score": 0.8}),
    )
    .await;

    assert_eq!(h.wait_for(Counter::JobsProcessed, 2).await, 2);

    let calls = h.notifier.calls_for("apk-1");
    // Static success reports the phase name, never "done"
    assert!(calls.iter().any(|n| matches!(
        n,
        Notification::Status {
            status: JobStatus::InPhase(Phase::Static),
            score: Some(s),
            changed_by,
            ..
        } if *s == 0.8 && changed_by.starts_with("static-")
    )));
    let statuses = h.notifier.statuses_for("apk-1");
    assert!(!statuses.contains(&JobStatus::Done));
    assert!(statuses.contains(&JobStatus::InPhase(Phase::Dynamic)));
    // Admission into both queues
    assert_eq!(
        statuses.iter().filter(|s| **s == JobStatus::Queued).count(),
        2
    );
    assert_eq!(h.metrics.get(Counter::EnqueueCount), 2);
    assert!(h.notifier.errors_for("apk-1").is_empty());

    h.stop().await;
}

#[tokio::test]
async fn test_always_timing_out_job_exhausts_retries() {
    let h = Harness::start(Setup {
        max_retries: 2,
        ..Setup::default()
    });

    h.submit("job-t", Phase::Dynamic, json!({"simulate_timeout": true}))
        .await;

    assert_eq!(h.wait_for(Counter::JobsError, 1).await, 1);
    assert_eq!(h.metrics.get(Counter::WorkerTimeouts), 2);
    assert_eq!(h.metrics.get(Counter::WorkerRetries), 2);
    assert_eq!(h.metrics.get(Counter::JobsProcessed), 0);
    assert_eq!(
        h.notifier.errors_for("job-t"),
        vec!["worker failed after 2 retries".to_string()]
    );

    h.stop().await;
}

#[tokio::test]
async fn test_always_failing_job_gets_four_attempts() {
    let h = Harness::start(Setup::default());

    h.submit("job-f", Phase::Static, json!({"simulate_fail": true}))
        .await;

    assert_eq!(h.wait_for(Counter::JobsError, 1).await, 1);
    assert_eq!(h.metrics.get(Counter::WorkerRetries), 3);
    assert_eq!(h.metrics.get(Counter::WorkerTimeouts), 0);
    assert_eq!(
        h.notifier.errors_for("job-f"),
        vec!["worker failed after 3 retries".to_string()]
    );

    h.stop().await;
}

#[tokio::test]
async fn test_mixed_batch_accounts_for_every_job() {
    let h = Harness::start(Setup {
        static_capacity: 64,
        dynamic_capacity: 64,
        static_workers: 4,
        dynamic_workers: 2,
        max_retries: 1,
    });

    for i in 0..30 {
        let payload = match i % 3 {
            0 => json!({}),
            1 => json!({"forward_to_dynamic": true}),
            _ => json!({"simulate_fail": true}),
        };
        h.submit(&format!("job-{}", i), Phase::Static, payload).await;
    }

    // 10 plain + 10 static-forwarded + 10 dynamic continuations
    assert_eq!(h.wait_for(Counter::JobsProcessed, 30).await, 30);
    assert_eq!(h.wait_for(Counter::JobsError, 10).await, 10);
    assert_eq!(h.metrics.get(Counter::EnqueueCount), 40);

    h.stop().await;
}
