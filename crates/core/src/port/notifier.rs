// Notifier Port
// Best-effort status propagation to the external metadata store

use crate::domain::JobStatus;
use async_trait::async_trait;
use tracing::info;

/// Actor recorded for notifications issued by the queue itself (admission, pickup)
pub const JOB_QUEUE_ACTOR: &str = "JobQueue";

/// Notifier trait
///
/// Both calls are best-effort: implementations log their own failures and
/// report them through the returned `bool`. Callers never retry and never
/// change a job's outcome based on the result.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Record a status change for a job (idempotent per job_id/status)
    async fn notify_status(
        &self,
        job_id: &str,
        status: JobStatus,
        score: Option<f64>,
        processing_time_ms: Option<i64>,
        changed_by: &str,
    ) -> bool;

    /// Record a terminal error for a job
    async fn mark_job_error(&self, job_id: &str, message: &str, changed_by: &str) -> bool;
}

/// Null-object notifier used when no metadata store is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify_status(
        &self,
        job_id: &str,
        status: JobStatus,
        score: Option<f64>,
        _processing_time_ms: Option<i64>,
        _changed_by: &str,
    ) -> bool {
        info!(job_id = %job_id, status = %status, score = ?score, "Notifier (noop): status");
        true
    }

    async fn mark_job_error(&self, job_id: &str, message: &str, _changed_by: &str) -> bool {
        info!(job_id = %job_id, message = %message, "Notifier (noop): mark error");
        true
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// One recorded notifier call
    #[derive(Debug, Clone, PartialEq)]
    pub enum Notification {
        Status {
            job_id: String,
            status: JobStatus,
            score: Option<f64>,
            processing_time_ms: Option<i64>,
            changed_by: String,
        },
        Error {
            job_id: String,
            message: String,
            changed_by: String,
        },
    }

    impl Notification {
        pub fn job_id(&self) -> &str {
            match self {
                Notification::Status { job_id, .. } | Notification::Error { job_id, .. } => job_id,
            }
        }
    }

    /// Records every call; can be told to report failure to exercise best-effort paths
    #[derive(Default)]
    pub struct RecordingNotifier {
        calls: Mutex<Vec<Notification>>,
        failing: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Notifier whose store is "down": every call is recorded and returns false
        pub fn new_failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: true,
            }
        }

        pub fn calls(&self) -> Vec<Notification> {
            self.calls.lock().unwrap().clone()
        }

        /// Calls for one job, in order
        pub fn calls_for(&self, job_id: &str) -> Vec<Notification> {
            self.calls()
                .into_iter()
                .filter(|n| n.job_id() == job_id)
                .collect()
        }

        /// Status tokens sent for one job, in order
        pub fn statuses_for(&self, job_id: &str) -> Vec<JobStatus> {
            self.calls_for(job_id)
                .into_iter()
                .filter_map(|n| match n {
                    Notification::Status { status, .. } => Some(status),
                    Notification::Error { .. } => None,
                })
                .collect()
        }

        /// Terminal error messages for one job, in order
        pub fn errors_for(&self, job_id: &str) -> Vec<String> {
            self.calls_for(job_id)
                .into_iter()
                .filter_map(|n| match n {
                    Notification::Error { message, .. } => Some(message),
                    Notification::Status { .. } => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify_status(
            &self,
            job_id: &str,
            status: JobStatus,
            score: Option<f64>,
            processing_time_ms: Option<i64>,
            changed_by: &str,
        ) -> bool {
            self.calls.lock().unwrap().push(Notification::Status {
                job_id: job_id.to_string(),
                status,
                score,
                processing_time_ms,
                changed_by: changed_by.to_string(),
            });
            !self.failing
        }

        async fn mark_job_error(&self, job_id: &str, message: &str, changed_by: &str) -> bool {
            self.calls.lock().unwrap().push(Notification::Error {
                job_id: job_id.to_string(),
                message: message.to_string(),
                changed_by: changed_by.to_string(),
            });
            !self.failing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Phase;

    #[tokio::test]
    async fn test_noop_notifier_always_succeeds() {
        let notifier = NoopNotifier;
        assert!(
            notifier
                .notify_status("job-1", JobStatus::Queued, None, None, JOB_QUEUE_ACTOR)
                .await
        );
        assert!(
            notifier
                .notify_status("job-1", Phase::Static.into(), Some(0.5), Some(10), "static-1")
                .await
        );
        assert!(notifier.mark_job_error("job-1", "boom", "static-1").await);
    }
}
