// Executor Port
// Abstraction over the unit of work performed for one job (local simulation or remote worker call)

use crate::domain::Job;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of one executor invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub status: ExecutionStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub processing_time_ms: Option<i64>,
    #[serde(default)]
    pub forward: bool,
}

impl ExecutionResult {
    pub fn done(score: Option<f64>, forward: bool, processing_time_ms: Option<i64>) -> Self {
        Self {
            status: ExecutionStatus::Done,
            score,
            processing_time_ms,
            forward,
        }
    }

    pub fn error(processing_time_ms: Option<i64>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            score: None,
            processing_time_ms,
            forward: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == ExecutionStatus::Done
    }
}

/// Executor-reported status. Anything other than `"done"` on the wire reads as `Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ExecutionStatus {
    Done,
    #[default]
    Error,
}

impl From<String> for ExecutionStatus {
    fn from(s: String) -> Self {
        if s == "done" {
            ExecutionStatus::Done
        } else {
            ExecutionStatus::Error
        }
    }
}

/// Execution errors, tagged so the retry loop can tell timeouts from other failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Executor timeout after {0}ms")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Executor failed: {0}")]
    Failed(String),
}

impl ExecutionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutionError::Timeout(_))
    }
}

/// Executor trait
///
/// Implementations:
/// - LocalExecutor: simulated work with payload-driven fault injection
/// - RemoteExecutor: HTTP call to an external analysis worker
///
/// One instance is selected per phase at startup and shared by every worker of that phase.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Perform the work for one job
    ///
    /// # Errors
    /// - ExecutionError::Timeout if the work exceeded the executor's deadline
    /// - any other variant for transport, protocol or executor failures
    async fn process(&self, job: &Job) -> Result<ExecutionResult, ExecutionError>;

    /// Short name used in logs ("local", "remote")
    fn kind(&self) -> &'static str;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock executor behavior for a single call
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Return status done
        Done { score: Option<f64>, forward: bool },
        /// Return status error (executor-reported failure, not an Err)
        ErrorStatus,
        /// Fail with a generic error
        Fail(String),
        /// Fail with the timeout kind
        Timeout,
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    impl MockBehavior {
        pub fn done() -> Self {
            MockBehavior::Done {
                score: None,
                forward: false,
            }
        }

        pub fn forward(score: f64) -> Self {
            MockBehavior::Done {
                score: Some(score),
                forward: true,
            }
        }
    }

    /// Mock Executor for testing
    ///
    /// Plays scripted behaviors in order, then repeats the fallback behavior.
    /// Records the id of every job it was called with.
    pub struct MockExecutor {
        script: Mutex<VecDeque<MockBehavior>>,
        fallback: MockBehavior,
        latency: Duration,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockExecutor {
        pub fn new(fallback: MockBehavior) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback,
                latency: Duration::ZERO,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_done() -> Self {
            Self::new(MockBehavior::done())
        }

        pub fn new_timeout() -> Self {
            Self::new(MockBehavior::Timeout)
        }

        pub fn new_error_status() -> Self {
            Self::new(MockBehavior::ErrorStatus)
        }

        /// Behaviors played before falling back
        pub fn with_script(self, script: impl IntoIterator<Item = MockBehavior>) -> Self {
            *self.script.lock().unwrap() = script.into_iter().collect();
            self
        }

        /// Simulated work time per call
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Job ids in call order (one entry per attempt)
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Executor for MockExecutor {
        async fn process(&self, job: &Job) -> Result<ExecutionResult, ExecutionError> {
            self.calls.lock().unwrap().push(job.id().to_string());

            let behavior = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            match behavior {
                MockBehavior::Done { score, forward } => {
                    Ok(ExecutionResult::done(score, forward, Some(1)))
                }
                MockBehavior::ErrorStatus => Ok(ExecutionResult::error(Some(1))),
                MockBehavior::Fail(msg) => Err(ExecutionError::Failed(msg)),
                MockBehavior::Timeout => Err(ExecutionError::Timeout(1)),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }

        fn kind(&self) -> &'static str {
            "mock"
        }
    }
}
