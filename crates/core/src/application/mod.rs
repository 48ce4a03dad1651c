// Application Layer - Use Cases, Queues and Workers

pub mod metrics;
pub mod queue;
pub mod retry;
pub mod submission;
pub mod worker;

// Re-exports
pub use metrics::{Counter, MetricsCollector, MetricsSnapshot};
pub use queue::{BoundedQueue, PhaseQueues, QueueConfig, QueueError};
pub use retry::{RetryDecision, RetryPolicy};
pub use submission::{SubmissionService, SubmitRequest};
pub use worker::{
    shutdown_channel, JobOutcome, PhaseExecutors, PoolConfig, ShutdownSender, ShutdownToken,
    Worker, WorkerContext, WorkerPool,
};
