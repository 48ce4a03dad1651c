// Bounded per-phase queues with fail-fast admission control

use crate::application::metrics::{Counter, MetricsCollector};
use crate::domain::{Job, JobStatus, Phase};
use crate::port::{Notifier, JOB_QUEUE_ACTOR};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

/// Admission errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("{phase} queue is full (capacity {capacity})")]
    Full { phase: Phase, capacity: usize },

    #[error("{phase} queue is closed")]
    Closed { phase: Phase },
}

/// Queue configuration
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub phase: Phase,
    pub capacity: usize,
    /// How long `enqueue` may wait for room before rejecting
    pub admission_timeout: Duration,
}

impl QueueConfig {
    pub fn new(phase: Phase, capacity: usize, admission_timeout: Duration) -> Self {
        Self {
            phase,
            capacity,
            admission_timeout,
        }
    }
}

/// Bounded queue for one phase.
///
/// Producers push through the channel sender. Workers compete for the single
/// receiver behind an async mutex, so every job is handed to exactly one
/// worker.
pub struct BoundedQueue {
    phase: Phase,
    capacity: usize,
    admission_timeout: Duration,
    sender: mpsc::Sender<Job>,
    receiver: Mutex<mpsc::Receiver<Job>>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<MetricsCollector>,
}

impl std::fmt::Debug for BoundedQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("phase", &self.phase)
            .field("capacity", &self.capacity)
            .field("admission_timeout", &self.admission_timeout)
            .finish_non_exhaustive()
    }
}

impl BoundedQueue {
    /// Create a queue; capacity must be at least 1
    pub fn new(
        config: QueueConfig,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<MetricsCollector>,
    ) -> crate::Result<Self> {
        if config.capacity == 0 {
            return Err(crate::AppError::Config(format!(
                "{} queue capacity must be greater than 0",
                config.phase
            )));
        }
        let (sender, receiver) = mpsc::channel(config.capacity);
        Ok(Self {
            phase: config.phase,
            capacity: config.capacity,
            admission_timeout: config.admission_timeout,
            sender,
            receiver: Mutex::new(receiver),
            notifier,
            metrics,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of jobs currently waiting in the queue
    pub fn depth(&self) -> usize {
        self.capacity.saturating_sub(self.sender.capacity())
    }

    /// Admit a job, waiting at most the admission timeout for room.
    ///
    /// On success the job is reported as `queued`; on rejection the caller is
    /// expected to surface a "try later" signal.
    pub async fn enqueue(&self, job: Job) -> Result<(), QueueError> {
        let job_id = job.id().to_string();

        match self.sender.send_timeout(job, self.admission_timeout).await {
            Ok(()) => {
                self.metrics.inc(Counter::EnqueueCount);
                self.notifier
                    .notify_status(&job_id, JobStatus::Queued, None, None, JOB_QUEUE_ACTOR)
                    .await;
                info!(job_id = %job_id, phase = %self.phase, "Enqueued job");
                Ok(())
            }
            Err(mpsc::error::SendTimeoutError::Timeout(_)) => {
                self.metrics.inc(Counter::EnqueueFailQueueFull);
                warn!(
                    job_id = %job_id,
                    phase = %self.phase,
                    capacity = self.capacity,
                    "Failed to enqueue job: queue full"
                );
                Err(QueueError::Full {
                    phase: self.phase,
                    capacity: self.capacity,
                })
            }
            Err(mpsc::error::SendTimeoutError::Closed(_)) => {
                Err(QueueError::Closed { phase: self.phase })
            }
        }
    }

    /// Take the next job, waiting at most `timeout`.
    ///
    /// `None` only means the wait expired; workers use it as a chance to
    /// check for shutdown.
    pub async fn dequeue(&self, timeout: Duration) -> Option<Job> {
        tokio::time::timeout(timeout, async {
            let mut receiver = self.receiver.lock().await;
            receiver.recv().await
        })
        .await
        .ok()
        .flatten()
    }
}

/// Both phase queues, routing by phase
pub struct PhaseQueues {
    static_queue: BoundedQueue,
    dynamic_queue: BoundedQueue,
}

impl PhaseQueues {
    pub fn new(static_queue: BoundedQueue, dynamic_queue: BoundedQueue) -> crate::Result<Self> {
        if static_queue.phase() != Phase::Static || dynamic_queue.phase() != Phase::Dynamic {
            return Err(crate::AppError::Config(
                "queues must be given in (static, dynamic) order".to_string(),
            ));
        }
        Ok(Self {
            static_queue,
            dynamic_queue,
        })
    }

    /// Build both queues from capacities sharing one admission timeout
    pub fn with_capacities(
        static_capacity: usize,
        dynamic_capacity: usize,
        admission_timeout: Duration,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<MetricsCollector>,
    ) -> crate::Result<Self> {
        let static_queue = BoundedQueue::new(
            QueueConfig::new(Phase::Static, static_capacity, admission_timeout),
            Arc::clone(&notifier),
            Arc::clone(&metrics),
        )?;
        let dynamic_queue = BoundedQueue::new(
            QueueConfig::new(Phase::Dynamic, dynamic_capacity, admission_timeout),
            notifier,
            metrics,
        )?;
        Self::new(static_queue, dynamic_queue)
    }

    pub fn get(&self, phase: Phase) -> &BoundedQueue {
        match phase {
            Phase::Static => &self.static_queue,
            Phase::Dynamic => &self.dynamic_queue,
        }
    }

    /// Admit a job into the queue of its own phase
    pub async fn enqueue(&self, job: Job) -> Result<(), QueueError> {
        self.get(job.phase()).enqueue(job).await
    }

    pub async fn dequeue(&self, phase: Phase, timeout: Duration) -> Option<Job> {
        self.get(phase).dequeue(timeout).await
    }
}
