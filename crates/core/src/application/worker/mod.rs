// Worker - per-phase job execution loop with retry/backoff and cross-phase forwarding

pub mod constants;
mod panic_guard;
mod pool;
mod shutdown;

use constants::*;
pub use panic_guard::{describe_join_error, panic_message};
pub use pool::{PhaseExecutors, PoolConfig, WorkerPool};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::metrics::{Counter, MetricsCollector};
use crate::application::queue::{PhaseQueues, QueueError};
use crate::application::retry::{RetryDecision, RetryPolicy};
use crate::domain::{Job, JobStatus, Phase};
use crate::port::{
    ExecutionError, ExecutionResult, Executor, Notifier, TimeProvider, JOB_QUEUE_ACTOR,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// How a dequeued job left the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Executor finished the job and asked for nothing more
    Done,
    /// Executor asked to forward but the phase has no successor
    PhaseComplete,
    /// Forwarded into the next phase's queue
    Forwarded { to: Phase },
    /// Phase succeeded but the next phase's queue refused the job
    ForwardRejected { to: Phase },
    /// Every attempt failed; the job is dropped
    RetriesExhausted { attempts: u32 },
}

/// Dependencies shared by every worker of the pool
#[derive(Clone)]
pub struct WorkerContext {
    pub queues: Arc<PhaseQueues>,
    pub notifier: Arc<dyn Notifier>,
    pub metrics: Arc<MetricsCollector>,
    pub retry_policy: RetryPolicy,
    pub time_provider: Arc<dyn TimeProvider>,
    pub poll_timeout: Duration,
}

/// Worker bound to one phase and its queue
pub struct Worker {
    name: String,
    phase: Phase,
    executor: Arc<dyn Executor>,
    ctx: WorkerContext,
}

impl Worker {
    pub fn new(
        name: impl Into<String>,
        phase: Phase,
        executor: Arc<dyn Executor>,
        ctx: WorkerContext,
    ) -> Self {
        Self {
            name: name.into(),
            phase,
            executor,
            ctx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run worker loop until shutdown is signalled.
    ///
    /// Shutdown is only observed while idle: a job that was already dequeued
    /// runs through its whole retry loop first.
    pub async fn run(&self, mut shutdown: ShutdownToken) {
        info!(
            worker = %self.name,
            phase = %self.phase,
            executor = self.executor.kind(),
            "Worker started"
        );
        loop {
            if shutdown.is_shutdown() {
                info!(worker = %self.name, "Worker shutting down");
                break;
            }
            let job = tokio::select! {
                job = self.ctx.queues.dequeue(self.phase, self.ctx.poll_timeout) => job,
                _ = shutdown.wait() => {
                    info!(worker = %self.name, "Worker interrupted during idle");
                    break;
                }
            };
            // None: poll expired, loop back to re-check shutdown
            if let Some(job) = job {
                self.process(job).await;
            }
        }
        info!(worker = %self.name, "Worker stopped");
    }

    /// Drive one job to a terminal outcome
    pub async fn process(&self, job: Job) -> JobOutcome {
        info!(worker = %self.name, job_id = %job.id(), "Picked job");
        self.ctx
            .notifier
            .notify_status(job.id(), self.phase.into(), None, None, JOB_QUEUE_ACTOR)
            .await;

        match self.execute_with_retry(&job).await {
            Ok(result) => self.complete(&job, result).await,
            Err(attempts) => {
                error!(
                    worker = %self.name,
                    job_id = %job.id(),
                    attempts,
                    "Exhausted retries -> marking error"
                );
                self.ctx.metrics.inc(Counter::JobsError);
                let message = format!(
                    "worker failed after {} retries",
                    self.ctx.retry_policy.max_retries()
                );
                self.ctx
                    .notifier
                    .mark_job_error(job.id(), &message, &self.name)
                    .await;
                JobOutcome::RetriesExhausted { attempts }
            }
        }
    }

    /// Attempt the job until the executor reports `done` or the policy gives up.
    ///
    /// Returns the successful result, or the number of attempts made.
    async fn execute_with_retry(&self, job: &Job) -> Result<ExecutionResult, u32> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let timed_out = match self.execute_once(job).await {
                Ok(result) if result.is_done() => return Ok(result),
                Ok(_) => {
                    warn!(worker = %self.name, job_id = %job.id(), attempt, "Executor returned error");
                    false
                }
                Err(e) if e.is_timeout() => {
                    warn!(worker = %self.name, job_id = %job.id(), attempt, "Executor timeout");
                    true
                }
                Err(e) => {
                    warn!(worker = %self.name, job_id = %job.id(), attempt, error = %e, "Executor failed");
                    false
                }
            };

            match self.ctx.retry_policy.after_failure(job.id(), attempt) {
                RetryDecision::Retry(delay) => {
                    if timed_out {
                        self.ctx.metrics.inc(Counter::WorkerTimeouts);
                    }
                    self.ctx.metrics.inc(Counter::WorkerRetries);
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Exhausted => return Err(attempt),
            }
        }
    }

    /// One executor call, isolated in its own task so a panic becomes a failure
    async fn execute_once(&self, job: &Job) -> Result<ExecutionResult, ExecutionError> {
        let executor = Arc::clone(&self.executor);
        let job_for_exec = job.clone();

        let handle = tokio::task::spawn(async move { executor.process(&job_for_exec).await });

        match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(ExecutionError::Failed(describe_join_error(
                &self.name,
                job.id(),
                join_err,
            ))),
        }
    }

    /// Report success and forward when the executor asked for it
    async fn complete(&self, job: &Job, result: ExecutionResult) -> JobOutcome {
        info!(
            worker = %self.name,
            job_id = %job.id(),
            score = ?result.score,
            forward = result.forward,
            "Job done"
        );

        // forward=true reports the phase name: "phase complete, pipeline not finished"
        let status = if result.forward {
            JobStatus::InPhase(self.phase)
        } else {
            JobStatus::Done
        };
        self.ctx
            .notifier
            .notify_status(
                job.id(),
                status,
                result.score,
                result.processing_time_ms,
                &self.name,
            )
            .await;
        self.ctx.metrics.inc(Counter::JobsProcessed);

        if !result.forward {
            return JobOutcome::Done;
        }
        match self.phase.next() {
            Some(next) => self.forward(job, next).await,
            None => JobOutcome::PhaseComplete,
        }
    }

    async fn forward(&self, job: &Job, to: Phase) -> JobOutcome {
        let forwarded = match job.forward_to(to, self.ctx.time_provider.now_millis()) {
            Ok(forwarded) => forwarded,
            Err(e) => {
                error!(worker = %self.name, job_id = %job.id(), error = %e, "Cannot forward job");
                self.ctx
                    .notifier
                    .mark_job_error(job.id(), &e.to_string(), &self.name)
                    .await;
                return JobOutcome::ForwardRejected { to };
            }
        };

        match self.ctx.queues.enqueue(forwarded).await {
            Ok(()) => {
                info!(worker = %self.name, job_id = %job.id(), to = %to, "Forwarded job");
                JobOutcome::Forwarded { to }
            }
            Err(e) => {
                warn!(
                    worker = %self.name,
                    job_id = %job.id(),
                    to = %to,
                    error = %e,
                    "Failed to forward job (queue saturated)"
                );
                let message = match e {
                    QueueError::Full { .. } => FORWARD_QUEUE_FULL_MESSAGE.to_string(),
                    QueueError::Closed { .. } => format!("failed to forward: {}", e),
                };
                self.ctx
                    .notifier
                    .mark_job_error(job.id(), &message, &self.name)
                    .await;
                JobOutcome::ForwardRejected { to }
            }
        }
    }
}
