// Worker Pool - starts the per-phase workers and stops them on shutdown

use super::{shutdown_channel, ShutdownSender, Worker, WorkerContext};
use crate::domain::Phase;
use crate::port::Executor;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Worker counts per phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub static_workers: usize,
    pub dynamic_workers: usize,
}

impl PoolConfig {
    pub fn workers_for(&self, phase: Phase) -> usize {
        match phase {
            Phase::Static => self.static_workers,
            Phase::Dynamic => self.dynamic_workers,
        }
    }
}

/// Executor selected for each phase, shared by all workers of that phase
#[derive(Clone)]
pub struct PhaseExecutors {
    pub static_executor: Arc<dyn Executor>,
    pub dynamic_executor: Arc<dyn Executor>,
}

impl PhaseExecutors {
    pub fn get(&self, phase: Phase) -> Arc<dyn Executor> {
        match phase {
            Phase::Static => Arc::clone(&self.static_executor),
            Phase::Dynamic => Arc::clone(&self.dynamic_executor),
        }
    }
}

/// Running workers of both phases
pub struct WorkerPool {
    config: PoolConfig,
    shutdown_tx: ShutdownSender,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl WorkerPool {
    /// Spawn `<phase>-<n>` workers (n from 1) onto the current runtime
    pub fn start(config: PoolConfig, executors: PhaseExecutors, ctx: WorkerContext) -> Self {
        let (shutdown_tx, _token) = shutdown_channel();
        let mut handles = Vec::with_capacity(config.static_workers + config.dynamic_workers);

        for phase in Phase::ALL {
            let executor = executors.get(phase);
            for n in 1..=config.workers_for(phase) {
                let name = format!("{}-{}", phase, n);
                let worker = Worker::new(name.clone(), phase, Arc::clone(&executor), ctx.clone());
                let token = shutdown_tx.token();
                handles.push((name, tokio::spawn(async move { worker.run(token).await })));
            }
            info!(
                phase = %phase,
                workers = config.workers_for(phase),
                executor = executor.kind(),
                "Started phase workers"
            );
        }

        Self {
            config,
            shutdown_tx,
            handles,
        }
    }

    pub fn worker_count(&self, phase: Phase) -> usize {
        self.config.workers_for(phase)
    }

    pub fn worker_names(&self) -> Vec<&str> {
        self.handles.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Signal every worker and wait up to `grace` for them to stop.
    ///
    /// Workers still busy when the grace period ends are aborted; queued jobs
    /// are not drained. Returns the number of workers that had to be aborted.
    pub async fn shutdown(self, grace: Duration) -> usize {
        info!(workers = self.handles.len(), grace_ms = grace.as_millis() as u64, "Stopping workers");
        self.shutdown_tx.shutdown();

        let (names, mut handles): (Vec<String>, Vec<JoinHandle<()>>) =
            self.handles.into_iter().unzip();

        let joined = tokio::time::timeout(grace, join_all(handles.iter_mut())).await;
        match joined {
            Ok(results) => {
                for (name, result) in names.iter().zip(results) {
                    if let Err(e) = result {
                        error!(worker = %name, error = %e, "Worker task failed");
                    }
                }
                info!("All workers stopped");
                0
            }
            Err(_) => {
                let mut aborted = 0;
                for (name, handle) in names.iter().zip(&handles) {
                    if !handle.is_finished() {
                        warn!(worker = %name, "Worker did not stop within grace period, aborting");
                        handle.abort();
                        aborted += 1;
                    }
                }
                aborted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::metrics::{Counter, MetricsCollector};
    use crate::application::queue::PhaseQueues;
    use crate::application::retry::RetryPolicy;
    use crate::domain::{Job, JobPayload, JobStatus};
    use crate::port::executor::mocks::{MockBehavior, MockExecutor};
    use crate::port::notifier::mocks::RecordingNotifier;
    use crate::port::time_provider::FixedTimeProvider;
    use std::time::Instant;

    fn context(metrics: Arc<MetricsCollector>) -> WorkerContext {
        context_with(metrics, Arc::new(RecordingNotifier::new()))
    }

    fn context_with(metrics: Arc<MetricsCollector>, notifier: Arc<RecordingNotifier>) -> WorkerContext {
        let queues = PhaseQueues::with_capacities(
            16,
            16,
            Duration::from_millis(20),
            notifier.clone(),
            metrics.clone(),
        )
        .unwrap();
        WorkerContext {
            queues: Arc::new(queues),
            notifier,
            metrics,
            retry_policy: RetryPolicy::new(1, Duration::from_millis(1)),
            time_provider: Arc::new(FixedTimeProvider(0)),
            poll_timeout: Duration::from_millis(20),
        }
    }

    fn executors(static_executor: Arc<MockExecutor>, dynamic_executor: Arc<MockExecutor>) -> PhaseExecutors {
        PhaseExecutors {
            static_executor,
            dynamic_executor,
        }
    }

    #[tokio::test]
    async fn test_workers_are_named_per_phase() {
        let ctx = context(Arc::new(MetricsCollector::new()));
        let pool = WorkerPool::start(
            PoolConfig {
                static_workers: 2,
                dynamic_workers: 3,
            },
            executors(Arc::new(MockExecutor::new_done()), Arc::new(MockExecutor::new_done())),
            ctx,
        );

        assert_eq!(pool.worker_count(Phase::Static), 2);
        assert_eq!(pool.worker_count(Phase::Dynamic), 3);
        assert_eq!(
            pool.worker_names(),
            vec!["static-1", "static-2", "dynamic-1", "dynamic-2", "dynamic-3"]
        );

        assert_eq!(pool.shutdown(Duration::from_secs(1)).await, 0);
    }

    #[tokio::test]
    async fn test_each_phase_uses_its_own_executor() {
        let metrics = Arc::new(MetricsCollector::new());
        let ctx = context(metrics.clone());
        let queues = ctx.queues.clone();
        let static_executor = Arc::new(MockExecutor::new_done());
        let dynamic_executor = Arc::new(MockExecutor::new_done());
        let pool = WorkerPool::start(
            PoolConfig {
                static_workers: 1,
                dynamic_workers: 1,
            },
            executors(static_executor.clone(), dynamic_executor.clone()),
            ctx,
        );

        let payload = JobPayload::default();
        queues
            .enqueue(Job::new("s", Phase::Static, payload.clone(), 0).unwrap())
            .await
            .unwrap();
        queues
            .enqueue(Job::new("d", Phase::Dynamic, payload, 0).unwrap())
            .await
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while metrics.get(Counter::JobsProcessed) < 2 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(static_executor.calls(), vec!["s"]);
        assert_eq!(dynamic_executor.calls(), vec!["d"]);
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_busy_worker_is_aborted_after_grace() {
        let ctx = context(Arc::new(MetricsCollector::new()));
        let queues = ctx.queues.clone();
        let slow = Arc::new(MockExecutor::new_done().with_latency(Duration::from_secs(30)));
        let pool = WorkerPool::start(
            PoolConfig {
                static_workers: 1,
                dynamic_workers: 0,
            },
            executors(slow.clone(), Arc::new(MockExecutor::new_done())),
            ctx,
        );

        queues
            .enqueue(Job::new("slow", Phase::Static, JobPayload::default(), 0).unwrap())
            .await
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while slow.call_count() == 0 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let started = Instant::now();
        let aborted = pool.shutdown(Duration::from_millis(50)).await;

        assert_eq!(aborted, 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    async fn wait_for_calls(executor: &MockExecutor, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while executor.call_count() < n && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    #[tokio::test]
    async fn test_shutdown_lets_running_attempt_finish() {
        let metrics = Arc::new(MetricsCollector::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = context_with(metrics.clone(), notifier.clone());
        let queues = ctx.queues.clone();
        let executor = Arc::new(MockExecutor::new_done().with_latency(Duration::from_millis(100)));
        let pool = WorkerPool::start(
            PoolConfig {
                static_workers: 1,
                dynamic_workers: 0,
            },
            executors(executor.clone(), Arc::new(MockExecutor::new_done())),
            ctx,
        );

        queues
            .enqueue(Job::new("busy", Phase::Static, JobPayload::default(), 0).unwrap())
            .await
            .unwrap();
        wait_for_calls(&executor, 1).await;
        assert_eq!(executor.call_count(), 1);

        assert_eq!(pool.shutdown(Duration::from_secs(2)).await, 0);

        assert_eq!(metrics.get(Counter::JobsProcessed), 1);
        assert_eq!(notifier.statuses_for("busy").last(), Some(&JobStatus::Done));
    }

    #[tokio::test]
    async fn test_shutdown_lets_retry_loop_finish() {
        let metrics = Arc::new(MetricsCollector::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = context_with(metrics.clone(), notifier.clone());
        let queues = ctx.queues.clone();
        let executor = Arc::new(
            MockExecutor::new_done()
                .with_script([MockBehavior::ErrorStatus])
                .with_latency(Duration::from_millis(40)),
        );
        let pool = WorkerPool::start(
            PoolConfig {
                static_workers: 1,
                dynamic_workers: 0,
            },
            executors(executor.clone(), Arc::new(MockExecutor::new_done())),
            ctx,
        );

        queues
            .enqueue(Job::new("flaky", Phase::Static, JobPayload::default(), 0).unwrap())
            .await
            .unwrap();
        // Stop arrives during the first (failing) attempt
        wait_for_calls(&executor, 1).await;

        assert_eq!(pool.shutdown(Duration::from_secs(2)).await, 0);

        assert_eq!(executor.call_count(), 2);
        assert_eq!(metrics.get(Counter::WorkerRetries), 1);
        assert_eq!(metrics.get(Counter::JobsProcessed), 1);
        assert_eq!(notifier.statuses_for("flaky").last(), Some(&JobStatus::Done));
    }
}
