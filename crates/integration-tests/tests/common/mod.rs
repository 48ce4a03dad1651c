//! Shared wiring for integration tests: real queues, pool and local executor,
//! recording notifier in place of the metadata store

#![allow(dead_code)]

use jobqueue_core::application::{
    Counter, MetricsCollector, PhaseExecutors, PhaseQueues, PoolConfig, RetryPolicy,
    SubmissionService, SubmitRequest, WorkerContext, WorkerPool,
};
use jobqueue_core::domain::Phase;
use jobqueue_core::port::notifier::mocks::RecordingNotifier;
use jobqueue_core::port::time_provider::SystemTimeProvider;
use jobqueue_core::port::TimeProvider;
use jobqueue_infra_executor::LocalExecutor;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct Harness {
    pub queues: Arc<PhaseQueues>,
    pub notifier: Arc<RecordingNotifier>,
    pub metrics: Arc<MetricsCollector>,
    pub submission: SubmissionService,
    pub pool_config: PoolConfig,
    pub pool: Option<WorkerPool>,
}

pub struct Setup {
    pub static_capacity: usize,
    pub dynamic_capacity: usize,
    pub static_workers: usize,
    pub dynamic_workers: usize,
    pub max_retries: u32,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            static_capacity: 16,
            dynamic_capacity: 16,
            static_workers: 2,
            dynamic_workers: 2,
            max_retries: 3,
        }
    }
}

impl Harness {
    /// Build queues and start workers with a zero-latency local executor
    pub fn start(setup: Setup) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let metrics = Arc::new(MetricsCollector::new());
        let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
        let queues = Arc::new(
            PhaseQueues::with_capacities(
                setup.static_capacity,
                setup.dynamic_capacity,
                Duration::from_millis(20),
                notifier.clone(),
                metrics.clone(),
            )
            .expect("queues"),
        );

        let executor = Arc::new(LocalExecutor::new(Duration::ZERO, time_provider.clone()));
        let pool_config = PoolConfig {
            static_workers: setup.static_workers,
            dynamic_workers: setup.dynamic_workers,
        };
        let pool = WorkerPool::start(
            pool_config,
            PhaseExecutors {
                static_executor: executor.clone(),
                dynamic_executor: executor,
            },
            WorkerContext {
                queues: queues.clone(),
                notifier: notifier.clone(),
                metrics: metrics.clone(),
                retry_policy: RetryPolicy::new(setup.max_retries, Duration::from_millis(1)),
                time_provider: time_provider.clone(),
                poll_timeout: Duration::from_millis(20),
            },
        );

        Self {
            submission: SubmissionService::new(queues.clone(), time_provider),
            queues,
            notifier,
            metrics,
            pool_config,
            pool: Some(pool),
        }
    }

    pub async fn submit(&self, job_id: &str, phase: Phase, payload: serde_json::Value) {
        self.submission
            .submit(SubmitRequest::new(job_id, phase, payload))
            .await
            .expect("submission admitted");
    }

    /// Poll a counter until it reaches `target` or 5s pass
    pub async fn wait_for(&self, counter: Counter, target: u64) -> u64 {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let value = self.metrics.get(counter);
            if value >= target || Instant::now() >= deadline {
                return value;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    pub async fn stop(mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown(Duration::from_secs(2)).await;
        }
    }
}
