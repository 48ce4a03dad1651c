// Metrics Collector - process-wide counters shared by queues and workers

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Counters tracked by the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    EnqueueCount,
    EnqueueFailQueueFull,
    WorkerTimeouts,
    WorkerRetries,
    JobsProcessed,
    JobsError,
}

impl Counter {
    pub const ALL: [Counter; 6] = [
        Counter::EnqueueCount,
        Counter::EnqueueFailQueueFull,
        Counter::WorkerTimeouts,
        Counter::WorkerRetries,
        Counter::JobsProcessed,
        Counter::JobsError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::EnqueueCount => "enqueue_count",
            Counter::EnqueueFailQueueFull => "enqueue_fail_queue_full",
            Counter::WorkerTimeouts => "worker_timeouts",
            Counter::WorkerRetries => "worker_retries",
            Counter::JobsProcessed => "jobs_processed",
            Counter::JobsError => "jobs_error",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricsSnapshot(BTreeMap<&'static str, u64>);

impl MetricsSnapshot {
    pub fn get(&self, counter: Counter) -> u64 {
        self.0.get(counter.as_str()).copied().unwrap_or(0)
    }

    pub fn as_map(&self) -> &BTreeMap<&'static str, u64> {
        &self.0
    }
}

/// Lock-protected counter table.
///
/// Increments and snapshots take the same lock, so a snapshot never mixes
/// values from before and after a concurrent increment.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: Mutex<[u64; Counter::ALL.len()]>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self, counter: Counter) {
        self.inc_by(counter, 1);
    }

    pub fn inc_by(&self, counter: Counter, n: u64) {
        let mut counters = self.counters.lock();
        counters[counter.index()] = counters[counter.index()].saturating_add(n);
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.counters.lock()[counter.index()]
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = *self.counters.lock();
        MetricsSnapshot(
            Counter::ALL
                .iter()
                .map(|c| (c.as_str(), counters[c.index()]))
                .collect(),
        )
    }
}
