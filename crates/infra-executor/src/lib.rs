// Phase Job Queue Infrastructure - Executor Adapters
// Implements: Executor (local simulation, remote HTTP worker)

pub mod local_executor;
pub mod remote_executor;

pub use local_executor::LocalExecutor;
pub use remote_executor::{RemoteExecutor, RemoteExecutorConfig};

use jobqueue_core::domain::Phase;
use jobqueue_core::port::{Executor, TimeProvider};
use jobqueue_core::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Settings that decide which executor each phase gets
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    /// Use remote workers where a URL is configured
    pub http_mode: bool,
    pub static_url: String,
    pub dynamic_url: String,
    pub http_timeout: Duration,
    /// Default latency of the local simulation
    pub local_latency: Duration,
}

impl ExecutorSettings {
    pub fn url_for(&self, phase: Phase) -> &str {
        match phase {
            Phase::Static => &self.static_url,
            Phase::Dynamic => &self.dynamic_url,
        }
    }
}

/// Pick the executor for one phase.
///
/// Remote only when HTTP mode is on and the phase has a non-empty URL;
/// every other combination falls back to the local simulation.
pub fn build_executor(
    settings: &ExecutorSettings,
    phase: Phase,
    time_provider: Arc<dyn TimeProvider>,
) -> Result<Arc<dyn Executor>> {
    let url = settings.url_for(phase).trim();
    if settings.http_mode && !url.is_empty() {
        info!(phase = %phase, url = %url, "Using remote executor");
        let executor = RemoteExecutor::new(RemoteExecutorConfig {
            url: url.to_string(),
            timeout: settings.http_timeout,
        })?;
        return Ok(Arc::new(executor));
    }

    if settings.http_mode {
        info!(phase = %phase, "HTTP mode enabled but no worker URL, using local executor");
    }
    Ok(Arc::new(LocalExecutor::new(
        settings.local_latency,
        time_provider,
    )))
}
