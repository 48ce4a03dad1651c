//! Phase Job Queue - Main Entry Point
//! HTTP gateway + per-phase worker pool

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use config::Settings;
use jobqueue_api_http::{HttpHandler, HttpServer, HttpServerConfig};
use jobqueue_core::application::{
    MetricsCollector, PhaseExecutors, PhaseQueues, SubmissionService, WorkerContext, WorkerPool,
};
use jobqueue_core::domain::Phase;
use jobqueue_core::port::time_provider::SystemTimeProvider;
use jobqueue_core::port::TimeProvider;
use jobqueue_infra_executor::build_executor;
use jobqueue_infra_postgres::connect_notifier;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() -> Result<()> {
    let log_format =
        std::env::var("JOBQUEUE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("jobqueue=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    init_logging()?;

    info!("Phase Job Queue v{} starting...", VERSION);

    // 2. Load configuration
    let settings = Settings::parse();
    settings.validate().context("Invalid configuration")?;
    info!(settings = ?settings, "Loaded settings");

    // 3. Notifier (null object when the metadata store is absent or down)
    let notifier = connect_notifier(settings.store_config()).await;

    // 4. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let metrics = Arc::new(MetricsCollector::new());
    let queues = Arc::new(
        PhaseQueues::with_capacities(
            settings.static_queue_maxsize,
            settings.dynamic_queue_maxsize,
            settings.admission_timeout(),
            notifier.clone(),
            metrics.clone(),
        )
        .context("Queue setup failed")?,
    );

    let executor_settings = settings.executor_settings();
    let executors = PhaseExecutors {
        static_executor: build_executor(&executor_settings, Phase::Static, time_provider.clone())
            .context("Static executor setup failed")?,
        dynamic_executor: build_executor(&executor_settings, Phase::Dynamic, time_provider.clone())
            .context("Dynamic executor setup failed")?,
    };

    // 5. Start workers
    info!("Starting workers...");
    let pool = WorkerPool::start(
        settings.pool_config(),
        executors,
        WorkerContext {
            queues: queues.clone(),
            notifier,
            metrics: metrics.clone(),
            retry_policy: settings.retry_policy(),
            time_provider: time_provider.clone(),
            poll_timeout: settings.poll_timeout(),
        },
    );

    // 6. Start HTTP gateway (blocks until shutdown signal)
    let handler = HttpHandler::new(
        SubmissionService::new(queues, time_provider),
        metrics,
        settings.pool_config(),
    );
    let server = HttpServer::new(
        HttpServerConfig {
            port: settings.port,
            ..Default::default()
        },
        handler,
    );

    info!("System ready. Press Ctrl+C to shutdown");
    let served = server.run(shutdown_signal()).await;

    // 7. Graceful shutdown (bounded, queued jobs are not drained)
    let aborted = pool.shutdown(settings.shutdown_grace()).await;
    if aborted > 0 {
        warn!(aborted, "Some workers were aborted mid-job");
    }

    served.context("HTTP gateway failed")?;
    info!("Shutdown complete.");

    Ok(())
}
