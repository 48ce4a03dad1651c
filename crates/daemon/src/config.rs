//! Daemon settings: command-line flags with environment fallbacks

use clap::Parser;
use jobqueue_core::application::{PoolConfig, RetryPolicy};
use jobqueue_infra_executor::ExecutorSettings;
use jobqueue_infra_postgres::PgStoreConfig;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be greater than 0")]
    ZeroCapacity { name: &'static str },

    #[error("{name} must be a positive number of seconds (got {value})")]
    NonPositiveTimeout { name: &'static str, value: f64 },

    #[error("{name} must not be negative (got {value})")]
    NegativeDuration { name: &'static str, value: f64 },

    #[error("{name} is not a valid http(s) URL: {url}")]
    InvalidUrl { name: &'static str, url: String },
}

#[derive(Parser, Clone, PartialEq)]
#[command(name = "jobqueue-daemon", version, about = "Two-phase bounded job queue", long_about = None)]
pub struct Settings {
    /// Capacity of the static queue
    #[arg(long, env = "STATIC_QUEUE_MAXSIZE", default_value = "100")]
    pub static_queue_maxsize: usize,

    /// Capacity of the dynamic queue
    #[arg(long, env = "DYNAMIC_QUEUE_MAXSIZE", default_value = "100")]
    pub dynamic_queue_maxsize: usize,

    /// Number of static-phase workers
    #[arg(long, env = "STATIC_WORKERS", default_value = "2")]
    pub static_workers: usize,

    /// Number of dynamic-phase workers
    #[arg(long, env = "DYNAMIC_WORKERS", default_value = "2")]
    pub dynamic_workers: usize,

    /// Delegate work to remote HTTP workers where a URL is set
    /// (env accepts 1/0, yes/no, true/false in any case)
    #[arg(
        long,
        env = "WORKER_HTTP_MODE",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub worker_http_mode: bool,

    /// Remote worker URL for the static phase
    #[arg(long, env = "STATIC_WORKER_URL", default_value = "")]
    pub static_worker_url: String,

    /// Remote worker URL for the dynamic phase
    #[arg(long, env = "DYNAMIC_WORKER_URL", default_value = "")]
    pub dynamic_worker_url: String,

    /// Retries after the first attempt
    #[arg(long, env = "MAX_WORKER_RETRIES", default_value = "3")]
    pub max_worker_retries: u32,

    /// Seconds an enqueue may wait for room before rejecting
    #[arg(long, env = "QUEUE_ENQUEUE_TIMEOUT_SEC", default_value = "0.1")]
    pub queue_enqueue_timeout_sec: f64,

    /// Seconds before a remote worker call is a timeout
    #[arg(long, env = "WORKER_HTTP_TIMEOUT", default_value = "10.0")]
    pub worker_http_timeout: f64,

    /// Base of the exponential retry backoff, in seconds
    #[arg(long, env = "WORKER_RETRY_BASE_DELAY_SEC", default_value = "0.5")]
    pub worker_retry_base_delay_sec: f64,

    /// Seconds an idle worker waits on its queue between shutdown checks
    #[arg(long, env = "WORKER_POLL_TIMEOUT_SEC", default_value = "1.0")]
    pub worker_poll_timeout_sec: f64,

    /// Default latency of the local simulated executor, in seconds
    #[arg(long, env = "LOCAL_SIMULATED_LATENCY_SEC", default_value = "1.0")]
    pub local_simulated_latency_sec: f64,

    /// Seconds to wait for workers on shutdown
    #[arg(long, env = "SHUTDOWN_GRACE_SEC", default_value = "5.0")]
    pub shutdown_grace_sec: f64,

    /// HTTP gateway port
    #[arg(long, env = "PORT", default_value = "5003")]
    pub port: u16,

    /// Metadata store host
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Metadata store port
    #[arg(long, env = "DB_PORT", default_value = "5432")]
    pub db_port: u16,

    /// Metadata store database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Metadata store user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Metadata store password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("static_queue_maxsize", &self.static_queue_maxsize)
            .field("dynamic_queue_maxsize", &self.dynamic_queue_maxsize)
            .field("static_workers", &self.static_workers)
            .field("dynamic_workers", &self.dynamic_workers)
            .field("worker_http_mode", &self.worker_http_mode)
            .field("static_worker_url", &self.static_worker_url)
            .field("dynamic_worker_url", &self.dynamic_worker_url)
            .field("max_worker_retries", &self.max_worker_retries)
            .field("queue_enqueue_timeout_sec", &self.queue_enqueue_timeout_sec)
            .field("worker_http_timeout", &self.worker_http_timeout)
            .field("worker_retry_base_delay_sec", &self.worker_retry_base_delay_sec)
            .field("worker_poll_timeout_sec", &self.worker_poll_timeout_sec)
            .field("local_simulated_latency_sec", &self.local_simulated_latency_sec)
            .field("shutdown_grace_sec", &self.shutdown_grace_sec)
            .field("port", &self.port)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "***"))
            .finish()
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveTimeout { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeDuration { name, value })
    }
}

fn worker_url(name: &'static str, url: &str) -> Result<(), ConfigError> {
    let url = url.trim();
    if url.is_empty() {
        return Ok(());
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            name,
            url: url.to_string(),
        }),
    }
}

/// Seconds to Duration; values are range-checked by `validate` first
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.static_queue_maxsize == 0 {
            return Err(ConfigError::ZeroCapacity {
                name: "STATIC_QUEUE_MAXSIZE",
            });
        }
        if self.dynamic_queue_maxsize == 0 {
            return Err(ConfigError::ZeroCapacity {
                name: "DYNAMIC_QUEUE_MAXSIZE",
            });
        }

        positive("QUEUE_ENQUEUE_TIMEOUT_SEC", self.queue_enqueue_timeout_sec)?;
        positive("WORKER_HTTP_TIMEOUT", self.worker_http_timeout)?;
        positive("WORKER_POLL_TIMEOUT_SEC", self.worker_poll_timeout_sec)?;
        positive("SHUTDOWN_GRACE_SEC", self.shutdown_grace_sec)?;
        non_negative("WORKER_RETRY_BASE_DELAY_SEC", self.worker_retry_base_delay_sec)?;
        non_negative("LOCAL_SIMULATED_LATENCY_SEC", self.local_simulated_latency_sec)?;

        worker_url("STATIC_WORKER_URL", &self.static_worker_url)?;
        worker_url("DYNAMIC_WORKER_URL", &self.dynamic_worker_url)?;

        Ok(())
    }

    pub fn admission_timeout(&self) -> Duration {
        secs(self.queue_enqueue_timeout_sec)
    }

    pub fn poll_timeout(&self) -> Duration {
        secs(self.worker_poll_timeout_sec)
    }

    pub fn shutdown_grace(&self) -> Duration {
        secs(self.shutdown_grace_sec)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_worker_retries,
            secs(self.worker_retry_base_delay_sec),
        )
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            static_workers: self.static_workers,
            dynamic_workers: self.dynamic_workers,
        }
    }

    pub fn executor_settings(&self) -> ExecutorSettings {
        ExecutorSettings {
            http_mode: self.worker_http_mode,
            static_url: self.static_worker_url.clone(),
            dynamic_url: self.dynamic_worker_url.clone(),
            http_timeout: secs(self.worker_http_timeout),
            local_latency: secs(self.local_simulated_latency_sec),
        }
    }

    /// Metadata store settings, `None` unless host, database and user are set
    pub fn store_config(&self) -> Option<PgStoreConfig> {
        PgStoreConfig::from_parts(
            self.db_host.clone(),
            self.db_port,
            self.db_name.clone(),
            self.db_user.clone(),
            self.db_password.clone(),
        )
    }
}
