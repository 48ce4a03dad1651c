// PostgreSQL Connection Pool Setup

use crate::notifier::PgNotifier;
use jobqueue_core::port::{NoopNotifier, Notifier};
use jobqueue_core::{AppError, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTIONS: u32 = 5;

/// Metadata store connection settings
#[derive(Clone)]
pub struct PgStoreConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: Option<String>,
}

impl PgStoreConfig {
    /// Store is enabled only when host, database name and user are all set
    pub fn from_parts(
        host: Option<String>,
        port: u16,
        dbname: Option<String>,
        user: Option<String>,
        password: Option<String>,
    ) -> Option<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Self {
            host: non_empty(host)?,
            port,
            dbname: non_empty(dbname)?,
            user: non_empty(user)?,
            password: non_empty(password),
        })
    }

    fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname)
            .username(&self.user);
        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

// Password stays out of logs
impl std::fmt::Debug for PgStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Create PostgreSQL connection pool (connects eagerly, 5s timeout)
pub async fn create_pool(config: &PgStoreConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect_with(config.connect_options())
        .await
        .map_err(|e| AppError::Config(format!("failed to connect to metadata store: {}", e)))
}

/// Build the notifier for the configured store.
///
/// No store configured, or a failed initial connection, yields the null
/// notifier so the queue keeps running without status propagation.
pub async fn connect_notifier(config: Option<PgStoreConfig>) -> Arc<dyn Notifier> {
    let Some(config) = config else {
        info!("Metadata store not configured, using noop notifier");
        return Arc::new(NoopNotifier);
    };

    match create_pool(&config).await {
        Ok(pool) => {
            info!(
                dbname = %config.dbname,
                host = %config.host,
                port = config.port,
                "Connected to metadata store"
            );
            Arc::new(PgNotifier::new(pool))
        }
        Err(e) => {
            error!(error = %e, "Metadata store unavailable, falling back to noop notifier");
            Arc::new(NoopNotifier)
        }
    }
}
