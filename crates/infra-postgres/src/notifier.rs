// PostgreSQL Notifier: status propagation through the store's stored functions

use async_trait::async_trait;
use jobqueue_core::domain::JobStatus;
use jobqueue_core::port::Notifier;
use sqlx::postgres::PgPool;
use tracing::{error, info};

const UPSERT_JOB_RESULT: &str = "SELECT upsert_job_result($1, $2::job_status, $3, $4, $5)";
const MARK_JOB_ERROR: &str = "SELECT mark_job_error($1, $2, $3)";

/// Describe a sqlx error for logging, keeping the SQLSTATE when there is one
fn describe_sqlx_error(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // 42883: undefined_function, the store schema is missing
            Some(code) if code.as_ref() == "42883" => {
                format!("Stored function missing: {} (42883)", db_err.message())
            }
            // 22P02: invalid_text_representation, unknown job_status label
            Some(code) if code.as_ref() == "22P02" => {
                format!("Invalid status value: {} (22P02)", db_err.message())
            }
            Some(code) => format!("Database error [{}]: {}", code, db_err.message()),
            None => format!("Database error: {}", db_err.message()),
        },
        sqlx::Error::PoolTimedOut => "Connection pool timed out".to_string(),
        sqlx::Error::Io(io_err) => format!("I/O error: {}", io_err),
        other => format!("Database error: {}", other),
    }
}

/// Notifier backed by the metadata store
#[derive(Clone)]
pub struct PgNotifier {
    pool: PgPool,
}

impl PgNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for PgNotifier {
    async fn notify_status(
        &self,
        job_id: &str,
        status: JobStatus,
        score: Option<f64>,
        processing_time_ms: Option<i64>,
        changed_by: &str,
    ) -> bool {
        let result = sqlx::query(UPSERT_JOB_RESULT)
            .bind(job_id)
            .bind(status.as_str())
            .bind(score)
            .bind(processing_time_ms)
            .bind(changed_by)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                info!(job_id = %job_id, status = %status, "Notified metadata store");
                true
            }
            Err(e) => {
                error!(
                    job_id = %job_id,
                    status = %status,
                    error = %describe_sqlx_error(&e),
                    "Notify failed"
                );
                false
            }
        }
    }

    async fn mark_job_error(&self, job_id: &str, message: &str, changed_by: &str) -> bool {
        let result = sqlx::query(MARK_JOB_ERROR)
            .bind(job_id)
            .bind(message)
            .bind(changed_by)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                info!(job_id = %job_id, "Marked job error in metadata store");
                true
            }
            Err(e) => {
                error!(job_id = %job_id, error = %describe_sqlx_error(&e), "mark_job_error failed");
                false
            }
        }
    }
}
