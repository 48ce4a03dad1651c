// Panic isolation for executor calls
use std::any::Any;
use tokio::task::JoinError;
use tracing::error;

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Describe why a spawned executor task did not return
///
/// Panics inside an executor are turned into an ordinary failure so one bad
/// job cannot take its worker down.
pub fn describe_join_error(worker: &str, job_id: &str, err: JoinError) -> String {
    if err.is_panic() {
        let msg = panic_message(err.into_panic().as_ref());
        error!(worker = %worker, job_id = %job_id, panic_msg = %msg, "Executor panicked");
        format!("executor panicked: {}", msg)
    } else {
        error!(worker = %worker, job_id = %job_id, "Executor task cancelled");
        "executor task cancelled".to_string()
    }
}
