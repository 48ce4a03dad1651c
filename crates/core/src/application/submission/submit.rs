// Submit Use Case

use crate::application::queue::PhaseQueues;
use crate::domain::{Job, JobPayload, Phase};
use crate::error::{AppError, Result};
use crate::port::TimeProvider;
use serde::{Deserialize, Serialize};

/// Message returned when the id or phase is unusable
pub const ID_AND_PHASE_REQUIRED: &str = "job_id and phase ('static'|'dynamic') required";

/// Message returned when the payload is not a JSON object
pub const PAYLOAD_MUST_BE_OBJECT: &str = "payload must be a JSON object";

/// Submission request as received from a client.
///
/// Every field is optional on the wire so that missing fields surface as a
/// validation error instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl SubmitRequest {
    pub fn new(job_id: impl Into<String>, phase: Phase, payload: serde_json::Value) -> Self {
        Self {
            job_id: Some(job_id.into()),
            phase: Some(phase.to_string()),
            payload: Some(payload),
        }
    }
}

/// Validated request, ready to become a Job
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub job_id: String,
    pub phase: Phase,
    pub payload: JobPayload,
}

/// Validate a submission; no queueing is attempted on failure
pub fn validate_request(req: SubmitRequest) -> Result<ValidSubmission> {
    let job_id = req
        .job_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation(ID_AND_PHASE_REQUIRED.to_string()))?;

    let phase = req
        .phase
        .as_deref()
        .and_then(|p| p.parse::<Phase>().ok())
        .ok_or_else(|| AppError::Validation(ID_AND_PHASE_REQUIRED.to_string()))?;

    // Missing payload reads as {}
    let payload = JobPayload::from_value(req.payload.unwrap_or(serde_json::Value::Null))
        .map_err(|_| AppError::Validation(PAYLOAD_MUST_BE_OBJECT.to_string()))?;

    Ok(ValidSubmission {
        job_id,
        phase,
        payload,
    })
}

/// Execute submit use case
///
/// # Arguments
///
/// * `queues` - Phase queues the job is admitted into
/// * `time_provider` - Clock for `enqueued_at` (injected for determinism)
/// * `req` - Submission request
///
/// # Errors
/// * `AppError::Validation` - malformed request
/// * `AppError::AdmissionRejected` - queue for the phase is saturated
pub async fn execute(
    queues: &PhaseQueues,
    time_provider: &dyn TimeProvider,
    req: SubmitRequest,
) -> Result<Job> {
    let valid = validate_request(req)?;

    let job = Job::new(
        valid.job_id,
        valid.phase,
        valid.payload,
        time_provider.now_millis(),
    )?;

    queues.enqueue(job.clone()).await?;

    Ok(job)
}

#[cfg(test)]
#[path = "submit_test.rs"]
mod submit_test;
