// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("job_id must not be empty")]
    EmptyJobId,

    #[error("Invalid phase: {0} (expected 'static' or 'dynamic')")]
    InvalidPhase(String),

    #[error("Payload must be a JSON object, got {0}")]
    InvalidPayload(String),

    #[error("Invalid forward: {from} -> {to}")]
    InvalidForward { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;
