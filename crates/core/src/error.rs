// Central Error Type for the Application

use crate::domain::Phase;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Queue for the phase stayed full for the whole admission window
    #[error("Admission rejected: {phase} queue is full (capacity {capacity})")]
    AdmissionRejected { phase: Phase, capacity: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Execution error: {0}")]
    Execution(#[from] crate::port::ExecutionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<crate::application::queue::QueueError> for AppError {
    fn from(err: crate::application::queue::QueueError) -> Self {
        use crate::application::queue::QueueError;
        match err {
            QueueError::Full { phase, capacity } => AppError::AdmissionRejected { phase, capacity },
            QueueError::Closed { phase } => {
                AppError::Internal(format!("{} queue is closed", phase))
            }
        }
    }
}
