// Domain Layer - Pure value types shared by every component

pub mod error;
pub mod job;
pub mod status;

// Re-exports
pub use error::DomainError;
pub use job::{Job, JobId, JobPayload, Phase};
pub use status::JobStatus;
