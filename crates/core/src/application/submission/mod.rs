// Submission Service - admits client jobs into the phase queues

pub mod submit;

pub use submit::{validate_request, SubmitRequest, ValidSubmission};

use crate::application::queue::PhaseQueues;
use crate::domain::Job;
use crate::error::Result;
use crate::port::TimeProvider;
use std::sync::Arc;

/// Submission Service
#[derive(Clone)]
pub struct SubmissionService {
    queues: Arc<PhaseQueues>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SubmissionService {
    pub fn new(queues: Arc<PhaseQueues>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            queues,
            time_provider,
        }
    }

    /// Validate and admit a job
    pub async fn submit(&self, req: SubmitRequest) -> Result<Job> {
        submit::execute(&self.queues, self.time_provider.as_ref(), req).await
    }

    pub fn queues(&self) -> &PhaseQueues {
        &self.queues
    }
}
