// Job status tokens propagated to the metadata store

use crate::domain::Phase;
use std::fmt;

/// Status token sent through the notifier.
///
/// `InPhase` doubles as "being worked in this phase" (on dequeue) and as
/// "phase complete, in transit to the next one" (on a forwarding success).
/// Downstream consumers rely on the phase name being used for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Queued,
    InPhase(Phase),
    Done,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::InPhase(phase) => phase.as_str(),
            JobStatus::Done => "done",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Phase> for JobStatus {
    fn from(phase: Phase) -> Self {
        JobStatus::InPhase(phase)
    }
}
