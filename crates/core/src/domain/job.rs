// Job Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Job ID (caller-supplied, opaque)
pub type JobId = String;

/// Processing phase. Each phase owns one bounded queue and one set of workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Static,
    Dynamic,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Static, Phase::Dynamic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Static => "static",
            Phase::Dynamic => "dynamic",
        }
    }

    /// Phase that completed work may be forwarded into (static -> dynamic only)
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Static => Some(Phase::Dynamic),
            Phase::Dynamic => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "static" => Ok(Phase::Static),
            "dynamic" => Ok(Phase::Dynamic),
            other => Err(DomainError::InvalidPhase(other.to_string())),
        }
    }
}

/// Job Payload (JSON object, string keys to arbitrary values)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPayload(serde_json::Map<String, serde_json::Value>);

impl JobPayload {
    pub fn new(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }

    /// Build a payload from an arbitrary JSON value; only objects are accepted
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(Self(map)),
            serde_json::Value::Null => Ok(Self::default()),
            other => Err(DomainError::InvalidPayload(json_kind(&other).to_string())),
        }
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Truthiness of a field: `true`, non-zero numbers and non-empty strings count as set
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Array(a)) => !a.is_empty(),
            Some(serde_json::Value::Object(o)) => !o.is_empty(),
            Some(serde_json::Value::Null) | None => false,
        }
    }

    /// Numeric field; numeric strings are accepted as well
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Job Entity
///
/// Immutable after construction: fields are private and forwarding builds a
/// new `Job` instead of touching the original. The payload is shared between
/// a job and the jobs forwarded from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    phase: Phase,
    payload: Arc<JobPayload>,
    enqueued_at: i64, // epoch ms
}

impl Job {
    /// Create a new Job
    ///
    /// # Arguments
    ///
    /// * `id` - Caller-supplied job ID, must be non-empty
    /// * `phase` - Phase whose queue the job is admitted into
    /// * `payload` - Job payload
    /// * `enqueued_at` - Submission timestamp in epoch ms (injected, not system time)
    pub fn new(
        id: impl Into<String>,
        phase: Phase,
        payload: JobPayload,
        enqueued_at: i64,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::EmptyJobId);
        }
        Ok(Self {
            id,
            phase,
            payload: Arc::new(payload),
            enqueued_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn payload(&self) -> &JobPayload {
        &self.payload
    }

    pub fn enqueued_at(&self) -> i64 {
        self.enqueued_at
    }

    /// Build the job that carries this job's work into `to`.
    ///
    /// Same id, same payload, new phase and timestamp. Only the transitions
    /// allowed by [`Phase::next`] are accepted.
    pub fn forward_to(&self, to: Phase, now_millis: i64) -> Result<Job> {
        if self.phase.next() != Some(to) {
            return Err(DomainError::InvalidForward {
                from: self.phase.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Job {
            id: self.id.clone(),
            phase: to,
            payload: Arc::clone(&self.payload),
            enqueued_at: now_millis,
        })
    }
}
