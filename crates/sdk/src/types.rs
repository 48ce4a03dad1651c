//! SDK Request/Response Types
//!
//! Mirrors the gateway's JSON bodies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Processing phase a job is submitted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Static,
    Dynamic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Static => f.write_str("static"),
            Phase::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Request to submit a job
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub job_id: String,
    pub phase: Phase,
    pub payload: serde_json::Value,
}

impl SubmitRequest {
    pub fn new(job_id: impl Into<String>, phase: Phase, payload: serde_json::Value) -> Self {
        Self {
            job_id: job_id.into(),
            phase,
            payload,
        }
    }

    /// Request with a freshly generated UUID v4 as job id
    pub fn with_generated_id(phase: Phase, payload: serde_json::Value) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), phase, payload)
    }
}

/// Response from a successful submission
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    pub ack: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

/// Counter snapshot from GET /metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, u64>);

impl Metrics {
    /// Counter value, 0 when the gateway did not report it
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Occupancy of one phase queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QueueHealth {
    pub depth: usize,
    pub capacity: usize,
}

/// Response from GET /health
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub static_workers: usize,
    pub dynamic_workers: usize,
    #[serde(default)]
    pub queues: BTreeMap<String, QueueHealth>,
}
