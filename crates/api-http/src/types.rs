//! HTTP Request/Response Types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// POST /enqueue - admission acknowledged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckResponse {
    pub ack: bool,
}

/// Error body shared by every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Occupancy of one phase queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueHealth {
    pub depth: usize,
    pub capacity: usize,
}

/// GET /health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub static_workers: usize,
    pub dynamic_workers: usize,
    /// Keyed by phase name
    pub queues: BTreeMap<String, QueueHealth>,
}
