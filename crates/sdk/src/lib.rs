//! Phase Job Queue SDK - Rust Client Library
//!
//! Provides a convenient client for the job queue HTTP gateway.
//!
//! # Example
//!
//! ```no_run
//! use jobqueue_sdk::{JobQueueClient, Phase, SubmitRequest};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JobQueueClient::connect("http://127.0.0.1:5003")?;
//!
//!     // Submit a static job that continues into the dynamic phase
//!     client.submit(&SubmitRequest::new(
//!         "apk-42",
//!         Phase::Static,
//!         json!({"forward_to_dynamic": true, "score": 0.8}),
//!     )).await?;
//!
//!     let metrics = client.metrics().await?;
//!     println!("processed: {}", metrics.get("jobs_processed"));
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::JobQueueClient;
pub use error::{Result, SdkError};
pub use types::{AckResponse, HealthResponse, Metrics, Phase, QueueHealth, SubmitRequest};
