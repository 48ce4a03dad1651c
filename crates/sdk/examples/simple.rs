//! Simple SDK Example
//!
//! Demonstrates basic usage of the job queue SDK.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package jobqueue-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package jobqueue-sdk --example simple
//!    ```

use jobqueue_sdk::{JobQueueClient, Phase, SdkError, SubmitRequest};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Phase Job Queue SDK - Simple Example");
    println!("====================================\n");

    // 1. Connect to gateway
    println!("1. Connecting to gateway...");
    let client = JobQueueClient::connect("http://127.0.0.1:5003")?;
    let health = client.health().await?;
    println!(
        "   ✓ Connected ({} static / {} dynamic workers)\n",
        health.static_workers, health.dynamic_workers
    );

    // 2. Submit a static job that forwards into the dynamic phase
    println!("2. Submitting a job...");
    let request = SubmitRequest::with_generated_id(
        Phase::Static,
        json!({
            "forward_to_dynamic": true,
            "score": 0.8,
            "simulated_latency": 0.2
        }),
    );
    match client.submit(&request).await {
        Ok(_) => println!("   ✓ Job accepted: {}\n", request.job_id),
        Err(SdkError::Saturated(msg)) => {
            println!("   ⚠ Queue saturated: {}", msg);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    // 3. Wait a bit for processing
    println!("3. Waiting 2 seconds...");
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    println!("   ✓ Done\n");

    // 4. Show counters
    println!("4. Fetching metrics...");
    let metrics = client.metrics().await?;
    for (name, value) in metrics.iter() {
        println!("     - {}: {}", name, value);
    }

    println!("\n✓ Example completed successfully!");

    Ok(())
}
