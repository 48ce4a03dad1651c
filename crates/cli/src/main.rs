//! Phase Job Queue CLI - Command-line interface for the HTTP gateway

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use jobqueue_sdk::{JobQueueClient, Metrics, Phase, SdkError, SubmitRequest};
use serde_json::json;
use std::time::{Duration, Instant};
use tabled::{Table, Tabled};

const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:5003";

#[derive(Parser)]
#[command(name = "jobqueue")]
#[command(about = "Phase Job Queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gateway URL
    #[arg(long, env = "JOBQUEUE_URL", default_value = DEFAULT_GATEWAY_URL)]
    url: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum PhaseArg {
    Static,
    Dynamic,
}

impl From<PhaseArg> for Phase {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::Static => Phase::Static,
            PhaseArg::Dynamic => Phase::Dynamic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a job
    Submit {
        /// Phase to admit the job into
        #[arg(short, long, value_enum)]
        phase: PhaseArg,

        /// Job ID (default: generated UUID)
        #[arg(short, long)]
        job_id: Option<String>,

        /// Payload as JSON object
        #[arg(long, default_value = "{}")]
        payload: String,
    },

    /// Show counters
    Metrics,

    /// Show worker counts and queue occupancy
    Health,

    /// Submit a forwarding static job and wait until it is processed
    Smoke {
        /// Seconds to wait for processing
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },
}

#[derive(Tabled)]
struct CounterRow {
    counter: String,
    value: u64,
}

#[derive(Tabled)]
struct QueueRow {
    phase: String,
    depth: usize,
    capacity: usize,
}

fn metrics_table(metrics: &Metrics) -> String {
    let rows: Vec<CounterRow> = metrics
        .iter()
        .map(|(name, value)| CounterRow {
            counter: name.to_string(),
            value,
        })
        .collect();
    Table::new(rows).to_string()
}

async fn submit(client: &JobQueueClient, request: SubmitRequest) -> Result<()> {
    match client.submit(&request).await {
        Ok(_) => {
            println!("{}", "✓ Job accepted".green().bold());
            println!("  job_id: {}", request.job_id);
            println!("  phase:  {}", request.phase);
            Ok(())
        }
        Err(SdkError::Saturated(msg)) => {
            println!("{}", format!("⚠ {}", msg).yellow().bold());
            anyhow::bail!("queue saturated")
        }
        Err(e) => Err(e).context("Failed to submit job"),
    }
}

/// Mirrors the deployment smoke test: one forwarding static job must be
/// processed without raising the error counter
async fn smoke(client: &JobQueueClient, timeout: Duration) -> Result<()> {
    let before = client.metrics().await.context("Failed to read metrics")?;
    let request = SubmitRequest::with_generated_id(
        Phase::Static,
        json!({"forward_to_dynamic": true, "score": 0.8, "simulated_latency": 0.1}),
    );
    submit(client, request).await?;

    let deadline = Instant::now() + timeout;
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let now = client.metrics().await.context("Failed to read metrics")?;

        if now.get("jobs_error") > before.get("jobs_error") {
            println!("{}", metrics_table(&now));
            anyhow::bail!("jobs_error increased during smoke test");
        }
        if now.get("jobs_processed") > before.get("jobs_processed") {
            println!("{}", "✓ Smoke test passed".green().bold());
            println!("{}", metrics_table(&now));
            return Ok(());
        }
        if Instant::now() >= deadline {
            anyhow::bail!("job was not processed within {}s", timeout.as_secs());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = JobQueueClient::connect(&cli.url).context("Invalid gateway URL")?;

    match cli.command {
        Commands::Submit {
            phase,
            job_id,
            payload,
        } => {
            let payload_json: serde_json::Value =
                serde_json::from_str(&payload).context("Invalid JSON payload")?;
            let request = match job_id {
                Some(id) => SubmitRequest::new(id, phase.into(), payload_json),
                None => SubmitRequest::with_generated_id(phase.into(), payload_json),
            };
            submit(&client, request).await?;
        }

        Commands::Metrics => {
            let metrics = client.metrics().await.context("Failed to fetch metrics")?;
            println!("{}", "Counters".cyan().bold());
            println!("{}", metrics_table(&metrics));
        }

        Commands::Health => {
            let health = client.health().await.context("Failed to fetch health")?;
            println!(
                "{} {}",
                "Status:".cyan().bold(),
                if health.status == "ok" {
                    health.status.green()
                } else {
                    health.status.red()
                }
            );
            println!("Static workers:  {}", health.static_workers);
            println!("Dynamic workers: {}", health.dynamic_workers);

            let rows: Vec<QueueRow> = health
                .queues
                .iter()
                .map(|(phase, q)| QueueRow {
                    phase: phase.clone(),
                    depth: q.depth,
                    capacity: q.capacity,
                })
                .collect();
            if !rows.is_empty() {
                println!();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Smoke { timeout_secs } => {
            smoke(&client, Duration::from_secs(timeout_secs)).await?;
        }
    }

    Ok(())
}
