//! Worker entry point: one process, one job, exit code as outcome signal.

use tracing::error;
use tracing_subscriber::EnvFilter;

use vod_worker::{execute, JobContext, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid worker configuration: {}", e);
            std::process::exit(1);
        }
    };

    let ctx = match JobContext::new(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to initialize worker: {}", e);
            std::process::exit(1);
        }
    };

    // The task scheduler reads the exit code; it is the only job-status
    // channel.
    let code = execute(&ctx).await;
    std::process::exit(code);
}
