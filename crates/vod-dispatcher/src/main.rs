//! Dispatcher entry point: reads one upload event from stdin and fans out.

use std::io::Read;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use vod_dispatcher::{Dispatcher, DispatcherConfig, EcsLauncher};
use vod_models::UploadEvent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Configuration problems are fatal before any record is touched.
    let config = DispatcherConfig::from_env().context("Invalid dispatcher configuration")?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read event from stdin")?;
    let event: UploadEvent =
        serde_json::from_str(&input).context("Failed to parse upload event")?;

    let launcher = EcsLauncher::new(config).await;
    let dispatcher = Dispatcher::new(launcher);
    dispatcher.dispatch(&event).await;

    // Per-record failures were already logged; the batch itself succeeded.
    Ok(())
}
