//! # AS2 Node Runtime
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`RUST_LOG`, default `info`)
//! 2. Load configuration (file, then environment)
//! 3. Build the application context (storage, certificates, services)
//! 4. Start listeners and the scheduler
//! 5. Run until Ctrl+C, then shut down gracefully

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use node_runtime::{load_config, AppContext, Collaborators, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config = load_config()?;
    let context = AppContext::build(config, Collaborators::production()?)?;

    let runtime = NodeRuntime::new(context);
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown(Duration::from_secs(30)).await;
    Ok(())
}
