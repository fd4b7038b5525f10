//! src/main.rs
//! Directory listing server: `GET /nodes` plus static front-end assets.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use explorer_core::{
    Config, Logger,
    server::{AppState, serve},
    service::ListingService,
    stats::StatsReporter,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let (config, config_path) = Config::load()
        .await
        .context("Failed to load configuration")?;

    let _log_guard: WorkerGuard =
        Logger::init_tracing(&config.logging).context("Failed to initialise logging")?;

    info!(
        ?config_path,
        port = config.server.port,
        "Starting file-explorer"
    );

    let reporter: StatsReporter =
        StatsReporter::new(&config.stats).context("Failed to build statistics client")?;

    match reporter.endpoint() {
        Some(url) => info!(url, "Statistics reporting enabled"),
        None => info!("Statistics reporting disabled (no stats.base_url)"),
    }

    let state: Arc<AppState> = Arc::new(AppState {
        listing: ListingService::new(),
        reporter,
        locale: config.display.locale,
    });

    serve(&config.server, state)
        .await
        .context("Server runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}
