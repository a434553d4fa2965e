//! # Koinonia Server
//!
//! Loads configuration, opens the configured store and serves the REST API
//! until Ctrl+C or SIGTERM.

use anyhow::Context;
use koinonia_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use koinonia_rest::create_router;
use koinonia_server::{
    di::{build_app_state, DaoModule},
    startup::{init_logging, print_startup_info, shutdown_signal},
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get(),
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    info!("Starting Koinonia server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let daos = DaoModule::from_config(&config)
        .await
        .context("Failed to open the store")?;
    let state = build_app_state(daos.clone(), &config.security);
    let router = create_router(state, &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    print_startup_info(&addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    daos.close().await;
    info!("Server shutdown complete");
    served
}
