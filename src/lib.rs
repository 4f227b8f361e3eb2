pub mod cli;
pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Checkout gateway
pub mod utils;

use anyhow::Context;
use modules::logger;
use tracing::{error, info};

use crate::cli::Cli;
use crate::proxy::{AppState, AxumServer};

/// Load config, start the gateway and serve until ctrl-c
pub async fn run(args: Cli) -> anyhow::Result<()> {
    let mut config = modules::config::load_app_config(args.config.as_deref())
        .context("loading configuration")?;
    args.apply(&mut config);

    logger::init_logger(config.log_dir.as_deref().map(std::path::Path::new));

    config.validate().context("invalid configuration")?;
    info!("Starting gateway with {:?}", config);

    let host = config.get_bind_address().to_string();
    let port = config.port;
    let mode = config.mode();

    let state = AppState::from_config(config)
        .await
        .context("building exchange client")?;

    let (server, handle) = AxumServer::start(&host, port, state)
        .await
        .map_err(anyhow::Error::msg)?;
    info!("Gateway ready in {} mode", mode);

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Shutting down");
    server.stop();
    handle.await.context("server task panicked")?;
    Ok(())
}
