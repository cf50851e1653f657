use std::path::PathBuf;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    mausam_core::init()?;

    // An explicit config file may be passed as the only argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, _) = mausam_core::Config::load_validated(config_path.as_deref())?;

    let state = mausam_server::AppState::from_config(&config)?;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
            tracing::info!("Shutting down");
            shutdown.cancel();
        });
    }

    mausam_server::run(&config.server.bind_addr, state, shutdown).await
}
