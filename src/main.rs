use api_rest::AppState;
use datacall_core::Network;
use datacall_core::config::ConfigValues;
use datacall_core::constants::DEFAULT_REST_ADDR;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the data-call ledger
///
/// Hosts every configured channel and serves the contract over REST.
///
/// # Environment Variables
/// - `DATACALL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DATACALL_STATE_DIR`: Directory for channel snapshots; state is kept in memory when unset
/// - `DATACALL_CHAINCODE`, `DATACALL_DEFAULT_CHANNEL`, `DATACALL_DEFAULT_CHAINCODE`,
///   `DATACALL_CHANNELS`: contract configuration, see [`ConfigValues::from_env`]
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, state loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("datacall=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(ConfigValues::from_env().resolve()?);
    let network = match std::env::var("DATACALL_STATE_DIR") {
        Ok(dir) => {
            tracing::info!("++ Loading channel state from {}", dir);
            Network::open(cfg.clone(), std::path::Path::new(&dir))?
        }
        Err(_) => Network::in_memory(cfg.clone()),
    };
    for channel in network.channel_names() {
        tracing::info!("++ Hosting channel {}", channel);
    }

    let rest_addr =
        std::env::var("DATACALL_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    tracing::info!("++ Starting data-call REST on {}", rest_addr);

    let app = api_rest::router(AppState::new(network));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
