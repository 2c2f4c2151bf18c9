use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tracker::{config::AppConfig, repositories::open_store, routes, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be complete
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting exercise tracker");

    let config = AppConfig::load()?;

    // Initialize the store and check connectivity
    let store = open_store(&config.database()).await?;
    if store.health_check().await? {
        info!("Store connection successful");
    } else {
        anyhow::bail!("Failed to reach the store");
    }

    let app = routes::create_router(AppState::new(store.clone()), &config);

    let listener = TcpListener::bind((config.bind_address.as_str(), config.port)).await?;
    info!("Exercise tracker listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Exercise tracker stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down exercise tracker");
}
