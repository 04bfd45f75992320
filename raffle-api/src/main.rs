use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use raffle_api::{app, worker, AppState};
use raffle_core::{Clock, SystemClock};
use raffle_store::app_config::{Config, StoreKind};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raffle_api=debug,raffle_reservation=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting raffle API on port {}", config.server.port);

    if config.store.kind == StoreKind::File {
        if let Some(dir) = config.store.path.as_ref().and_then(|p| p.parent()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }
    let store = raffle_store::open_store(&config.store).context("Failed to open ticket store")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let state = AppState::from_config(&config, store, clock.clone())?;
    tracing::info!("Catalog has {} tickets in {} ranges", state.catalog.len(), state.catalog.ranges().len());

    tokio::spawn(worker::start_expiry_worker(
        state.sweeper(),
        clock,
        Duration::from_secs(config.raffle.sweep_interval_seconds.max(1)),
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
