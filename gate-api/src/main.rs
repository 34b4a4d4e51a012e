use anyhow::Context;
use gate_api::{app, AppState};
use gate_catalog::InMemoryFlightCatalog;
use gate_core::BoardingScheduler;
use gate_store::{BoardingNotifier, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gate_api=debug,gate_core=debug,gate_store=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    if config.flights.is_empty() {
        tracing::warn!("No flights configured; every check-in will be rejected");
    }
    tracing::info!(flights = config.flights.len(), "Flight catalog seeded");

    let catalog = Arc::new(InMemoryFlightCatalog::new(config.flights.clone()));
    let scheduler = Arc::new(BoardingScheduler::new(catalog));
    let notifier = BoardingNotifier::new(config.broadcast.channel_capacity);

    let app = app(AppState::new(scheduler, notifier, config.cors.clone()));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
