//! vestibule - single-node waiting room service.
//!
//! Serves the queue API, stands the gate in front of the origin placeholder,
//! and runs the admission and expiry-sweep cycles on tokio intervals. The
//! recurring triggers live out here, not in the engine: an invocation that
//! fails logs and the next tick retries.

use std::time::Duration;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vestibule_http::{app, build_service, HttpConfig};

/// How often expired entries are swept out of the in-memory store.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = HttpConfig::load().context("loading configuration")?;
    let service = build_service(&config)?;

    let processor = service.processor.clone();
    let mut admission_ticker = tokio::time::interval(config.admission_interval());
    tokio::spawn(async move {
        loop {
            admission_ticker.tick().await;
            if let Err(e) = processor.run_once().await {
                warn!(error = %e, "admission cycle failed");
            }
        }
    });

    let store = service.store.clone();
    let mut sweep_ticker = tokio::time::interval(SWEEP_INTERVAL);
    tokio::spawn(async move {
        loop {
            sweep_ticker.tick().await;
            store.sweep_expired();
        }
    });

    let router = app(service.state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), "vestibule listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "server error");
            anyhow::anyhow!(e)
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
