//! chordbot-api - Chord identification microservice
//!
//! Serves the chord identifier front end and `/api/predict` on the
//! configured host/port, and Prometheus metrics on a separate port.
//!
//! Configuration priority: command line → environment → compiled default.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chordbot_api::chord::{ChordResolver, ChordTable};
use chordbot_api::cli::Args;
use chordbot_api::inference::HostedInferenceClient;
use chordbot_api::metrics::{init_metrics, PrometheusMetrics};
use chordbot_api::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chordbot_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting chordbot-api v{}", env!("CARGO_PKG_VERSION"));

    let config = Args::parse()
        .into_config()
        .context("Invalid configuration")?;

    info!("Service name: {}", config.service_name);
    info!(
        "Inference model: {} via {}",
        config.inference_model, config.inference_base_url
    );
    if config.inference_token.is_none() {
        info!("No inference token configured; calling the hosted API anonymously");
    }

    // Metrics must be reachable before the first request is served
    let metrics = Arc::new(
        PrometheusMetrics::new(config.service_name.clone())
            .context("Failed to register metrics")?,
    );
    let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let (metrics_addr, _metrics_task) = init_metrics(metrics_addr, metrics.clone())
        .await
        .context("Failed to start metrics server")?;
    info!("Metrics: http://{}/metrics", metrics_addr);

    let table = Arc::new(ChordTable::standard());
    info!("Chord table loaded with {} entries", table.len());

    let inference = Arc::new(
        HostedInferenceClient::from_config(&config)
            .context("Failed to create inference client")?,
    );
    let resolver = Arc::new(ChordResolver::new(table, inference, metrics));

    let state = AppState::new(resolver, config.service_name.clone());
    let app = build_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("chordbot-api listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
