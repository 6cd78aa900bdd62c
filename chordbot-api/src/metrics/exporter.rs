//! Pull-based metrics exposition
//!
//! Serves `GET /metrics` in the Prometheus text format on its own listener,
//! separate from the front-end port.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::PrometheusMetrics;
use crate::error::ApiResult;

/// GET /metrics
pub async fn export_metrics(
    State(metrics): State<Arc<PrometheusMetrics>>,
) -> ApiResult<impl IntoResponse> {
    let body = metrics.export_text()?;
    let content_type = TextEncoder::new().format_type().to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], body))
}

/// Build the metrics exposition routes
pub fn metrics_routes(metrics: Arc<PrometheusMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(export_metrics))
        .with_state(metrics)
}

/// Bind the metrics listener and serve it for the rest of the process
///
/// The listener is bound before this returns, so callers that await it
/// know the endpoint is reachable before any request is served.
pub async fn init_metrics(
    addr: SocketAddr,
    metrics: Arc<PrometheusMetrics>,
) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    info!(
        "Prometheus metrics server started on :{} for service={}",
        local_addr.port(),
        metrics.service()
    );

    let app = metrics_routes(metrics);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server stopped: {}", e);
        }
    });

    Ok((local_addr, handle))
}
