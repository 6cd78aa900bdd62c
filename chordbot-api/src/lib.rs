//! chordbot-api library - Chord identification service
//!
//! Exact chord-table lookup with a hosted-model fallback, exposed over HTTP
//! and instrumented with Prometheus metrics.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod chord;
pub mod cli;
pub mod error;
pub mod inference;
pub mod metrics;

pub use crate::error::{ApiError, ApiResult};

use crate::chord::ChordResolver;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Chord resolver (table, fallback client and metrics sink)
    pub resolver: Arc<ChordResolver>,
    /// Value of the `service` metric label, reported by /health
    pub service_name: String,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(resolver: Arc<ChordResolver>, service_name: impl Into<String>) -> Self {
        Self {
            resolver,
            service_name: service_name.into(),
            startup_time: Utc::now(),
        }
    }
}

/// Build the front-end router
///
/// The metrics exposition is served separately; see [`metrics::init_metrics`].
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::predict_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
