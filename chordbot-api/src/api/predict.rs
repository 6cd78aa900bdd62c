//! Chord prediction endpoint
//!
//! Errors in resolution come back as strings with HTTP 200; only requests the
//! extractor cannot decode are rejected.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Request body / query for a prediction
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Comma-separated note names, e.g. "C,E,G"
    #[serde(default)]
    pub notes: String,
}

/// Prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Chord label, model text, guidance or error message
    pub result: String,
    /// One of: matched, unrecognized, invalid_input, error
    pub outcome: &'static str,
}

async fn respond(state: &AppState, notes: &str) -> PredictResponse {
    let outcome = state.resolver.resolve(notes).await;
    PredictResponse {
        result: outcome.message(),
        outcome: outcome.kind(),
    }
}

/// POST /api/predict
pub async fn predict_chord(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<Json<PredictResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(respond(&state, &request.notes).await))
}

/// GET /api/predict?notes=C,E,G
pub async fn predict_chord_query(
    State(state): State<AppState>,
    query: Result<Query<PredictRequest>, QueryRejection>,
) -> ApiResult<Json<PredictResponse>> {
    let Query(request) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(respond(&state, &request.notes).await))
}

/// Build prediction routes
pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/api/predict", get(predict_chord_query).post(predict_chord))
}
