use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "mangoscan-ai";

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Operational status; not part of the diagnosis contract.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    /// Whether a trained classifier is active (false means heuristic fallback)
    pub model_loaded: bool,
    pub num_classes: usize,
    pub min_confidence: f64,
    pub model_version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[tracing::instrument(name = "GET /health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let strategy = state.diagnoser.strategy();
    let classes = strategy.classifier_classes();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        model_loaded: classes.is_some(),
        num_classes: classes.unwrap_or(0),
        min_confidence: state.diagnoser.threshold().value(),
        model_version: strategy.id().to_string(),
    }))
}
