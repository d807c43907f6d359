//! Health check handler

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::AppState;

/// Always 200; reports whether a model is available. Never runs inference.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.service.health())
}
