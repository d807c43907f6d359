//! Prediction handler

use axum::{extract::State, Json};

use super::extract::ValidatedJson;
use crate::models::{PatientObservation, PredictionResult};
use crate::{AppResult, AppState};

/// Predict cardiovascular disease risk for one patient
pub async fn predict(
    State(state): State<AppState>,
    ValidatedJson(observation): ValidatedJson<PatientObservation>,
) -> AppResult<Json<PredictionResult>> {
    let service = state.service.clone();

    // Inference is CPU-bound and synchronous
    let result = tokio::task::spawn_blocking(move || service.predict(&observation)).await??;

    tracing::info!(
        "Prediction: p={} label={} risk={} factors={}",
        result.probability,
        result.label,
        result.risk_level.as_str(),
        result.factors.len()
    );

    Ok(Json(result))
}
