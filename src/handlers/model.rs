//! Model status handler

use axum::{extract::State, Json};

use crate::models::ModelStatus;
use crate::AppState;

pub async fn status(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.service.status())
}
