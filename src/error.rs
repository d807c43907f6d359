//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::service::ServiceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Model not loaded. Check the model artifact and manifest")]
    ModelNotLoaded,

    // Malformed or out-of-range request body
    #[error("{0}")]
    Validation(String),

    // Input is well-formed but a derived feature is undefined
    #[error("Prediction error: {0}")]
    DomainPrecondition(String),

    #[error("Prediction error: {0}")]
    Inference(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ModelNotLoaded
            | AppError::DomainPrecondition(_)
            | AppError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Validation(msg) => tracing::debug!("Rejected request: {}", msg),
            AppError::ModelNotLoaded => tracing::error!("Prediction requested but no model is loaded"),
            AppError::DomainPrecondition(msg) => tracing::warn!("Domain precondition failed: {}", msg),
            AppError::Inference(msg) => tracing::error!("Inference error: {}", msg),
        }

        let body = Json(json!({
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::ModelNotLoaded => AppError::ModelNotLoaded,
            ServiceError::Precondition(e) => AppError::DomainPrecondition(e.to_string()),
            ServiceError::Model(e) => AppError::Inference(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Inference(format!("inference task failed: {}", err))
    }
}
