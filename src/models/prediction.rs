//! Prediction response models

use serde::{Deserialize, Serialize};

use crate::inference::ModelInfo;

/// Coarse risk bucket derived from the class-1 probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Rule-triggered flag for one input condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub field: String,
    pub status: String,
    pub message: String,
    /// Per-feature attribution; no rule computes it yet
    pub contribution: Option<f64>,
}

impl RiskFactor {
    pub fn new(field: &str, status: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            status: status.to_string(),
            message: message.to_string(),
            contribution: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Class-1 probability, rounded to 4 decimals
    pub probability: f64,
    pub label: u8,
    pub risk_level: RiskLevel,
    pub factors: Vec<RiskFactor>,
}

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            detail: None,
        }
    }

    pub fn model_missing() -> Self {
        Self {
            status: "error".to_string(),
            detail: Some("Model not loaded".to_string()),
        }
    }
}

/// `GET /model` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub model: Option<ModelInfo>,
    pub inference_count: u64,
    pub avg_latency_ms: f64,
}
