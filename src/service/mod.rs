//! Prediction service
//!
//! Observation → features → model → tier + factors. Stateless per request;
//! the only shared state is the read-only model handle and two counters.

pub mod risk;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::features::{FeatureError, FeatureVector};
use crate::inference::{ModelError, RiskModel};
use crate::models::{HealthResponse, ModelStatus, PatientObservation, PredictionResult};

pub use risk::{derive_factors, is_valid_probability, risk_level_for, round_probability};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("model not loaded")]
    ModelNotLoaded,

    #[error(transparent)]
    Precondition(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub struct PredictionService {
    model: Option<Arc<dyn RiskModel>>,
    latency_us_sum: AtomicU64,
    inference_count: AtomicU64,
}

impl PredictionService {
    /// `None` means the artifact failed to load; every prediction then fails.
    pub fn new(model: Option<Arc<dyn RiskModel>>) -> Self {
        Self {
            model,
            latency_us_sum: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn health(&self) -> HealthResponse {
        if self.is_ready() {
            HealthResponse::ok()
        } else {
            HealthResponse::model_missing()
        }
    }

    pub fn predict(&self, obs: &PatientObservation) -> Result<PredictionResult, ServiceError> {
        let model = self.model.as_ref().ok_or(ServiceError::ModelNotLoaded)?;

        let features = FeatureVector::from_observation(obs)?;
        tracing::debug!(features = ?features.named().collect::<Vec<_>>(), "Running inference");

        let start = Instant::now();
        let (label, raw_probability) = model.predict_with_proba(&features)?;
        self.record_latency(start.elapsed());

        if label > 1 {
            return Err(ModelError::Inference(format!("model returned non-binary label {}", label)).into());
        }
        if !is_valid_probability(raw_probability) {
            return Err(ModelError::Inference(format!(
                "model returned probability {} outside [0, 1]",
                raw_probability
            ))
            .into());
        }

        let probability = round_probability(raw_probability);

        Ok(PredictionResult {
            probability,
            label,
            risk_level: risk_level_for(probability),
            factors: derive_factors(obs, &features.derived()),
        })
    }

    pub fn status(&self) -> ModelStatus {
        let sum = self.latency_us_sum.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        ModelStatus {
            model_loaded: self.is_ready(),
            model: self.model.as_ref().map(|m| m.describe()),
            inference_count: count,
            avg_latency_ms: avg,
        }
    }

    fn record_latency(&self, elapsed: Duration) {
        self.latency_us_sum.fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
    }
}
