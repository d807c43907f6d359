//! Inference - the trained classifier behind a two-capability trait.
//!
//! The service only ever sees `dyn RiskModel`, so the ONNX backend can be
//! swapped for a stub in tests.

pub mod manifest;
pub mod onnx;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::{FeatureVector, LayoutInfo};

pub use manifest::ModelManifest;
pub use onnx::OnnxModel;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Artifact missing, corrupt or built for another feature schema
    #[error("model configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Inference(String),
}

/// Describes the loaded artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub source: String,
    #[serde(flatten)]
    pub layout: LayoutInfo,
    pub loaded_at: DateTime<Utc>,
}

/// Pre-trained binary classifier.
///
/// Implementations are read-only after construction and shared by all requests.
pub trait RiskModel: Send + Sync {
    /// Class label (0 or 1) for a single row
    fn predict(&self, row: &FeatureVector) -> Result<u8, ModelError>;

    /// Class-1 probability for a single row
    fn predict_proba(&self, row: &FeatureVector) -> Result<f64, ModelError>;

    /// Label and class-1 probability together; backends that produce both
    /// in one pass should override this.
    fn predict_with_proba(&self, row: &FeatureVector) -> Result<(u8, f64), ModelError> {
        let probability = self.predict_proba(row)?;
        let label = self.predict(row)?;
        Ok((label, probability))
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            source: std::any::type_name::<Self>().to_string(),
            layout: LayoutInfo::current(),
            loaded_at: Utc::now(),
        }
    }
}
