//! ONNX Runtime backend
//!
//! Loads the exported classifier once at startup. The artifact is expected to
//! come from skl2onnx with `zipmap=False`: one float input `[N, 13]`, an int64
//! label output and a float `[N, 2]` probability output.

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{ModelError, ModelInfo, ModelManifest, RiskModel};
use crate::features::{FeatureVector, LayoutInfo, FEATURE_COUNT};

/// Class index of "disease present" in the probability output
const POSITIVE_CLASS: usize = 1;

/// Raw output of one session run
#[derive(Debug, Clone, Copy)]
struct RawPrediction {
    label: i64,
    probability: f32,
}

impl RawPrediction {
    fn into_output(self) -> Result<(u8, f64), ModelError> {
        let label = u8::try_from(self.label).map_err(|_| {
            ModelError::Inference(format!("model returned non-binary label {}", self.label))
        })?;

        let probability = self.probability as f64;
        if !probability.is_finite() {
            return Err(ModelError::Inference(format!(
                "model returned invalid probability {}",
                probability
            )));
        }

        Ok((label, probability))
    }
}

pub struct OnnxModel {
    // `Session::run` takes `&mut self`; the lock is held only for the run itself
    session: Mutex<Session>,
    manifest: ModelManifest,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl OnnxModel {
    /// Load model + manifest, refusing artifacts built for another feature layout
    pub fn load(model_path: &Path, manifest_path: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ModelError::Configuration(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        let manifest = ModelManifest::load(manifest_path)?;
        manifest.check_layout()?;

        let model_bytes = std::fs::read(model_path).map_err(|e| {
            ModelError::Configuration(format!("cannot read {}: {}", model_path.display(), e))
        })?;
        manifest.check_checksum(&model_bytes)?;

        let session = Session::builder()
            .map_err(|e| ModelError::Configuration(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Configuration(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(&model_bytes)
            .map_err(|e| ModelError::Configuration(format!("Failed to load model: {}", e)))?;

        check_session_io(&session, &manifest)?;

        tracing::info!(
            "ONNX model loaded ({} bytes, schema v{}, input '{}')",
            model_bytes.len(),
            manifest.schema_version,
            manifest.input_name
        );

        Ok(Self {
            session: Mutex::new(session),
            manifest,
            source: model_path.display().to_string(),
            loaded_at: Utc::now(),
        })
    }

    fn run(&self, row: &FeatureVector) -> Result<RawPrediction, ModelError> {
        let input = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), row.as_f32().to_vec())
            .map_err(|e| ModelError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input)
            .map_err(|e| ModelError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.manifest.input_name.as_str() => input_tensor])
            .map_err(|e| ModelError::Inference(format!("Inference failed: {}", e)))?;

        let label_output = outputs.get(self.manifest.label_output.as_str()).ok_or_else(|| {
            ModelError::Inference(format!("No output '{}'", self.manifest.label_output))
        })?;
        let (_, labels) = label_output
            .try_extract_tensor::<i64>()
            .map_err(|e| ModelError::Inference(format!("Label extract error: {}", e)))?;

        let proba_output = outputs
            .get(self.manifest.probability_output.as_str())
            .ok_or_else(|| {
                ModelError::Inference(format!("No output '{}'", self.manifest.probability_output))
            })?;
        let (_, probabilities) = proba_output
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(format!("Probability extract error: {}", e)))?;

        let label = *labels
            .first()
            .ok_or_else(|| ModelError::Inference("Empty label output".to_string()))?;

        // [1, 2] for a two-class export; a single column is already P(class 1)
        let probability = match probabilities.len() {
            0 => return Err(ModelError::Inference("Empty probability output".to_string())),
            1 => probabilities[0],
            _ => probabilities[POSITIVE_CLASS],
        };

        Ok(RawPrediction { label, probability })
    }
}

fn check_session_io(session: &Session, manifest: &ModelManifest) -> Result<(), ModelError> {
    if !session.inputs.iter().any(|i| i.name == manifest.input_name) {
        return Err(ModelError::Configuration(format!(
            "model has no input named '{}'",
            manifest.input_name
        )));
    }

    for wanted in [&manifest.label_output, &manifest.probability_output] {
        if !session.outputs.iter().any(|o| &o.name == wanted) {
            return Err(ModelError::Configuration(format!(
                "model has no output named '{}'",
                wanted
            )));
        }
    }

    Ok(())
}

impl RiskModel for OnnxModel {
    fn predict(&self, row: &FeatureVector) -> Result<u8, ModelError> {
        Ok(self.predict_with_proba(row)?.0)
    }

    fn predict_proba(&self, row: &FeatureVector) -> Result<f64, ModelError> {
        Ok(self.predict_with_proba(row)?.1)
    }

    /// One session run yields both outputs
    fn predict_with_proba(&self, row: &FeatureVector) -> Result<(u8, f64), ModelError> {
        self.run(row)?.into_output()
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            source: self.source.clone(),
            layout: LayoutInfo::current(),
            loaded_at: self.loaded_at,
        }
    }
}
