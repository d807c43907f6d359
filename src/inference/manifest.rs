//! Model manifest
//!
//! Sidecar JSON written next to the exported `.onnx` file at export time:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "feature_names": ["age_years", "gender", ..., "bp_ratio"],
//!   "input_name": "float_input",
//!   "label_output": "label",
//!   "probability_output": "probabilities",
//!   "sha256": "9f86d0..."
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ModelError;
use crate::features::layout::validate_layout;

fn default_input_name() -> String {
    "float_input".to_string()
}

fn default_label_output() -> String {
    "label".to_string()
}

fn default_probability_output() -> String {
    "probabilities".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub schema_version: u8,
    pub feature_names: Vec<String>,

    #[serde(default = "default_input_name")]
    pub input_name: String,

    #[serde(default = "default_label_output")]
    pub label_output: String,

    #[serde(default = "default_probability_output")]
    pub probability_output: String,

    /// Hex SHA-256 of the model file; checked when present
    #[serde(default)]
    pub sha256: Option<String>,
}

impl ModelManifest {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ModelError::Configuration(format!("cannot read manifest {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            ModelError::Configuration(format!("invalid manifest {}: {}", path.display(), e))
        })
    }

    /// Reject artifacts exported for a different feature layout
    pub fn check_layout(&self) -> Result<(), ModelError> {
        validate_layout(self.schema_version, &self.feature_names)
            .map_err(|e| ModelError::Configuration(e.to_string()))
    }

    pub fn check_checksum(&self, model_bytes: &[u8]) -> Result<(), ModelError> {
        let Some(expected) = &self.sha256 else {
            return Ok(());
        };

        let actual = hex::encode(Sha256::digest(model_bytes));
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(ModelError::Configuration(format!(
                "model checksum mismatch: manifest {}, file {}",
                expected, actual
            )));
        }

        Ok(())
    }
}
