//! Feature Vector - model input row
//!
//! Derives `bmi` and `bp_ratio` from a patient observation and lays all
//! 13 values out in `FEATURE_LAYOUT` order.

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};
use crate::models::PatientObservation;

/// Observation cannot be turned into features
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("diastolic pressure (ap_lo) must not be zero")]
    ZeroDiastolic,

    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f64),
}

/// Variables computed per request, never persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub bmi: f64,
    pub bp_ratio: f64,
}

impl DerivedFeatures {
    pub fn from_observation(obs: &PatientObservation) -> Result<Self, FeatureError> {
        Ok(Self {
            bmi: bmi(obs.height, obs.weight)?,
            bp_ratio: bp_ratio(obs.ap_hi, obs.ap_lo)?,
        })
    }
}

/// weight_kg / height_m²
pub fn bmi(height_cm: f64, weight_kg: f64) -> Result<f64, FeatureError> {
    if height_cm <= 0.0 || !height_cm.is_finite() {
        return Err(FeatureError::NonPositiveHeight(height_cm));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

pub fn bp_ratio(ap_hi: i64, ap_lo: i64) -> Result<f64, FeatureError> {
    if ap_lo == 0 {
        return Err(FeatureError::ZeroDiastolic);
    }
    Ok(ap_hi as f64 / ap_lo as f64)
}

/// Single model input row in `FEATURE_LAYOUT` order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
    derived: DerivedFeatures,
}

impl FeatureVector {
    /// Build the row for one observation.
    ///
    /// Fails before anything reaches the model if a derived feature is undefined.
    pub fn from_observation(obs: &PatientObservation) -> Result<Self, FeatureError> {
        let derived = DerivedFeatures::from_observation(obs)?;

        let values = [
            obs.age_years,
            obs.gender as f64,
            obs.height,
            obs.weight,
            obs.ap_hi as f64,
            obs.ap_lo as f64,
            obs.cholesterol as f64,
            obs.gluc as f64,
            obs.smoke as f64,
            obs.alco as f64,
            obs.active as f64,
            derived.bmi,
            derived.bp_ratio,
        ];

        Ok(Self { values, derived })
    }

    /// Values narrowed to f32 for the ONNX float input
    pub fn as_f32(&self) -> [f32; FEATURE_COUNT] {
        self.values.map(|v| v as f32)
    }

    pub fn derived(&self) -> DerivedFeatures {
        self.derived
    }

    /// (name, value) pairs in layout order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }
}
