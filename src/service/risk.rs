//! Post-processing of the model output: risk tier and rule-based factors

use crate::features::DerivedFeatures;
use crate::models::{PatientObservation, RiskFactor, RiskLevel};

/// Upper bound (exclusive) of the low tier
pub const LOW_UPPER: f64 = 0.33;
/// Upper bound (exclusive) of the medium tier
pub const MEDIUM_UPPER: f64 = 0.66;

/// Slack for float32 noise around 0 and 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

pub fn is_valid_probability(p: f64) -> bool {
    p.is_finite() && (-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&p)
}

/// Clamp into [0, 1] and round to 4 decimals
pub fn round_probability(p: f64) -> f64 {
    (p.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}

pub fn risk_level_for(p: f64) -> RiskLevel {
    if p < LOW_UPPER {
        RiskLevel::Low
    } else if p < MEDIUM_UPPER {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Evaluate every rule in fixed order; each rule owns a distinct field.
pub fn derive_factors(obs: &PatientObservation, derived: &DerivedFeatures) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if obs.cholesterol >= 3 {
        factors.push(RiskFactor::new("cholesterol", "high", "High cholesterol (>= 3)"));
    }
    if obs.gluc >= 3 {
        factors.push(RiskFactor::new("gluc", "high", "High blood glucose (>= 3)"));
    }
    if obs.ap_hi > 140 || obs.ap_lo > 90 {
        factors.push(RiskFactor::new("blood_pressure", "high", "High blood pressure (>140/90)"));
    }
    if derived.bmi >= 30.0 {
        factors.push(RiskFactor::new("bmi", "high", "High BMI (>= 30)"));
    }
    if obs.smoke == 1 {
        factors.push(RiskFactor::new("smoke", "yes", "Smoker"));
    }
    if obs.alco == 1 {
        factors.push(RiskFactor::new("alco", "yes", "Drinks alcohol"));
    }
    if obs.active == 0 {
        factors.push(RiskFactor::new("active", "low", "Low physical activity"));
    }

    factors
}
