//! Patient observation model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One set of patient measurements submitted for prediction.
///
/// Field names match the columns the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PatientObservation {
    /// Age in years (fractional allowed, e.g. 45.5)
    pub age_years: f64,

    /// 1 = female, 2 = male
    #[validate(range(min = 1, max = 2, message = "gender must be 1 or 2"))]
    pub gender: i64,

    /// Height in cm
    pub height: f64,

    /// Weight in kg
    pub weight: f64,

    /// Systolic blood pressure
    pub ap_hi: i64,

    /// Diastolic blood pressure
    pub ap_lo: i64,

    /// 1 normal, 2 above normal, 3 well above normal
    #[validate(range(min = 1, max = 3, message = "cholesterol must be 1, 2 or 3"))]
    pub cholesterol: i64,

    /// 1 normal, 2 above normal, 3 well above normal
    #[validate(range(min = 1, max = 3, message = "gluc must be 1, 2 or 3"))]
    pub gluc: i64,

    #[validate(range(min = 0, max = 1, message = "smoke must be 0 or 1"))]
    pub smoke: i64,

    #[validate(range(min = 0, max = 1, message = "alco must be 0 or 1"))]
    pub alco: i64,

    #[validate(range(min = 0, max = 1, message = "active must be 0 or 1"))]
    pub active: i64,
}
