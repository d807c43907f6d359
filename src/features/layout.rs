//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the model input schema.**
//!
//! The classifier was trained on a table whose columns appear here in the
//! exact same order. The model itself cannot tell us when we feed it a
//! shuffled row, so:
//! 1. Add feature → increment FEATURE_SCHEMA_VERSION
//! 2. Change order → increment FEATURE_SCHEMA_VERSION
//! 3. Remove feature → increment FEATURE_SCHEMA_VERSION
//!
//! The model manifest records the version and names it was exported with,
//! and loading refuses any artifact that disagrees with this file.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// SCHEMA VERSION
// ============================================================================

/// Current feature schema version
/// MUST be incremented when layout changes
pub const FEATURE_SCHEMA_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the model input row
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Raw observation (0-10) ===
    "age_years",   // 0: age in years
    "gender",      // 1: 1 = female, 2 = male
    "height",      // 2: cm
    "weight",      // 3: kg
    "ap_hi",       // 4: systolic pressure
    "ap_lo",       // 5: diastolic pressure
    "cholesterol", // 6: 1 normal, 2 above normal, 3 well above
    "gluc",        // 7: 1 normal, 2 above normal, 3 well above
    "smoke",       // 8: 0/1
    "alco",        // 9: 0/1
    "active",      // 10: 0/1

    // === Derived (11-12) ===
    "bmi",         // 11: weight / height_m^2
    "bp_ratio",    // 12: ap_hi / ap_lo
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 13;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of version + ordered names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_SCHEMA_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Complete layout information for logging and the model status endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub schema_version: u8,
    pub layout_hash: String,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            schema_version: FEATURE_SCHEMA_VERSION,
            layout_hash: format!("{:08x}", layout_hash()),
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Model artifact disagrees with the layout compiled into this server
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutMismatchError {
    #[error("feature schema version mismatch: server v{expected}, model v{actual}")]
    Version { expected: u8, actual: u8 },

    #[error("feature count mismatch: server expects {expected}, model declares {actual}")]
    Count { expected: usize, actual: usize },

    #[error("feature {index} mismatch: server expects '{expected}', model declares '{actual}'")]
    Name {
        index: usize,
        expected: &'static str,
        actual: String,
    },
}

/// Validate a declared schema against the current layout
pub fn validate_layout(version: u8, names: &[String]) -> Result<(), LayoutMismatchError> {
    if version != FEATURE_SCHEMA_VERSION {
        return Err(LayoutMismatchError::Version {
            expected: FEATURE_SCHEMA_VERSION,
            actual: version,
        });
    }

    if names.len() != FEATURE_COUNT {
        return Err(LayoutMismatchError::Count {
            expected: FEATURE_COUNT,
            actual: names.len(),
        });
    }

    for (index, (&expected, actual)) in FEATURE_LAYOUT.iter().zip(names).enumerate() {
        if expected != actual.as_str() {
            return Err(LayoutMismatchError::Name {
                index,
                expected,
                actual: actual.clone(),
            });
        }
    }

    Ok(())
}
