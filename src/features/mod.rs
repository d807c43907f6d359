//! Feature engineering - derived variables and the model input layout

pub mod layout;
pub mod vector;

pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_SCHEMA_VERSION, LayoutInfo};
pub use vector::{DerivedFeatures, FeatureError, FeatureVector};
