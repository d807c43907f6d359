//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Default location of the exported classifier, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "models/heart_disease_model.onnx";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// ONNX model artifact
    pub model_path: PathBuf,

    /// Sidecar manifest describing the model's feature schema
    pub manifest_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let model_path: PathBuf = lookup("MODEL_PATH")
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
            .into();

        let manifest_path = lookup("MODEL_MANIFEST_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| model_path.with_extension("json"));

        Self {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            model_path,
            manifest_path,

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
