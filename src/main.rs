//! Cardiovascular Risk Prediction Server
//!
//! Serves a pre-trained binary classifier behind `POST /predict`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    CARDIO RISK SERVER                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────────┐  │
//! │  │  API      │──▶│  Prediction  │──▶│  RiskModel          │  │
//! │  │  (Axum)   │   │  Service     │   │  (ONNX Runtime)     │  │
//! │  └───────────┘   └──────┬───────┘   └─────────────────────┘  │
//! │                         ▼                                    │
//! │               features → tier → factors                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod features;
mod handlers;
mod inference;
mod models;
mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::inference::{OnnxModel, RiskModel};
use crate::service::PredictionService;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("Cardio risk server starting...");
    tracing::info!(
        "Feature schema v{} ({})",
        features::FEATURE_SCHEMA_VERSION,
        features::LayoutInfo::current().layout_hash
    );

    // A bad artifact keeps the server up: /health reports it, /predict returns 500
    let model = match OnnxModel::load(&config.model_path, &config.manifest_path) {
        Ok(model) => Some(Arc::new(model) as Arc<dyn RiskModel>),
        Err(e) => {
            tracing::error!("Cannot load model from {}: {}", config.model_path.display(), e);
            None
        }
    };

    // Build application state
    let state = AppState {
        service: Arc::new(PredictionService::new(model)),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cardio_risk_server=debug,tower_http=debug".into());

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/model", get(handlers::model::status))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
