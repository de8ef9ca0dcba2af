//! Activity Recognition Server
//!
//! Serves a pretrained sensor classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ACTIVITY RECOGNITION SERVER                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /predict                                              │
//! │      │                                                      │
//! │      ▼                                                      │
//! │  ┌───────────┐  ┌────────────┐  ┌────────────────────────┐  │
//! │  │ Validator │─▶│ Normalizer │─▶│ Inference Service      │  │
//! │  │ (100 x 6) │  │ (z-score)  │  │ (ONNX Runtime, argmax) │  │
//! │  └───────────┘  └────────────┘  └────────────────────────┘  │
//! │                       ▲                    ▲                │
//! │                ┌──────┴────────────────────┴──────┐         │
//! │                │  Assets (loaded once, read-only) │         │
//! │                └──────────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod assets;
pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult, StartupError};

use assets::{Assets, ModelInfo};
use classifier::InferenceService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
    pub model: Arc<ModelInfo>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(assets: Assets, config: config::Config) -> Self {
        Self {
            service: Arc::new(assets.service),
            model: Arc::new(assets.info),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
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
