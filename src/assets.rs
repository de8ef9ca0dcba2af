//! Asset loading
//!
//! Runs once before the listener is bound. Any failure here is fatal.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::classifier::{ClassLabels, InferenceService, NormalizationStats, OnnxClassifier};
use crate::config::Config;
use crate::error::StartupError;

/// What got loaded, reported by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub path: String,
    pub sha256: String,
    pub input_shape: Vec<i64>,
    pub classes: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Loaded, validated assets
#[derive(Debug)]
pub struct Assets {
    pub service: InferenceService,
    pub info: ModelInfo,
}

/// Load classifier, statistics and labels from the configured paths
pub fn load(config: &Config) -> Result<Assets, StartupError> {
    let model_path = Path::new(&config.model_path);
    tracing::info!("Loading model from: {}", model_path.display());

    if !model_path.exists() {
        return Err(StartupError::MissingFile(model_path.to_path_buf()));
    }
    let model_bytes = std::fs::read(model_path).map_err(|source| StartupError::Io {
        path: model_path.to_path_buf(),
        source,
    })?;
    let sha256 = hex::encode(Sha256::digest(&model_bytes));

    let classifier = OnnxClassifier::from_bytes(&model_bytes)?;
    let input_shape = classifier.input_shape().to_vec();
    tracing::info!("Model loaded. Expected input shape: {:?} (sha256 {})", input_shape, sha256);

    let stats = NormalizationStats::load(Path::new(&config.norm_stats_path))?;
    tracing::info!("Normalization - Mean: {}, Std: {}", stats.mean(), stats.std());

    let labels = ClassLabels::load(Path::new(&config.labels_path))?;
    let classes: Vec<String> = labels.iter().map(str::to_string).collect();
    tracing::info!("Label classes: {:?}", classes);

    let service = InferenceService::new(Box::new(classifier), stats, labels)?;

    Ok(Assets {
        service,
        info: ModelInfo {
            path: config.model_path.clone(),
            sha256,
            input_shape,
            classes,
            loaded_at: Utc::now(),
        },
    })
}
