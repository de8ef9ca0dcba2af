//! Normalization statistics from training
//!
//! Per-channel z-score: `(x - mean[c]) / std[c]`.

use std::path::Path;

use ndarray::{Array1, Array3, ArrayView1, ArrayView2, Axis};
use serde::Deserialize;

use crate::error::StartupError;
use super::{CHANNEL_COUNT, CHANNELS};

/// Mean and standard deviation per channel
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationStats {
    mean: Array1<f32>,
    std: Array1<f32>,
}

/// Accepted on-disk layouts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatsFile {
    Named { mean: Vec<f32>, std: Vec<f32> },
    Rows(Vec<Vec<f32>>),
}

impl NormalizationStats {
    /// Validate a mean/std pair. Every std must be finite and positive.
    pub fn new(mean: Vec<f32>, std: Vec<f32>) -> Result<Self, StartupError> {
        if mean.len() != CHANNEL_COUNT || std.len() != CHANNEL_COUNT {
            return Err(StartupError::InvalidStats(format!(
                "expected {} values each, got mean={} std={}",
                CHANNEL_COUNT, mean.len(), std.len()
            )));
        }

        for (i, (&m, &s)) in mean.iter().zip(std.iter()).enumerate() {
            if !m.is_finite() || !s.is_finite() {
                return Err(StartupError::InvalidStats(format!(
                    "non-finite statistic for channel {}", CHANNELS[i]
                )));
            }
            if s <= 0.0 {
                return Err(StartupError::InvalidStats(format!(
                    "std for channel {} must be positive, got {}", CHANNELS[i], s
                )));
            }
        }

        Ok(Self {
            mean: Array1::from(mean),
            std: Array1::from(std),
        })
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.exists() {
            return Err(StartupError::MissingFile(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| StartupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: StatsFile = serde_json::from_str(&content).map_err(|source| StartupError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_file(file)
    }

    fn from_file(file: StatsFile) -> Result<Self, StartupError> {
        match file {
            StatsFile::Named { mean, std } => Self::new(mean, std),
            StatsFile::Rows(rows) => {
                let mut rows = rows.into_iter();
                match (rows.next(), rows.next(), rows.next()) {
                    (Some(mean), Some(std), None) => Self::new(mean, std),
                    _ => Err(StartupError::InvalidStats(
                        "array layout must have exactly two rows (mean, std)".to_string(),
                    )),
                }
            }
        }
    }

    pub fn mean(&self) -> ArrayView1<'_, f32> {
        self.mean.view()
    }

    pub fn std(&self) -> ArrayView1<'_, f32> {
        self.std.view()
    }

    /// Normalize a `(timesteps, channels)` window into a `(1, timesteps, channels)` batch.
    pub fn normalize(&self, window: ArrayView2<'_, f32>) -> Array3<f32> {
        let normalized = (&window - &self.mean) / &self.std;
        normalized.insert_axis(Axis(0))
    }
}
