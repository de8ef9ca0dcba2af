//! Classifier Module - activity recognition model
//!
//! Keeps the model runtime behind the [`Classifier`] trait so the service can
//! be driven by the ONNX session in production and by a fixed vector in tests.

pub mod onnx;
pub mod normalization;
pub mod labels;
pub mod inference;

use ndarray::ArrayView3;

// Re-export common types
pub use onnx::OnnxClassifier;
pub use normalization::NormalizationStats;
pub use labels::ClassLabels;
pub use inference::{InferenceService, Prediction};

/// Timesteps per sensor window
pub const SEQUENCE_LENGTH: usize = 100;

/// Channels per timestep
pub const CHANNEL_COUNT: usize = 6;

/// Channel order expected from the device
pub const CHANNELS: [&str; CHANNEL_COUNT] = ["acc_x", "acc_y", "acc_z", "gyro_x", "gyro_y", "gyro_z"];

/// Input tensor shape fed to the model (single-sample batch)
pub const INPUT_SHAPE: [usize; 3] = [1, SEQUENCE_LENGTH, CHANNEL_COUNT];

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A pretrained model mapping a `(1, 100, 6)` tensor to class probabilities.
pub trait Classifier: Send + Sync {
    /// Run the model; returns the flattened output vector.
    fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Vec<f32>, InferenceError>;

    /// Number of classes, when the model declares a static output size.
    fn num_classes(&self) -> Option<usize>;

    /// Short human readable description for logs and `/health`.
    fn describe(&self) -> String;
}
