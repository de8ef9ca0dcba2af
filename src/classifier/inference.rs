//! Inference Service
//!
//! Normalize → run classifier → argmax → label lookup.

use std::collections::BTreeMap;
use std::time::Instant;

use ndarray::ArrayView2;
use serde::Serialize;

use crate::error::StartupError;
use super::{Classifier, ClassLabels, InferenceError, NormalizationStats};

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub prediction: String,
    pub confidence: f32,
    pub all_probabilities: BTreeMap<String, f32>,
}

/// Everything a request needs, loaded once and shared read-only
pub struct InferenceService {
    classifier: Box<dyn Classifier>,
    stats: NormalizationStats,
    labels: ClassLabels,
}

impl std::fmt::Debug for InferenceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceService")
            .field("classifier", &self.classifier.describe())
            .field("stats", &self.stats)
            .field("labels", &self.labels)
            .finish()
    }
}

impl InferenceService {
    pub fn new(
        classifier: Box<dyn Classifier>,
        stats: NormalizationStats,
        labels: ClassLabels,
    ) -> Result<Self, StartupError> {
        if let Some(model) = classifier.num_classes() {
            if model != labels.len() {
                return Err(StartupError::ClassCountMismatch {
                    model,
                    labels: labels.len(),
                });
            }
        }

        Ok(Self { classifier, stats, labels })
    }

    /// Classify one validated `(100, 6)` window
    pub fn predict(&self, window: ArrayView2<'_, f32>) -> Result<Prediction, InferenceError> {
        let start_time = Instant::now();

        let input = self.stats.normalize(window);
        let probabilities = self.classifier.predict(input.view())?;

        let prediction = self.decode(&probabilities)?;

        tracing::info!(
            prediction = %prediction.prediction,
            confidence = prediction.confidence,
            inference_time_us = start_time.elapsed().as_micros() as u64,
            "Predicted activity: {}, confidence: {:.2}",
            prediction.prediction,
            prediction.confidence,
        );

        Ok(prediction)
    }

    /// Map a raw probability vector onto the label table
    pub fn decode(&self, probabilities: &[f32]) -> Result<Prediction, InferenceError> {
        if probabilities.len() != self.labels.len() {
            return Err(InferenceError(format!(
                "Classifier returned {} probabilities for {} classes",
                probabilities.len(),
                self.labels.len()
            )));
        }

        let index = argmax(probabilities)?;
        let confidence = probabilities[index];
        let prediction = self.labels.get(index)
            .ok_or_else(|| InferenceError(format!("No label for class index {}", index)))?
            .to_string();

        let all_probabilities = self.labels.iter()
            .zip(probabilities.iter())
            .map(|(class, &prob)| (class.to_string(), prob))
            .collect();

        Ok(Prediction {
            prediction,
            confidence,
            all_probabilities,
        })
    }
}

/// Index of the largest value; ties go to the lowest index.
pub fn argmax(values: &[f32]) -> Result<usize, InferenceError> {
    let mut best: Option<(usize, f32)> = None;

    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(InferenceError(format!("Non-finite probability {} at class index {}", v, i)));
        }
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }

    best.map(|(i, _)| i)
        .ok_or_else(|| InferenceError("Classifier returned no probabilities".to_string()))
}
