//! ONNX Runtime classifier
//!
//! Loads the exported activity model and runs it on a single window.

use ndarray::ArrayView3;
use parking_lot::Mutex;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::error::StartupError;
use super::{Classifier, InferenceError, INPUT_SHAPE};

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    // `Session::run` needs exclusive access
    session: Mutex<Session>,
    input_shape: Vec<i64>,
    output_name: String,
    num_classes: Option<usize>,
}

impl OnnxClassifier {
    /// Build a session from model bytes already read from disk
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, StartupError> {
        tracing::debug!("Creating ONNX session from {} bytes", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| StartupError::Model(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| StartupError::Model(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| StartupError::Model(format!("Failed to load model: {}", e)))?;

        let input_shape: Vec<i64> = session.inputs.first()
            .ok_or_else(|| StartupError::Model("No input defined".to_string()))?
            .input_type
            .tensor_shape()
            .map(|shape| shape.iter().copied().collect())
            .ok_or_else(|| StartupError::Model("Model input is not a tensor".to_string()))?;

        check_input_shape(&input_shape)?;

        let output = session.outputs.first()
            .ok_or_else(|| StartupError::Model("No output defined".to_string()))?;
        let output_name = output.name.clone();
        let num_classes = output.output_type
            .tensor_shape()
            .and_then(|shape| shape.last().copied())
            .and_then(|dim| usize::try_from(dim).ok())
            .filter(|&dim| dim > 0);

        Ok(Self {
            session: Mutex::new(session),
            input_shape,
            output_name,
            num_classes,
        })
    }

    /// Input shape as declared by the model (`-1` for dynamic dimensions)
    pub fn input_shape(&self) -> &[i64] {
        &self.input_shape
    }
}

/// Static dimensions must match `[1, 100, 6]`; dynamic ones (`<= 0`) are accepted.
fn check_input_shape(found: &[i64]) -> Result<(), StartupError> {
    let matches = found.len() == INPUT_SHAPE.len()
        && found.iter().zip(INPUT_SHAPE.iter())
            .all(|(&dim, &expected)| dim <= 0 || dim as usize == expected);

    if matches {
        Ok(())
    } else {
        Err(StartupError::InputShapeMismatch {
            expected: INPUT_SHAPE,
            found: found.to_vec(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Vec<f32>, InferenceError> {
        let input_tensor = Tensor::from_array(input.to_owned())
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs.get(&self.output_name)
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        Ok(data.to_vec())
    }

    fn num_classes(&self) -> Option<usize> {
        self.num_classes
    }

    fn describe(&self) -> String {
        format!("ONNX Runtime (CPU), input {:?}", self.input_shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_shape_accepts_static_and_dynamic_batch() {
        assert!(check_input_shape(&[1, 100, 6]).is_ok());
        assert!(check_input_shape(&[-1, 100, 6]).is_ok());
    }

    #[test]
    fn test_input_shape_rejects_wrong_channels() {
        let err = check_input_shape(&[1, 100, 5]).unwrap_err();
        assert!(matches!(err, StartupError::InputShapeMismatch { .. }));
        assert!(check_input_shape(&[1, 600]).is_err());
    }
}
