//! Sensor window request model
//!
//! Turns an untyped JSON body into a typed `(100, 6)` window.

use ndarray::{Array2, ArrayView2};
use serde_json::Value;

use crate::classifier::{CHANNELS, CHANNEL_COUNT, SEQUENCE_LENGTH};
use crate::error::AppError;

/// Field holding the readings
pub const SENSOR_DATA_FIELD: &str = "sensor_data";

/// A validated window of readings, one row per timestep
#[derive(Debug, Clone, PartialEq)]
pub struct SensorWindow(Array2<f32>);

impl SensorWindow {
    /// Parse a raw request body
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        let json: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("Malformed JSON body: {}", e)))?;
        Self::from_json(&json)
    }

    /// Validate a parsed request body
    pub fn from_json(json: &Value) -> Result<Self, AppError> {
        let data = json.get(SENSOR_DATA_FIELD)
            .ok_or_else(|| AppError::validation(format!("Expected '{}' array in JSON", SENSOR_DATA_FIELD)))?;

        let shape = shape_of(data)?;
        if shape != [SEQUENCE_LENGTH, CHANNEL_COUNT] {
            return Err(AppError::validation_with_hint(
                format!(
                    "Invalid shape. Expected {}, got {}",
                    format_shape(&[SEQUENCE_LENGTH, CHANNEL_COUNT]),
                    format_shape(&shape)
                ),
                hint(),
            ));
        }

        let mut values = Vec::with_capacity(SEQUENCE_LENGTH * CHANNEL_COUNT);
        // shape_of has already guaranteed a 100 x 6 array of arrays
        for (t, row) in data.as_array().into_iter().flatten().enumerate() {
            for (c, cell) in row.as_array().into_iter().flatten().enumerate() {
                let value = cell.as_f64().ok_or_else(|| AppError::validation_with_hint(
                    format!("{}[{}][{}] is not a number", SENSOR_DATA_FIELD, t, c),
                    hint(),
                ))?;
                values.push(value as f32);
            }
        }

        Array2::from_shape_vec((SEQUENCE_LENGTH, CHANNEL_COUNT), values)
            .map(SensorWindow)
            .map_err(|e| AppError::Internal(format!("Array error: {}", e)))
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }
}

fn hint() -> String {
    format!(
        "Send exactly {} timesteps of [{}]",
        SEQUENCE_LENGTH,
        CHANNELS.join(",")
    )
}

/// Shape the value would have as an n-d array, up to two dimensions.
fn shape_of(value: &Value) -> Result<Vec<usize>, AppError> {
    let rows = match value.as_array() {
        Some(rows) => rows,
        None => return Ok(vec![]),
    };

    let row_lengths: Vec<Option<usize>> = rows.iter()
        .map(|row| row.as_array().map(Vec::len))
        .collect();

    match row_lengths.first() {
        None => Ok(vec![0]),
        Some(None) if row_lengths.iter().all(Option::is_none) => Ok(vec![rows.len()]),
        Some(&Some(width)) if row_lengths.iter().all(|len| *len == Some(width)) => {
            Ok(vec![rows.len(), width])
        }
        _ => Err(AppError::validation_with_hint(
            format!("Invalid shape. {} rows must all have the same length", SENSOR_DATA_FIELD),
            hint(),
        )),
    }
}

/// Render like a tuple: `()`, `(5,)`, `(100, 6)`
fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({},)", single),
        dims => format!(
            "({})",
            dims.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        ),
    }
}
