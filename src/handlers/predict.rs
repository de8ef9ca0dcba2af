//! Prediction handler

use axum::{body::Bytes, extract::State, Json};

use crate::{AppState, AppResult};
use crate::classifier::Prediction;
use crate::models::SensorWindow;

/// Classify one sensor window
///
/// The body is read as raw bytes so malformed JSON gets the same
/// `{"error": ...}` shape as every other failure.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<Prediction>> {
    let window = SensorWindow::from_body(&body)?;

    let service = state.service.clone();
    let prediction = tokio::task::spawn_blocking(move || service.predict(window.view()))
        .await??;

    Ok(Json(prediction))
}
