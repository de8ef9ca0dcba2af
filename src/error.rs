//! Error handling
//!
//! Two error kinds, never mixed: [`StartupError`] aborts the process before it
//! serves anything, [`AppError`] is turned into a JSON response for one request.

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::path::PathBuf;

pub type AppResult<T> = Result<T, AppError>;

/// Per-request failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Client sent something we cannot classify (400)
    #[error("{message}")]
    Validation {
        message: String,
        hint: Option<String>,
    },

    /// Normalization or inference blew up (500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation { message: message.into(), hint: None }
    }

    pub fn validation_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation { message, hint: Some(hint) } => {
                tracing::debug!("Rejected request: {}", message);
                json!({ "error": message, "hint": hint })
            }
            AppError::Validation { message, hint: None } => {
                tracing::debug!("Rejected request: {}", message);
                json!({ "error": message })
            }
            AppError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::classifier::InferenceError> for AppError {
    fn from(err: crate::classifier::InferenceError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Inference task failed: {}", err))
    }
}

/// Fatal asset loading failure
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("asset not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid normalization statistics: {0}")]
    InvalidStats(String),

    #[error("invalid label table: {0}")]
    InvalidLabels(String),

    #[error("failed to load model: {0}")]
    Model(String),

    #[error("model expects input shape {found:?}, server sends {expected:?}")]
    InputShapeMismatch {
        expected: [usize; 3],
        found: Vec<i64>,
    },

    #[error("model produces {model} classes but label table has {labels}")]
    ClassCountMismatch {
        model: usize,
        labels: usize,
    },
}
