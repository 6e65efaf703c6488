//! Error responses for API handlers.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use pedal_core::{ArtifactError, PipelineError};

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced by handlers. Messages are shown to clients verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("Failed to read upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Multipart(e) => e.status(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.user_message())
        } else {
            Self::Internal(err.user_message())
        }
    }
}

impl From<ArtifactError> for ApiError {
    fn from(err: ArtifactError) -> Self {
        if err.is_not_found() {
            Self::NotFound("File not found".to_string())
        } else {
            tracing::error!(error = %err, "Storage error");
            Self::Internal("Server error: could not access audio files".to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            Self::Multipart(e) => format!("Failed to read upload: {}", e.body_text()),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedal_core::{EffectError, RequestError};

    #[test]
    fn test_client_errors_map_to_400() {
        let err: ApiError = PipelineError::from(RequestError::UnknownPreset("x".into())).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Unknown preset: x");
    }

    #[test]
    fn test_processing_errors_map_to_500() {
        let err: ApiError =
            PipelineError::Effect(EffectError::failed("exit 2", Some("/tmp/x".into()))).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Processing error: effect processing failed");
    }
}
