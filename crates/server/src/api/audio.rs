//! Upload, playback, download and cleanup of processed audio.

use axum::{
    body::Body,
    extract::{Multipart, Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use pedal_core::{
    Artifact, ArtifactRole, AudioFormat, EffectForm, PresetCatalog, SessionToken, UploadedFile,
};

use super::error::ApiError;
use crate::state::AppState;

/// Offered to browsers for downloaded output.
pub const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"processed_audio.mp3\"";

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub session_id: String,
    pub original_file: String,
    pub output_file: String,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    pub removed: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /upload
///
/// Multipart fields: `file`, `effect`, `preset`, `pot1`..`pot4`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<UploadedFile> = None;
    let mut form = EffectForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field.bytes().await?;
            upload = Some(UploadedFile::new(file_name, data.to_vec()));
        } else {
            let value = field.text().await?;
            form.set(&name, value);
        }
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    if upload.file_name.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }

    // File type is checked before any control value.
    AudioFormat::from_file_name(&upload.file_name)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let request = form
        .into_request(&state.config().effect.default_effect, PresetCatalog::get)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let session = state.pipeline().process(upload, request).await?;
    let session_id = session.token.to_string();

    Ok(Json(UploadResponse {
        success: true,
        download_url: format!("/download/{}", session_id),
        session_id,
        original_file: session.original.file_name(),
        output_file: session.output.file_name(),
    }))
}

/// GET /download/{session_id}
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let token = parse_token(&session_id, "File not found")?;
    let artifact = state
        .pipeline()
        .store()
        .locate(&token, ArtifactRole::Output)
        .await
        .map_err(|e| not_found_as(e, "File not found"))?;

    let mut response = serve_artifact(&artifact, request, "File not found").await?;
    if response.status().is_success() {
        response.headers_mut().insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static(DOWNLOAD_DISPOSITION),
        );
    }
    Ok(response)
}

/// GET /play/{session_id}/{file_type}
///
/// Streams inline with Range support, so browsers can seek.
pub async fn play(
    State(state): State<Arc<AppState>>,
    Path((session_id, file_type)): Path<(String, String)>,
    request: Request,
) -> Result<Response, ApiError> {
    let (role, missing) = match file_type.as_str() {
        "original" => (ArtifactRole::Input, "Original file not found"),
        "processed" => (ArtifactRole::Output, "Processed file not found"),
        _ => return Err(ApiError::BadRequest("Invalid file type".to_string())),
    };

    let token = parse_token(&session_id, missing)?;
    let artifact = state
        .pipeline()
        .store()
        .locate(&token, role)
        .await
        .map_err(|e| not_found_as(e, missing))?;

    serve_artifact(&artifact, request, missing).await
}

/// POST /cleanup/{session_id}
///
/// Malformed ids cannot name any stored file, so they remove nothing.
pub async fn cleanup(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let removed = match session_id.parse::<SessionToken>() {
        Ok(token) => state.pipeline().cleanup(&token).await.map_err(|e| {
            tracing::error!(session = %token, error = %e, "Cleanup failed");
            ApiError::Internal("Server error: could not remove session files".to_string())
        })?,
        Err(_) => 0,
    };

    Ok(Json(CleanupResponse {
        success: true,
        removed,
    }))
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_token(session_id: &str, missing: &str) -> Result<SessionToken, ApiError> {
    session_id
        .parse()
        .map_err(|_| ApiError::NotFound(missing.to_string()))
}

fn not_found_as(err: pedal_core::ArtifactError, message: &str) -> ApiError {
    if err.is_not_found() {
        ApiError::NotFound(message.to_string())
    } else {
        err.into()
    }
}

/// Serves a located artifact. A file removed after lookup is reported as
/// `missing` rather than an empty 404.
async fn serve_artifact(
    artifact: &Artifact,
    request: Request,
    missing: &str,
) -> Result<Response, ApiError> {
    let mut response = match ServeFile::new(&artifact.path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(missing.to_string()));
    }

    if response.status().is_success() {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(artifact.format.mime_type()),
        );
    }
    Ok(response)
}
