//! Types for the pipeline module.

use serde::Serialize;

use crate::artifact::Artifact;
use crate::session::SessionToken;

/// An uploaded file as received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client supplied file name; only its extension is used.
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedSession {
    pub token: SessionToken,
    /// Retained original upload.
    pub original: Artifact,
    /// Finished compressed output.
    pub output: Artifact,
    pub duration_ms: u64,
}

/// Snapshot of pipeline activity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineStatus {
    /// Runs currently holding a permit.
    pub active_runs: usize,
    /// Runs waiting for a permit.
    pub queued_runs: usize,
    pub max_concurrent: usize,
    pub total_processed: u64,
    pub total_failed: u64,
}
