//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

use crate::supervise::SuperviseError;

/// Errors that can occur while transcoding.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// FFmpeg exited unsuccessfully.
    #[error("Transcoding failed: {reason}")]
    Failed {
        reason: String,
        stderr: Option<String>,
    },

    /// FFmpeg reported success but produced no file.
    #[error("Transcoder produced no output file: {path}")]
    MissingOutput { path: PathBuf },

    /// FFmpeg did not finish in time.
    #[error("Transcoding timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while running ffmpeg.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscodeError {
    /// Creates a failure error with optional stderr output.
    pub fn failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Whether the run was cut short by the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<SuperviseError> for TranscodeError {
    fn from(err: SuperviseError) -> Self {
        match err {
            SuperviseError::NotFound { program } => Self::FfmpegNotFound { path: program },
            SuperviseError::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            SuperviseError::Io(e) => Self::Io(e),
        }
    }
}
