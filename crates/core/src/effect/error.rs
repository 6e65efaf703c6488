//! Error types for the effect module.

use std::path::PathBuf;
use thiserror::Error;

use crate::supervise::SuperviseError;

/// Errors that can occur while running the effects processor.
#[derive(Debug, Error)]
pub enum EffectError {
    /// Effects binary not found.
    #[error("Effects processor not found at path: {path}")]
    BinaryNotFound { path: PathBuf },

    /// Raw input file not found.
    #[error("Raw input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Processor exited unsuccessfully.
    #[error("Effect processing failed: {reason}")]
    Failed {
        reason: String,
        stderr: Option<String>,
    },

    /// Processor did not finish in time.
    #[error("Effect processing timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while plumbing the byte streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EffectError {
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

impl From<SuperviseError> for EffectError {
    fn from(err: SuperviseError) -> Self {
        match err {
            SuperviseError::NotFound { program } => Self::BinaryNotFound { path: program },
            SuperviseError::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            SuperviseError::Io(e) => Self::Io(e),
        }
    }
}
