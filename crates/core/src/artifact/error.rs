//! Error types for the artifact store.

use std::path::PathBuf;
use thiserror::Error;

use super::types::ArtifactRole;
use crate::session::SessionToken;

/// Errors that can occur while storing or looking up artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No artifact exists for the session and role.
    #[error("No {role} artifact for session {token}")]
    NotFound {
        token: SessionToken,
        role: ArtifactRole,
    },

    /// Storage directory could not be created.
    #[error("Failed to create storage directory: {path}")]
    DirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an artifact failed.
    #[error("Failed to write artifact: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing an artifact failed.
    #[error("Failed to remove artifact: {path}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtifactError {
    /// Creates a not-found error.
    pub fn not_found(token: SessionToken, role: ArtifactRole) -> Self {
        Self::NotFound { token, role }
    }

    /// Whether the artifact simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
