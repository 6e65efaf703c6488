//! Types for the artifact store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::request::AudioFormat;
use crate::session::SessionToken;

/// Extension used for raw PCM intermediates.
pub const RAW_EXTENSION: &str = "raw";

/// Which side of the pipeline an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactRole {
    Input,
    Output,
}

impl ArtifactRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    /// File name for this role with the given extension.
    pub fn file_name(&self, token: &SessionToken, extension: &str) -> String {
        format!("{}_{}.{}", token, self.as_str(), extension)
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored file belonging to a session.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub token: SessionToken,
    pub role: ArtifactRole,
    pub format: AudioFormat,
    pub path: PathBuf,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Artifact {
    /// File name without directory, safe to show to clients.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.role.file_name(&self.token, self.format.extension()))
    }
}
