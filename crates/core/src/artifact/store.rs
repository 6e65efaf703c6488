//! Artifact store implementation.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::config::StorageConfig;
use super::error::ArtifactError;
use super::types::{Artifact, ArtifactRole, RAW_EXTENSION};
use crate::request::AudioFormat;
use crate::session::SessionToken;

/// Format of every finished output artifact.
pub const OUTPUT_FORMAT: AudioFormat = AudioFormat::Mp3;

/// Filesystem store keyed by session token.
///
/// Operations on different tokens never touch the same file, so the store needs
/// no locking of its own.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    config: StorageConfig,
}

impl ArtifactStore {
    /// Creates a store rooted at the configured directories.
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Creates both storage directories if they do not exist.
    pub async fn ensure_dirs(&self) -> Result<(), ArtifactError> {
        for dir in [&self.config.upload_dir, &self.config.output_dir] {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| ArtifactError::DirectoryFailed {
                    path: dir.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn dir_for(&self, role: ArtifactRole) -> &Path {
        match role {
            ArtifactRole::Input => &self.config.upload_dir,
            ArtifactRole::Output => &self.config.output_dir,
        }
    }

    /// Path of the artifact for a session, role and extension.
    pub fn path_for(&self, token: &SessionToken, role: ArtifactRole, extension: &str) -> PathBuf {
        self.dir_for(role).join(role.file_name(token, extension))
    }

    /// Path of the transient raw PCM file for a role.
    pub fn raw_path(&self, token: &SessionToken, role: ArtifactRole) -> PathBuf {
        self.path_for(token, role, RAW_EXTENSION)
    }

    /// Path of the finished output for a session.
    pub fn output_path(&self, token: &SessionToken) -> PathBuf {
        self.path_for(token, ArtifactRole::Output, OUTPUT_FORMAT.extension())
    }

    /// Writes an artifact, replacing any previous file of the same name.
    pub async fn save(
        &self,
        token: &SessionToken,
        role: ArtifactRole,
        format: AudioFormat,
        data: &[u8],
    ) -> Result<Artifact, ArtifactError> {
        let dir = self.dir_for(role);
        fs::create_dir_all(dir)
            .await
            .map_err(|source| ArtifactError::DirectoryFailed {
                path: dir.to_path_buf(),
                source,
            })?;

        let path = self.path_for(token, role, format.extension());
        fs::write(&path, data)
            .await
            .map_err(|source| ArtifactError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            session = %token,
            role = %role,
            bytes = data.len(),
            "Saved artifact"
        );

        self.describe(token, role, format, path).await
    }

    /// Finds the artifact of a role for a session.
    ///
    /// The original extension of an upload is not recorded anywhere, so input
    /// lookups probe every accepted format and return the first one present.
    pub async fn locate(
        &self,
        token: &SessionToken,
        role: ArtifactRole,
    ) -> Result<Artifact, ArtifactError> {
        let candidates: &[AudioFormat] = match role {
            ArtifactRole::Input => &AudioFormat::ALL,
            ArtifactRole::Output => &[OUTPUT_FORMAT],
        };

        for format in candidates {
            let path = self.path_for(token, role, format.extension());
            if fs::try_exists(&path).await? {
                return self.describe(token, role, *format, path).await;
            }
        }

        Err(ArtifactError::not_found(*token, role))
    }

    /// Removes every file of a session, whatever its role or extension.
    ///
    /// Returns the number of files removed. Missing directories and files that
    /// vanish mid-scan are not errors.
    pub async fn delete(&self, token: &SessionToken) -> Result<usize, ArtifactError> {
        let mut removed = 0;
        for path in self.session_files(token).await? {
            if self.remove_file(&path).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(session = %token, removed, "Deleted session artifacts");
        }
        Ok(removed)
    }

    /// Lists every file currently stored for a session.
    pub async fn session_files(&self, token: &SessionToken) -> Result<Vec<PathBuf>, ArtifactError> {
        let prefix = token.file_prefix();
        let mut files = Vec::new();

        for dir in [&self.config.upload_dir, &self.config.output_dir] {
            let mut entries = match fs::read_dir(dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ArtifactError::Io(e)),
            };

            while let Some(entry) = entries.next_entry().await? {
                if entry.file_name().to_string_lossy().starts_with(&prefix) {
                    files.push(entry.path());
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Removes a single file. Returns whether it existed.
    pub async fn remove_file(&self, path: &Path) -> Result<bool, ArtifactError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ArtifactError::RemoveFailed {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    async fn describe(
        &self,
        token: &SessionToken,
        role: ArtifactRole,
        format: AudioFormat,
        path: PathBuf,
    ) -> Result<Artifact, ArtifactError> {
        let metadata = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::not_found(*token, role)
            } else {
                ArtifactError::Io(e)
            }
        })?;

        Ok(Artifact {
            token: *token,
            role,
            format,
            path,
            size_bytes: metadata.len(),
            modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }
}
