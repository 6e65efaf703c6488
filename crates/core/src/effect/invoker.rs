//! Effects processor invoked as a child process.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::fs::File;
use tokio::process::Command;

use super::config::EffectConfig;
use super::error::EffectError;
use super::traits::EffectProcessor;
use crate::request::EffectRequest;
use crate::supervise::run_with_timeout;

/// Result of a successful effect run.
#[derive(Debug, Clone, Serialize)]
pub struct EffectOutcome {
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
    /// Diagnostic text the processor printed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// Runs the configured binary with the raw input as stdin and the raw output as
/// stdout. The files are handed to the child directly, so no sample data passes
/// through this process.
pub struct ProcessEffectInvoker {
    config: EffectConfig,
}

impl ProcessEffectInvoker {
    pub fn new(config: EffectConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(EffectConfig::default())
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Builds the processor arguments: effect, pot1, pot2, pot3, pot4.
    fn build_args(request: &EffectRequest) -> Vec<String> {
        request.to_args()
    }
}

#[async_trait]
impl EffectProcessor for ProcessEffectInvoker {
    fn name(&self) -> &str {
        "process"
    }

    async fn apply(
        &self,
        raw_input: &Path,
        raw_output: &Path,
        request: &EffectRequest,
    ) -> Result<EffectOutcome, EffectError> {
        let stdin = File::open(raw_input).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EffectError::InputNotFound {
                    path: raw_input.to_path_buf(),
                }
            } else {
                EffectError::Io(e)
            }
        })?;
        if let Some(parent) = raw_output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let stdout = File::create(raw_output).await?;

        let mut command = Command::new(&self.config.binary_path);
        command
            .args(Self::build_args(request))
            .stdin(Stdio::from(stdin.into_std().await))
            .stdout(Stdio::from(stdout.into_std().await));

        let result = run_with_timeout(
            &self.config.binary_path,
            command,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await?;

        if !result.success() {
            return Err(EffectError::failed(
                format!("Effects processor exited with code: {:?}", result.status.code()),
                result.stderr_excerpt(),
            ));
        }

        let output_size_bytes = tokio::fs::metadata(raw_output).await?.len();

        Ok(EffectOutcome {
            output_path: raw_output.to_path_buf(),
            output_size_bytes,
            duration_ms: result.elapsed.as_millis() as u64,
            diagnostics: result.stderr_excerpt(),
        })
    }

    async fn validate(&self) -> Result<(), EffectError> {
        let path = &self.config.binary_path;

        // Bare program names are resolved through PATH at spawn time.
        if path.components().count() <= 1 {
            return Ok(());
        }

        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            _ => Err(EffectError::BinaryNotFound { path: path.clone() }),
        }
    }
}
