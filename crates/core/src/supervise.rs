//! Bounded execution of external tools.
//!
//! Every child is spawned with `kill_on_drop`, so when the timeout elapses and the
//! wait future is dropped the process is killed rather than left running.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;

/// Result of a finished child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Trimmed stderr, or `None` when the tool printed nothing.
    pub fn stderr_excerpt(&self) -> Option<String> {
        let trimmed = self.stderr.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Failures to run a child to completion.
#[derive(Debug, Error)]
pub enum SuperviseError {
    /// Program could not be found.
    #[error("Program not found: {program}")]
    NotFound { program: PathBuf },

    /// Child did not finish within the allowed time and was killed.
    #[error("Process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Spawning or waiting failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs a prepared command to completion, capturing stderr.
///
/// Stdin and stdout are left as configured by the caller.
pub async fn run_with_timeout(
    program: &Path,
    mut command: Command,
    limit: Duration,
) -> Result<ProcessOutput, SuperviseError> {
    let start = Instant::now();

    let child = command
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SuperviseError::NotFound {
                    program: program.to_path_buf(),
                }
            } else {
                SuperviseError::Io(e)
            }
        })?;

    match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(ProcessOutput {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            elapsed: start.elapsed(),
        }),
        Ok(Err(e)) => Err(SuperviseError::Io(e)),
        Err(_) => Err(SuperviseError::Timeout {
            timeout_secs: limit.as_secs(),
        }),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> (PathBuf, Command) {
        let program = PathBuf::from("/bin/sh");
        let mut command = Command::new(&program);
        command.arg("-c").arg(script).stdin(Stdio::null()).stdout(Stdio::null());
        (program, command)
    }

    #[tokio::test]
    async fn test_captures_exit_status_and_stderr() {
        let (program, command) = sh("echo boom >&2; exit 3");
        let output = run_with_timeout(&program, command, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!output.success());
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stderr_excerpt().as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_success_without_stderr() {
        let (program, command) = sh("exit 0");
        let output = run_with_timeout(&program, command, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(output.success());
        assert!(output.stderr_excerpt().is_none());
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let (program, command) = sh("sleep 30");
        let start = Instant::now();
        let err = run_with_timeout(&program, command, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, SuperviseError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let program = PathBuf::from("/definitely/not/here");
        let command = Command::new(&program);
        let err = run_with_timeout(&program, command, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SuperviseError::NotFound { .. }));
    }
}
