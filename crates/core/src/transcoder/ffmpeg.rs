//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::Duration;

use super::config::TranscoderConfig;
use super::error::TranscodeError;
use super::traits::Transcoder;
use super::types::{TranscodeOutcome, RAW_PCM};
use crate::supervise::run_with_timeout;

/// FFmpeg-based transcoder implementation.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    /// Returns the transcoder configuration.
    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Builds ffmpeg arguments for decoding into raw PCM.
    fn build_to_raw_args(&self, input: &Path, raw_output: &Path) -> Vec<String> {
        let mut args = vec![
            "-v".to_string(),
            self.config.log_level.clone(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
        ];
        args.extend(RAW_PCM.to_ffmpeg_args());
        args.push("-y".to_string()); // Overwrite output
        args.extend(self.config.extra_args.iter().cloned());
        args.push(raw_output.to_string_lossy().to_string());
        args
    }

    /// Builds ffmpeg arguments for encoding raw PCM.
    fn build_to_compressed_args(
        &self,
        raw_input: &Path,
        output: &Path,
        bitrate_kbps: u32,
    ) -> Vec<String> {
        // The raw layout must precede -i since raw PCM has no header
        let mut args = vec!["-v".to_string(), self.config.log_level.clone()];
        args.extend(RAW_PCM.to_ffmpeg_args());
        args.extend([
            "-i".to_string(),
            raw_input.to_string_lossy().to_string(),
            "-b:a".to_string(),
            format!("{}k", bitrate_kbps),
            "-y".to_string(),
        ]);
        args.extend(self.config.extra_args.iter().cloned());
        args.push(output.to_string_lossy().to_string());
        args
    }

    /// Runs ffmpeg and checks that it produced the expected file.
    async fn run(
        &self,
        input: &Path,
        output: &Path,
        args: Vec<String>,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let start = Instant::now();

        if !tokio::fs::try_exists(input).await? {
            return Err(TranscodeError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        // Ensure output directory exists
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                TranscodeError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        let mut command = Command::new(&self.config.ffmpeg_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null());

        let result = run_with_timeout(
            &self.config.ffmpeg_path,
            command,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await?;

        if !result.success() {
            return Err(TranscodeError::failed(
                format!("FFmpeg exited with code: {:?}", result.status.code()),
                result.stderr_excerpt(),
            ));
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(output)
            .await
            .map_err(|_| TranscodeError::MissingOutput {
                path: output.to_path_buf(),
            })?;

        Ok(TranscodeOutcome {
            output_path: output.to_path_buf(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn to_raw(
        &self,
        input: &Path,
        raw_output: &Path,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let args = self.build_to_raw_args(input, raw_output);
        self.run(input, raw_output, args).await
    }

    async fn to_compressed(
        &self,
        raw_input: &Path,
        output: &Path,
        bitrate_kbps: u32,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let args = self.build_to_compressed_args(raw_input, output, bitrate_kbps);
        self.run(raw_input, output, args).await
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        let mut command = Command::new(&self.config.ffmpeg_path);
        command
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null());

        let result = run_with_timeout(&self.config.ffmpeg_path, command, Duration::from_secs(10))
            .await?;

        if !result.success() {
            return Err(TranscodeError::failed(
                "FFmpeg -version returned an error",
                result.stderr_excerpt(),
            ));
        }
        Ok(())
    }
}
