//! Mock transcoder for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::transcoder::{TranscodeError, TranscodeOutcome, Transcoder};

/// Direction of a recorded transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeDirection {
    ToRaw,
    ToCompressed,
}

/// A recorded transcode call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTranscode {
    pub direction: TranscodeDirection,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Set for encodes only.
    pub bitrate_kbps: Option<u32>,
    pub success: bool,
}

/// Mock implementation of the Transcoder trait.
///
/// Copies input bytes to the output path unchanged, so a run through the
/// pipeline produces real files without ffmpeg installed:
/// - Track calls for assertions
/// - Fail the next decode or encode with a chosen error
/// - Simulate slow tools
///
/// # Example
///
/// ```rust,ignore
/// use pedal_core::testing::MockTranscoder;
///
/// let transcoder = MockTranscoder::new();
/// transcoder.set_encode_error(TranscodeError::Timeout { timeout_secs: 1 }).await;
///
/// // ... run the pipeline ...
///
/// let calls = transcoder.recorded_calls().await;
/// assert_eq!(calls.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockTranscoder {
    calls: Arc<RwLock<Vec<RecordedTranscode>>>,
    decode_error: Arc<RwLock<Option<TranscodeError>>>,
    encode_error: Arc<RwLock<Option<TranscodeError>>>,
    delay_ms: Arc<RwLock<u64>>,
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedTranscode> {
        self.calls.read().await.clone()
    }

    /// Fail the next decode with the given error.
    pub async fn set_decode_error(&self, error: TranscodeError) {
        *self.decode_error.write().await = Some(error);
    }

    /// Fail the next encode with the given error.
    pub async fn set_encode_error(&self, error: TranscodeError) {
        *self.encode_error.write().await = Some(error);
    }

    /// Set the simulated duration of each call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay_ms.write().await = delay.as_millis() as u64;
    }

    async fn run(
        &self,
        direction: TranscodeDirection,
        input: &Path,
        output: &Path,
        bitrate_kbps: Option<u32>,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let delay_ms = *self.delay_ms.read().await;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let pending = match direction {
            TranscodeDirection::ToRaw => self.decode_error.write().await.take(),
            TranscodeDirection::ToCompressed => self.encode_error.write().await.take(),
        };

        let mut record = RecordedTranscode {
            direction,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            bitrate_kbps,
            success: false,
        };

        if let Some(err) = pending {
            self.calls.write().await.push(record);
            return Err(err);
        }

        if !tokio::fs::try_exists(input).await? {
            self.calls.write().await.push(record);
            return Err(TranscodeError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let output_size_bytes = tokio::fs::copy(input, output).await?;
        record.success = true;
        self.calls.write().await.push(record);

        Ok(TranscodeOutcome {
            output_path: output.to_path_buf(),
            output_size_bytes,
            duration_ms: delay_ms,
        })
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn to_raw(
        &self,
        input: &Path,
        raw_output: &Path,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        self.run(TranscodeDirection::ToRaw, input, raw_output, None)
            .await
    }

    async fn to_compressed(
        &self,
        raw_input: &Path,
        output: &Path,
        bitrate_kbps: u32,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        self.run(
            TranscodeDirection::ToCompressed,
            raw_input,
            output,
            Some(bitrate_kbps),
        )
        .await
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        Ok(())
    }
}
