//! Trait definitions for the transcoder module.

use async_trait::async_trait;
use std::path::Path;

use super::error::TranscodeError;
use super::types::TranscodeOutcome;

/// Converts between uploaded audio and the raw PCM interchange format.
///
/// Both operations overwrite any existing file at the output path.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Decodes an audio file into raw PCM.
    async fn to_raw(&self, input: &Path, raw_output: &Path)
        -> Result<TranscodeOutcome, TranscodeError>;

    /// Encodes raw PCM into the compressed output format.
    async fn to_compressed(
        &self,
        raw_input: &Path,
        output: &Path,
        bitrate_kbps: u32,
    ) -> Result<TranscodeOutcome, TranscodeError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), TranscodeError>;
}
