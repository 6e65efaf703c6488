//! Error types for the pipeline module.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::effect::EffectError;
use crate::request::RequestError;
use crate::transcoder::TranscodeError;

/// Stages of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Persisting the upload.
    Store,
    /// Upload to raw PCM.
    Decode,
    /// Raw PCM through the effects processor.
    Effect,
    /// Raw PCM to MP3.
    Encode,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Decode => "decode",
            Self::Effect => "effect",
            Self::Encode => "encode",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Upload or parameters rejected before any work was done.
    #[error(transparent)]
    Invalid(#[from] RequestError),

    /// FFmpeg failed while decoding or encoding.
    #[error("Transcoding failed during {stage} stage: {source}")]
    Transcode {
        stage: PipelineStage,
        #[source]
        source: TranscodeError,
    },

    /// The effects processor failed.
    #[error("Effect processing failed: {0}")]
    Effect(#[source] EffectError),

    /// Reading or writing artifacts failed.
    #[error("Artifact storage failed: {0}")]
    Storage(#[from] ArtifactError),

    /// The run's task ended without producing a result.
    #[error("Pipeline task aborted: {0}")]
    Aborted(String),

    /// Pipeline is not accepting work.
    #[error("Pipeline is not running")]
    NotRunning,
}

impl PipelineError {
    /// Stage at which processing failed, if it got that far.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Transcode { stage, .. } => Some(*stage),
            Self::Effect(_) => Some(PipelineStage::Effect),
            Self::Storage(_) => Some(PipelineStage::Store),
            _ => None,
        }
    }

    /// Whether the client caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Whether an external tool hit its time limit.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transcode { source, .. } => source.is_timeout(),
            Self::Effect(source) => source.is_timeout(),
            _ => false,
        }
    }

    /// Short failure category used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transcode { source, .. } => match source {
                TranscodeError::Timeout { .. } => "timeout",
                TranscodeError::FfmpegNotFound { .. } => "missing",
                TranscodeError::Io(_) | TranscodeError::OutputDirectoryFailed { .. } => "io",
                _ => "exit",
            },
            Self::Effect(source) => match source {
                EffectError::Timeout { .. } => "timeout",
                EffectError::BinaryNotFound { .. } => "missing",
                EffectError::Io(_) => "io",
                _ => "exit",
            },
            Self::Invalid(_) => "invalid",
            Self::Storage(_) => "io",
            Self::Aborted(_) | Self::NotRunning => "internal",
        }
    }

    /// One sentence suitable for clients: no paths, no tool output.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            Self::Transcode { stage, source } if source.is_timeout() => {
                format!("Processing error: audio {} timed out", stage_noun(*stage))
            }
            Self::Transcode { stage, .. } => {
                format!("Processing error: audio {} failed", stage_noun(*stage))
            }
            Self::Effect(e) if e.is_timeout() => {
                "Processing error: effect processing timed out".to_string()
            }
            Self::Effect(_) => "Processing error: effect processing failed".to_string(),
            Self::Storage(_) => "Server error: could not store audio files".to_string(),
            Self::Aborted(_) | Self::NotRunning => {
                "Server error: processing was interrupted".to_string()
            }
        }
    }
}

fn stage_noun(stage: PipelineStage) -> &'static str {
    match stage {
        PipelineStage::Decode => "decoding",
        PipelineStage::Encode => "encoding",
        PipelineStage::Effect => "effect processing",
        PipelineStage::Store => "storage",
    }
}
