//! Pipeline module running an upload through decode, effect and encode.
//!
//! The `PipelineOrchestrator` coordinates:
//! - Validation of the upload's file type and the effect controls
//! - Session allocation and persistence of the original upload
//! - Decode to raw PCM, effect processing, encode to MP3
//! - Removal of raw intermediates, and of the whole session on failure
//!
//! Every run executes on its own tokio task, so a client that disconnects
//! mid-run does not leave intermediates behind. A semaphore bounds how many
//! runs spawn external tools at once.
//!
//! # Example
//!
//! ```ignore
//! use pedal_core::pipeline::{PipelineConfig, PipelineOrchestrator, UploadedFile};
//!
//! let orchestrator = PipelineOrchestrator::new(
//!     PipelineConfig::default(),
//!     Arc::new(ArtifactStore::new(StorageConfig::default())),
//!     Arc::new(FfmpegTranscoder::with_defaults()),
//!     Arc::new(ProcessEffectInvoker::with_defaults()),
//! );
//!
//! let upload = UploadedFile::new("riff.wav", bytes);
//! let request = EffectRequest::new("echo", Controls::default())?;
//! let session = orchestrator.process(upload, request).await?;
//! println!("Output at {}", session.output.path.display());
//! ```

mod config;
mod error;
mod orchestrator;
mod types;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineStage};
pub use orchestrator::PipelineOrchestrator;
pub use types::{PipelineStatus, ProcessedSession, UploadedFile};
