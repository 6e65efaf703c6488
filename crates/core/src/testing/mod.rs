//! Testing utilities and mock implementations.
//!
//! The mocks stand in for ffmpeg and the effects binary so the pipeline and the
//! HTTP layer can be exercised without either installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use pedal_core::testing::{MockEffectProcessor, MockTranscoder};
//!
//! let transcoder = Arc::new(MockTranscoder::new());
//! let effects = Arc::new(MockEffectProcessor::new());
//! effects.set_next_error(EffectError::failed("exit 1", None)).await;
//!
//! let pipeline = PipelineOrchestrator::new(config, store, transcoder, effects);
//! ```

mod mock_effect;
mod mock_transcoder;

pub use mock_effect::MockEffectProcessor;
pub use mock_transcoder::{MockTranscoder, RecordedTranscode, TranscodeDirection};
