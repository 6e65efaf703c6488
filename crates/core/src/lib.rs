pub mod artifact;
pub mod config;
pub mod effect;
pub mod metrics;
pub mod pipeline;
pub mod preset;
pub mod request;
pub mod session;
pub mod supervise;
pub mod testing;
pub mod transcoder;

pub use artifact::{Artifact, ArtifactError, ArtifactRole, ArtifactStore, StorageConfig};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use effect::{EffectConfig, EffectError, EffectProcessor, ProcessEffectInvoker};
pub use pipeline::{
    PipelineConfig, PipelineError, PipelineOrchestrator, PipelineStage, PipelineStatus,
    ProcessedSession, UploadedFile,
};
pub use preset::{Preset, PresetCatalog};
pub use request::{AudioFormat, Controls, EffectForm, EffectRequest, RequestError};
pub use session::{InvalidToken, SessionToken};
pub use transcoder::{FfmpegTranscoder, TranscodeError, Transcoder, TranscoderConfig};
