use std::sync::Arc;
use pedal_core::{
    ArtifactStore, Config, FfmpegTranscoder, PipelineOrchestrator, ProcessEffectInvoker,
    SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: PipelineOrchestrator,
}

impl AppState {
    pub fn new(config: Config, pipeline: PipelineOrchestrator) -> Self {
        Self { config, pipeline }
    }

    /// Wires the store, ffmpeg and the effects binary from configuration.
    pub fn from_config(config: Config) -> Self {
        let pipeline = PipelineOrchestrator::new(
            config.pipeline.clone(),
            Arc::new(ArtifactStore::new(config.storage.clone())),
            Arc::new(FfmpegTranscoder::new(config.transcoder.clone())),
            Arc::new(ProcessEffectInvoker::new(config.effect.clone())),
        );
        Self::new(config, pipeline)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &PipelineOrchestrator {
        &self.pipeline
    }
}
