//! Pipeline orchestrator implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::Instrument;

use super::config::PipelineConfig;
use super::error::{PipelineError, PipelineStage};
use super::types::{PipelineStatus, ProcessedSession, UploadedFile};
use crate::artifact::{ArtifactRole, ArtifactStore};
use crate::effect::EffectProcessor;
use crate::metrics;
use crate::request::{AudioFormat, EffectRequest};
use crate::session::SessionToken;
use crate::transcoder::Transcoder;

/// Run counters.
#[derive(Default)]
struct RunStats {
    active: AtomicU64,
    queued: AtomicU64,
    total_processed: AtomicU64,
    total_failed: AtomicU64,
}

/// Holds a run in the active count until dropped, including on panic.
struct ActiveRun(Arc<RunStats>);

impl ActiveRun {
    fn start(stats: &Arc<RunStats>) -> Self {
        stats.active.fetch_add(1, Ordering::Relaxed);
        Self(Arc::clone(stats))
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::Relaxed);
    }
}

impl RunStats {
    fn to_status(&self, max_concurrent: usize) -> PipelineStatus {
        PipelineStatus {
            active_runs: self.active.load(Ordering::Relaxed) as usize,
            queued_runs: self.queued.load(Ordering::Relaxed) as usize,
            max_concurrent,
            total_processed: self.total_processed.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
        }
    }
}

/// Drives uploads through store, decode, effect and encode.
///
/// Cheap to clone; clones share the store, tools, semaphore and counters.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    store: Arc<ArtifactStore>,
    transcoder: Arc<dyn Transcoder>,
    effects: Arc<dyn EffectProcessor>,
    semaphore: Arc<Semaphore>,
    stats: Arc<RunStats>,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator over the given store and tools.
    pub fn new(
        config: PipelineConfig,
        store: Arc<ArtifactStore>,
        transcoder: Arc<dyn Transcoder>,
        effects: Arc<dyn EffectProcessor>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_runs.max(1)));
        Self {
            config,
            store,
            transcoder,
            effects,
            semaphore,
            stats: Arc::new(RunStats::default()),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The artifact store runs write into.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn transcoder(&self) -> &dyn Transcoder {
        self.transcoder.as_ref()
    }

    pub fn effects(&self) -> &dyn EffectProcessor {
        self.effects.as_ref()
    }

    /// Returns current activity counters.
    pub fn status(&self) -> PipelineStatus {
        self.stats.to_status(self.config.max_concurrent_runs.max(1))
    }

    /// Stops accepting new runs. Runs already holding a permit finish normally.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Processes one upload end to end.
    ///
    /// Validation failures are returned before a session exists. Once a
    /// session is allocated the run continues on its own task, so dropping the
    /// returned future does not interrupt cleanup.
    pub async fn process(
        &self,
        upload: UploadedFile,
        request: EffectRequest,
    ) -> Result<ProcessedSession, PipelineError> {
        let format = match AudioFormat::from_file_name(&upload.file_name)
            .and_then(|format| request.validate().map(|_| format))
        {
            Ok(format) => format,
            Err(e) => {
                tracing::info!(file_name = %upload.file_name, error = %e, "Rejected upload");
                metrics::PIPELINE_RUNS.with_label_values(&["rejected"]).inc();
                return Err(e.into());
            }
        };

        let token = SessionToken::generate();
        let run = self.clone();
        match tokio::spawn(async move { run.run(token, upload.data, format, request).await }).await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(session = %token, error = %e, "Pipeline run aborted");
                self.remove_raw_files(&token).await;
                if let Err(cleanup) = self.store.delete(&token).await {
                    tracing::warn!(session = %token, error = %cleanup, "Failed to remove session after abort");
                }
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                metrics::PIPELINE_RUNS.with_label_values(&["failed"]).inc();
                Err(PipelineError::Aborted(e.to_string()))
            }
        }
    }

    /// Deletes every file belonging to a session.
    pub async fn cleanup(&self, token: &SessionToken) -> Result<usize, PipelineError> {
        Ok(self.store.delete(token).await?)
    }

    async fn run(
        self,
        token: SessionToken,
        data: Vec<u8>,
        format: AudioFormat,
        request: EffectRequest,
    ) -> Result<ProcessedSession, PipelineError> {
        let start = Instant::now();

        self.stats.queued.fetch_add(1, Ordering::Relaxed);
        let permit = Arc::clone(&self.semaphore).acquire_owned().await;
        self.stats.queued.fetch_sub(1, Ordering::Relaxed);
        let _permit = match permit {
            Ok(permit) => permit,
            Err(_) => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                metrics::PIPELINE_RUNS.with_label_values(&["failed"]).inc();
                return Err(PipelineError::NotRunning);
            }
        };
        let active = ActiveRun::start(&self.stats);

        let span = tracing::info_span!("pipeline", session = %token);

        let result = async {
            tracing::info!(
                effect = %request.effect,
                format = %format.extension(),
                bytes = data.len(),
                transcoder = self.transcoder.name(),
                effects = self.effects.name(),
                "Processing started"
            );

            let result = self.execute(&token, &data, format, &request).await;
            self.remove_raw_files(&token).await;

            match &result {
                Ok(session) => {
                    tracing::info!(
                        duration_ms = session.duration_ms,
                        output_bytes = session.output.size_bytes,
                        "Processing complete"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        stage = e.stage().map(|s| s.as_str()).unwrap_or("unknown"),
                        error = %e,
                        details = ?e,
                        "Processing failed"
                    );
                    if let Err(cleanup) = self.store.delete(&token).await {
                        tracing::warn!(error = %cleanup, "Failed to remove session after failure");
                    }
                }
            }
            result
        }
        .instrument(span)
        .await;

        drop(active);
        let label = if result.is_ok() {
            self.stats.total_processed.fetch_add(1, Ordering::Relaxed);
            "success"
        } else {
            self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
            "failed"
        };
        metrics::PIPELINE_RUNS.with_label_values(&[label]).inc();
        metrics::PIPELINE_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn execute(
        &self,
        token: &SessionToken,
        data: &[u8],
        format: AudioFormat,
        request: &EffectRequest,
    ) -> Result<ProcessedSession, PipelineError> {
        let start = Instant::now();
        let raw_input = self.store.raw_path(token, ArtifactRole::Input);
        let raw_output = self.store.raw_path(token, ArtifactRole::Output);
        let output_path = self.store.output_path(token);

        let stage_start = Instant::now();
        self.store.ensure_dirs().await?;
        let original = self
            .store
            .save(token, ArtifactRole::Input, format, data)
            .await?;
        observe_stage(PipelineStage::Store, stage_start);

        let stage_start = Instant::now();
        self.transcoder
            .to_raw(&original.path, &raw_input)
            .await
            .map_err(|source| tool_failure(PipelineError::Transcode {
                stage: PipelineStage::Decode,
                source,
            }))?;
        observe_stage(PipelineStage::Decode, stage_start);

        let stage_start = Instant::now();
        let outcome = self
            .effects
            .apply(&raw_input, &raw_output, request)
            .await
            .map_err(|e| tool_failure(PipelineError::Effect(e)))?;
        if let Some(diagnostics) = &outcome.diagnostics {
            tracing::debug!(diagnostics = %diagnostics, "Effects processor output");
        }
        observe_stage(PipelineStage::Effect, stage_start);

        let stage_start = Instant::now();
        self.transcoder
            .to_compressed(&raw_output, &output_path, self.config.output_bitrate_kbps)
            .await
            .map_err(|source| tool_failure(PipelineError::Transcode {
                stage: PipelineStage::Encode,
                source,
            }))?;
        observe_stage(PipelineStage::Encode, stage_start);

        let output = self.store.locate(token, ArtifactRole::Output).await?;

        Ok(ProcessedSession {
            token: *token,
            original,
            output,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn remove_raw_files(&self, token: &SessionToken) {
        for role in [ArtifactRole::Input, ArtifactRole::Output] {
            let path = self.store.raw_path(token, role);
            if let Err(e) = self.store.remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove raw file");
            }
        }
    }
}

fn observe_stage(stage: PipelineStage, start: Instant) {
    metrics::STAGE_DURATION
        .with_label_values(&[stage.as_str()])
        .observe(start.elapsed().as_secs_f64());
}

fn tool_failure(err: PipelineError) -> PipelineError {
    if let Some(stage) = err.stage() {
        metrics::TOOL_FAILURES
            .with_label_values(&[stage.as_str(), err.kind()])
            .inc();
    }
    err
}
