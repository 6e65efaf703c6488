//! Mock effects processor for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::effect::{EffectError, EffectOutcome, EffectProcessor};
use crate::request::EffectRequest;

/// Mock implementation of the EffectProcessor trait.
///
/// Passes samples through unchanged. Records each request and the highest
/// number of calls seen in flight at once.
#[derive(Debug, Default)]
pub struct MockEffectProcessor {
    requests: Arc<RwLock<Vec<EffectRequest>>>,
    next_error: Arc<RwLock<Option<EffectError>>>,
    write_partial_output: Arc<RwLock<bool>>,
    delay_ms: Arc<RwLock<u64>>,
    panic_on_apply: Arc<RwLock<bool>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockEffectProcessor {
    /// Create a new mock effects processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<EffectRequest> {
        self.requests.read().await.clone()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: EffectError) {
        *self.next_error.write().await = Some(error);
    }

    /// Write a truncated output file before failing.
    pub async fn set_write_partial_output(&self, enabled: bool) {
        *self.write_partial_output.write().await = enabled;
    }

    /// Set the simulated processing time.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Panic inside `apply`, as a crashing implementation would.
    pub async fn set_panic_on_apply(&self, enabled: bool) {
        *self.panic_on_apply.write().await = enabled;
    }

    /// Highest number of concurrent calls observed.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn process(
        &self,
        raw_input: &Path,
        raw_output: &Path,
    ) -> Result<EffectOutcome, EffectError> {
        let delay_ms = *self.delay_ms.read().await;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            if *self.write_partial_output.read().await {
                tokio::fs::write(raw_output, b"partial").await?;
            }
            return Err(err);
        }

        let data = tokio::fs::read(raw_input).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EffectError::InputNotFound {
                    path: raw_input.to_path_buf(),
                }
            } else {
                EffectError::Io(e)
            }
        })?;
        tokio::fs::write(raw_output, &data).await?;

        Ok(EffectOutcome {
            output_path: raw_output.to_path_buf(),
            output_size_bytes: data.len() as u64,
            duration_ms: delay_ms,
            diagnostics: None,
        })
    }
}

#[async_trait]
impl EffectProcessor for MockEffectProcessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn apply(
        &self,
        raw_input: &Path,
        raw_output: &Path,
        request: &EffectRequest,
    ) -> Result<EffectOutcome, EffectError> {
        self.requests.write().await.push(request.clone());
        if *self.panic_on_apply.read().await {
            panic!("mock effects processor crashed");
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let result = self.process(raw_input, raw_output).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        result
    }

    async fn validate(&self) -> Result<(), EffectError> {
        Ok(())
    }
}
