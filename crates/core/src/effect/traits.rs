//! Trait definitions for the effect module.

use async_trait::async_trait;
use std::path::Path;

use super::error::EffectError;
use super::invoker::EffectOutcome;
use crate::request::EffectRequest;

/// Applies an effect to a raw PCM file, producing another raw PCM file.
#[async_trait]
pub trait EffectProcessor: Send + Sync {
    /// Returns the name of this implementation.
    fn name(&self) -> &str;

    /// Streams `raw_input` through the effect into `raw_output`.
    async fn apply(
        &self,
        raw_input: &Path,
        raw_output: &Path,
        request: &EffectRequest,
    ) -> Result<EffectOutcome, EffectError>;

    /// Validates that the processor is installed.
    async fn validate(&self) -> Result<(), EffectError>;
}
