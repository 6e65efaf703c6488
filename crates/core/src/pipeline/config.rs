//! Configuration for the pipeline module.

use serde::{Deserialize, Serialize};

/// Configuration for the processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Maximum runs executing external tools at the same time.
    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: usize,

    /// Bitrate of the final MP3 in kbps.
    #[serde(default = "default_output_bitrate")]
    pub output_bitrate_kbps: u32,
}

fn default_max_concurrent_runs() -> usize {
    8
}

fn default_output_bitrate() -> u32 {
    320
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: default_max_concurrent_runs(),
            output_bitrate_kbps: default_output_bitrate(),
        }
    }
}

impl PipelineConfig {
    /// Sets the maximum concurrent runs.
    pub fn with_max_concurrent_runs(mut self, max: usize) -> Self {
        self.max_concurrent_runs = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_concurrent_runs, 8);
        assert_eq!(config.output_bitrate_kbps, 320);
    }

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::default().with_max_concurrent_runs(2);
        assert_eq!(config.max_concurrent_runs, 2);
    }
}
