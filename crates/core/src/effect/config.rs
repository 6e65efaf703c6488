//! Configuration for the effect module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::request::DEFAULT_EFFECT;

/// Configuration for the external effects processor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectConfig {
    /// Path to the effects processor binary.
    #[serde(default = "default_binary_path")]
    pub binary_path: PathBuf,

    /// Effect used when a request does not name one.
    #[serde(default = "default_effect")]
    pub default_effect: String,

    /// Timeout for a single run in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_binary_path() -> PathBuf {
    PathBuf::from("./convert")
}

fn default_effect() -> String {
    DEFAULT_EFFECT.to_string()
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
            default_effect: default_effect(),
            timeout_secs: default_timeout(),
        }
    }
}

impl EffectConfig {
    /// Creates a config with a custom binary path.
    pub fn with_path(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
