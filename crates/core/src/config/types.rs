use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::artifact::StorageConfig;
use crate::effect::EffectConfig;
use crate::pipeline::PipelineConfig;
use crate::transcoder::TranscoderConfig;

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    #[serde(default)]
    pub effect: EffectConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Frontend directory served for paths no route matches.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            static_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}

/// Sanitized config for API responses (filesystem layout hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: SanitizedServerConfig,
    pub transcoder: SanitizedToolConfig,
    pub effect: SanitizedEffectConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
    pub static_frontend: bool,
}

/// External tool reduced to its program name.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedToolConfig {
    pub program: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedEffectConfig {
    pub program: String,
    pub default_effect: String,
    pub timeout_secs: u64,
}

fn program_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: SanitizedServerConfig {
                port: config.server.port,
                max_upload_bytes: config.server.max_upload_bytes,
                static_frontend: config.server.static_dir.is_some(),
            },
            transcoder: SanitizedToolConfig {
                program: program_name(&config.transcoder.ffmpeg_path),
                timeout_secs: config.transcoder.timeout_secs,
            },
            effect: SanitizedEffectConfig {
                program: program_name(&config.effect.binary_path),
                default_effect: config.effect.default_effect.clone(),
                timeout_secs: config.effect.timeout_secs,
            },
            pipeline: config.pipeline.clone(),
        }
    }
}
