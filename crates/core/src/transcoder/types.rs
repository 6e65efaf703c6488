//! Types for the transcoder module.

use serde::Serialize;
use std::path::PathBuf;

/// Layout of the raw PCM interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawPcmFormat {
    /// FFmpeg sample format name.
    pub sample_format: &'static str,
    pub sample_rate_hz: u32,
    pub channels: u8,
}

/// Signed 32-bit little-endian, 48 kHz, mono.
pub const RAW_PCM: RawPcmFormat = RawPcmFormat {
    sample_format: "s32le",
    sample_rate_hz: 48_000,
    channels: 1,
};

impl RawPcmFormat {
    /// FFmpeg arguments describing this layout.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.sample_format.to_string(),
            "-ar".to_string(),
            self.sample_rate_hz.to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
        ]
    }
}

/// Result of a successful transcode.
#[derive(Debug, Clone, Serialize)]
pub struct TranscodeOutcome {
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}
