//! Transcoder module bridging arbitrary audio files and raw PCM.
//!
//! The effect processor only ever sees one sample layout: signed 32-bit
//! little-endian, 48 kHz, mono. This module converts uploads into that layout
//! and converts processed PCM back into a compressed file, using FFmpeg.
//!
//! # Example
//!
//! ```ignore
//! use pedal_core::transcoder::{FfmpegTranscoder, Transcoder, TranscoderConfig};
//!
//! let transcoder = FfmpegTranscoder::new(TranscoderConfig::default());
//! transcoder.validate().await?;
//!
//! transcoder.to_raw(Path::new("take.wav"), Path::new("take.raw")).await?;
//! transcoder.to_compressed(Path::new("wet.raw"), Path::new("wet.mp3"), 320).await?;
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::TranscoderConfig;
pub use error::TranscodeError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{RawPcmFormat, TranscodeOutcome, RAW_PCM};
