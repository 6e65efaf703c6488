//! Filesystem-backed holding area for session artifacts.
//!
//! Artifacts are plain files named `{token}_{role}.{extension}`. Uploaded
//! originals live in the upload directory and finished outputs in the output
//! directory. Raw PCM intermediates are placed next to them while a pipeline
//! run is in progress and removed before the run returns.
//!
//! # Example
//!
//! ```ignore
//! use pedal_core::artifact::{ArtifactRole, ArtifactStore, StorageConfig};
//!
//! let store = ArtifactStore::new(StorageConfig::default());
//! store.ensure_dirs().await?;
//!
//! let token = SessionToken::generate();
//! store.save(&token, ArtifactRole::Input, AudioFormat::Wav, &bytes).await?;
//!
//! let original = store.locate(&token, ArtifactRole::Input).await?;
//! store.delete(&token).await?;
//! ```

mod config;
mod error;
mod store;
mod types;

pub use config::StorageConfig;
pub use error::ArtifactError;
pub use store::{ArtifactStore, OUTPUT_FORMAT};
pub use types::{Artifact, ArtifactRole, RAW_EXTENSION};
