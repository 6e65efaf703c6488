//! Pipeline lifecycle integration tests.
//!
//! These tests run the orchestrator against the real ffmpeg and effects
//! invokers, with both tools replaced by shell scripts:
//! - Artifact layout after success and failure
//! - Argument plumbing into the effects processor
//! - Tool timeouts surfacing as pipeline errors
//! - Output overwrite on re-encode

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use pedal_core::{
    ArtifactRole, ArtifactStore, Controls, EffectConfig, EffectRequest, FfmpegTranscoder,
    PipelineConfig, PipelineOrchestrator, PipelineStage, ProcessEffectInvoker, StorageConfig,
    Transcoder, TranscoderConfig, UploadedFile,
};

const FAKE_FFMPEG: &str = r#"
prev=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then input="$arg"; fi
  prev="$arg"
  output="$arg"
done
cat "$input" > "$output"
"#;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Test helper wiring the orchestrator to scripted tools.
struct TestHarness {
    pipeline: PipelineOrchestrator,
    transcoder: Arc<FfmpegTranscoder>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new(effect_body: &str) -> Self {
        Self::with_effect_timeout(effect_body, 10)
    }

    fn with_effect_timeout(effect_body: &str, timeout_secs: u64) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let ffmpeg = script(temp_dir.path(), "ffmpeg", FAKE_FFMPEG);
        let effect = script(temp_dir.path(), "convert", effect_body);

        let transcoder = Arc::new(FfmpegTranscoder::new(
            TranscoderConfig::with_path(ffmpeg).with_timeout(10),
        ));
        let effects = Arc::new(ProcessEffectInvoker::new(
            EffectConfig::with_path(effect).with_timeout(timeout_secs),
        ));
        let store = Arc::new(ArtifactStore::new(StorageConfig::under(temp_dir.path())));

        let pipeline = PipelineOrchestrator::new(
            PipelineConfig::default(),
            store,
            transcoder.clone(),
            effects,
        );

        Self {
            pipeline,
            transcoder,
            _temp_dir: temp_dir,
        }
    }

    fn dir_entries(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[tokio::test]
async fn test_success_layout_and_arguments() {
    let harness = TestHarness::new("printf '%s|' \"$@\"\ncat");
    let request = EffectRequest::new("echo", Controls::new(0.25, 0.0, 0.1, 0.6)).unwrap();

    let session = harness
        .pipeline
        .process(UploadedFile::new("take.wav", b"samples".to_vec()), request)
        .await
        .unwrap();

    let store = harness.pipeline.store();
    let token = session.token;
    assert_eq!(
        harness.dir_entries(&store.config().upload_dir),
        vec![format!("{}_input.wav", token)]
    );
    assert_eq!(
        harness.dir_entries(&store.config().output_dir),
        vec![format!("{}_output.mp3", token)]
    );

    let output = std::fs::read(&session.output.path).unwrap();
    assert_eq!(output, b"echo|0.25|0.0|0.1|0.6|samples");
    assert_eq!(session.output.size_bytes, output.len() as u64);
}

#[tokio::test]
async fn test_effect_failure_leaves_nothing() {
    let harness = TestHarness::new("cat > /dev/null\necho 'bad effect' >&2\nexit 3");

    let err = harness
        .pipeline
        .process(
            UploadedFile::new("take.mp3", b"frames".to_vec()),
            EffectRequest::new("nope", Controls::default()).unwrap(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(PipelineStage::Effect));
    assert!(!err.user_message().contains('/'));

    let store = harness.pipeline.store();
    assert!(harness.dir_entries(&store.config().upload_dir).is_empty());
    assert!(harness.dir_entries(&store.config().output_dir).is_empty());
}

#[tokio::test]
async fn test_effect_timeout_is_reported() {
    let harness = TestHarness::with_effect_timeout("sleep 30", 1);

    let err = harness
        .pipeline
        .process(
            UploadedFile::new("take.ogg", b"frames".to_vec()),
            EffectRequest::new("echo", Controls::default()).unwrap(),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(
        err.user_message(),
        "Processing error: effect processing timed out"
    );
}

#[tokio::test]
async fn test_reencode_overwrites_output() {
    let harness = TestHarness::new("cat");
    let session = harness
        .pipeline
        .process(
            UploadedFile::new("take.wav", b"first".to_vec()),
            EffectRequest::new("echo", Controls::default()).unwrap(),
        )
        .await
        .unwrap();

    let store = harness.pipeline.store();
    let raw = store.raw_path(&session.token, ArtifactRole::Output);
    std::fs::write(&raw, b"second pass").unwrap();
    harness
        .transcoder
        .to_compressed(&raw, &session.output.path, 192)
        .await
        .unwrap();

    let output = store
        .locate(&session.token, ArtifactRole::Output)
        .await
        .unwrap();
    assert_eq!(std::fs::read(&output.path).unwrap(), b"second pass");
    assert_eq!(output.path, session.output.path);
}
