//! Common test utilities for end-to-end testing.
//!
//! This module provides a test fixture that builds the router in-process with
//! the real ffmpeg and effects invokers pointed at small shell scripts, so the
//! whole upload path runs without either tool installed.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use pedal_core::{Config, StorageConfig};
use pedal_server::{create_router, AppState};

/// Copies the file after `-i` to the last argument; answers `-version`.
pub const FAKE_FFMPEG: &str = r#"
if [ "$1" = "-version" ]; then
  echo "ffmpeg version 0.0-fake"
  exit 0
fi
prev=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then input="$arg"; fi
  prev="$arg"
  output="$arg"
done
cat "$input" > "$output"
"#;

/// Writes its arguments joined by `|`, then passes samples through.
pub const FAKE_EFFECT: &str = r#"
printf '%s|' "$@"
cat
"#;

/// Effects binary that always fails.
pub const FAILING_EFFECT: &str = r#"
echo "effect blew up" >&2
exit 1
"#;

/// Writes an executable shell script.
pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, format!("#!/bin/sh\n{}", body)).expect("Failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod script");
}

/// Test fixture with an in-process router and fake external tools.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_upload() {
///     let fixture = TestFixture::new();
///     let response = fixture.upload(MultipartForm::new().file("a.wav", b"RIFF")).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub state: Arc<AppState>,
    /// Temporary directory holding tools and storage
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with working fake tools.
    pub fn new() -> Self {
        Self::with_effect_script(FAKE_EFFECT)
    }

    /// Create a fixture whose effects binary runs the given script.
    pub fn with_effect_script(effect_script: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = test_config(temp_dir.path(), effect_script);
        Self::with_config(temp_dir, config)
    }

    /// Create a fixture from a prepared config.
    pub fn with_config(temp_dir: TempDir, config: Config) -> Self {
        let state = Arc::new(AppState::from_config(config));
        let router = create_router(Arc::clone(&state));
        Self {
            router,
            state,
            temp_dir,
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.state.config().storage.upload_dir.clone()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.state.config().storage.output_dir.clone()
    }

    /// File names currently stored in both storage directories.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names = Vec::new();
        for dir in [self.upload_dir(), self.output_dir()] {
            if let Ok(entries) = std::fs::read_dir(dir) {
                for entry in entries.flatten() {
                    names.push(entry.file_name().to_string_lossy().to_string());
                }
            }
        }
        names.sort();
        names
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Send an empty POST request.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.send(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a multipart form to /upload.
    pub async fn upload(&self, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.finish();
        let request = Request::post("/upload")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

/// Config with storage under `root` and fake tools written into it.
pub fn test_config(root: &Path, effect_script: &str) -> Config {
    let ffmpeg = root.join("ffmpeg");
    let effect = root.join("convert");
    write_script(&ffmpeg, FAKE_FFMPEG);
    write_script(&effect, effect_script);

    let mut config = Config::default();
    config.server.host = std::net::IpAddr::from([127, 0, 0, 1]);
    config.storage = StorageConfig::under(root);
    config.transcoder.ffmpeg_path = ffmpeg;
    config.transcoder.timeout_secs = 10;
    config.effect.binary_path = effect;
    config.effect.timeout_secs = 10;
    config
}

/// Hand-built multipart/form-data body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "pedal-test-boundary-7MA4YWxkTrZu0gW".to_string(),
            body: Vec::new(),
        }
    }

    /// Add a text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    /// Add the `file` field.
    pub fn file(mut self, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the content type header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
