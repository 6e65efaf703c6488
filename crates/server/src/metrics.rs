//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Pedal server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Pipeline status (collected on scrape)
//! - Core pipeline and external tool metrics

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pedal_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pedal_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pedal_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Pipeline Metrics (collected dynamically)
// =============================================================================

/// Runs currently executing tools.
pub static PIPELINE_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("pedal_pipeline_active", "Number of runs executing tools").unwrap()
});

/// Runs waiting for a slot.
pub static PIPELINE_QUEUED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("pedal_pipeline_queued", "Number of runs waiting for a slot").unwrap()
});

/// Configured concurrency limit.
pub static PIPELINE_MAX_CONCURRENT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pedal_pipeline_max_concurrent",
        "Maximum runs executing tools at once",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Pipeline
    registry
        .register(Box::new(PIPELINE_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(PIPELINE_QUEUED.clone()))
        .unwrap();
    registry
        .register(Box::new(PIPELINE_MAX_CONCURRENT.clone()))
        .unwrap();

    // Core metrics (pipeline runs, stages, external tools)
    for metric in pedal_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the pipeline at scrape time.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let status = state.pipeline().status();
    PIPELINE_ACTIVE.set(status.active_runs as i64);
    PIPELINE_QUEUED.set(status.queued_runs as i64);
    PIPELINE_MAX_CONCURRENT.set(status.max_concurrent as i64);
}

/// Normalize a path for metric labels (replace session ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    static UUID: Lazy<regex_lite::Regex> = Lazy::new(|| {
        regex_lite::Regex::new(
            r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        )
        .unwrap()
    });

    // Static assets and unknown paths collapse into one label
    let known = [
        "/upload", "/download/", "/play/", "/cleanup/", "/presets", "/health", "/status",
        "/config", "/metrics",
    ];
    if !known.iter().any(|prefix| path.starts_with(prefix)) {
        return "/{static}".to_string();
    }

    UUID.replace_all(path, "{id}").to_string()
}
