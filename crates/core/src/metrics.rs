//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Pipeline runs (outcomes, duration, skips)
//! - Trailer downloads
//! - Dedup cache and the remote library

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Pipeline runs by outcome.
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trailarr_runs_total", "Total pipeline runs"),
        // "completed", "monitoring_disabled", "no_profiles",
        // "no_enabled_profiles", "already_running", "failed"
        &["outcome"],
    )
    .unwrap()
});

/// Duration of a completed pipeline run in seconds.
pub static RUN_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "trailarr_run_duration_seconds",
            "Duration of a full pipeline run",
        )
        .buckets(vec![1.0, 5.0, 30.0, 60.0, 300.0, 900.0, 1800.0, 3600.0]),
    )
    .unwrap()
});

/// Media items skipped by reason.
pub static MEDIA_SKIPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trailarr_media_skipped_total", "Media items skipped"),
        &["reason"],
    )
    .unwrap()
});

// =============================================================================
// Download Metrics
// =============================================================================

/// Trailer downloads by result.
pub static DOWNLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trailarr_downloads_total", "Total trailer downloads"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Trailer download duration in seconds.
pub static DOWNLOAD_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "trailarr_download_duration_seconds",
            "Duration of a single trailer download",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 900.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Dedup / Remote Library Metrics
// =============================================================================

/// Dedup lookups by result.
pub static DEDUP_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trailarr_dedup_lookups_total", "Dedup cache lookups"),
        &["result"], // "hit", "has_trailer", "no_trailer", "error"
    )
    .unwrap()
});

/// Remote library request errors by operation.
pub static REMOTE_LIBRARY_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trailarr_remote_library_errors_total",
            "Remote library request errors",
        ),
        &["operation"], // "lookup", "extras"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Pipeline
        Box::new(RUNS_TOTAL.clone()),
        Box::new(RUN_DURATION.clone()),
        Box::new(MEDIA_SKIPPED.clone()),
        // Downloads
        Box::new(DOWNLOADS_TOTAL.clone()),
        Box::new(DOWNLOAD_DURATION.clone()),
        // Dedup
        Box::new(DEDUP_LOOKUPS.clone()),
        Box::new(REMOTE_LIBRARY_ERRORS.clone()),
    ]
}
