//! Trailer pipeline API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use trailarr_core::{
    CacheStats, MediaId, MediaStoreError, PipelineError, ProfileId, RunReport,
    SingleDownloadOutcome,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

/// Pipeline status response
#[derive(Debug, Serialize)]
pub struct PipelineStatusResponse {
    /// Whether a run is currently in progress
    pub running: bool,
    /// Whether the remote library is consulted before downloading
    pub dedup_enabled: bool,
    pub dedup: CacheStats,
    /// Most recent completed run, if any
    pub last_report: Option<RunReport>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct PipelineErrorResponse {
    pub error: String,
}

/// Simple message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<PipelineErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(PipelineErrorResponse {
            error: error.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Get pipeline status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<PipelineStatusResponse> {
    let pipeline = state.pipeline();
    Json(PipelineStatusResponse {
        running: pipeline.is_running(),
        dedup_enabled: pipeline.dedup().is_enabled(),
        dedup: pipeline.dedup().stats(),
        last_report: pipeline.last_report(),
    })
}

/// Trigger a run in the background
///
/// The run slot is claimed before responding, so of two overlapping
/// requests exactly one is accepted.
pub async fn trigger_run(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Some(permit) = state.pipeline().try_begin() else {
        return Err(api_error(
            StatusCode::CONFLICT,
            "A trailer download run is already in progress",
        ));
    };

    let pipeline = Arc::clone(state.pipeline());
    let cancel = state.shutdown().child_token();
    tokio::spawn(async move {
        match pipeline.run_with(permit, &cancel).await {
            Ok(outcome) => info!("Manual run finished: {}", outcome.as_str()),
            Err(e) => error!("Manual run failed: {}", e),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "Trailer download run started".to_string(),
        }),
    ))
}

/// Download a trailer for one media item with one profile
pub async fn download_one(
    State(state): State<Arc<AppState>>,
    Path((media_id, profile_id)): Path<(MediaId, ProfileId)>,
) -> Result<Json<SingleDownloadOutcome>, ApiError> {
    match state.pipeline().download_one(media_id, profile_id).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(PipelineError::MediaStore(MediaStoreError::NotFound(id))) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Media not found: {}", id),
        )),
        Err(e @ PipelineError::ProfileNotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, e.to_string()))
        }
        Err(e) => {
            error!("Single download failed: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Drop every cached remote library answer
pub async fn clear_dedup(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    let dedup = state.pipeline().dedup();
    let removed = dedup.len();
    dedup.clear();
    info!("Cleared {} dedup cache entries", removed);
    Json(MessageResponse {
        message: format!("Cleared {} entries", removed),
    })
}

