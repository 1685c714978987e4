use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::media::MediaStoreError;
use crate::profile::{ProfileId, ProfileStoreError};

use super::batch::BatchReport;
use super::grouping::GroupingCounts;
use super::skip::SkipSummary;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Media store error: {0}")]
    MediaStore(#[from] MediaStoreError),

    #[error("Profile store error: {0}")]
    ProfileStore(#[from] ProfileStoreError),

    #[error("Profile not found: {0}")]
    ProfileNotFound(ProfileId),
}

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Monitoring is switched off in the configuration.
    MonitoringDisabled,
    /// No profiles are configured.
    NoProfiles,
    /// Profiles exist but all are disabled.
    NoEnabledProfiles,
    /// Another run was in progress.
    AlreadyRunning,
    Completed(RunReport),
}

impl RunOutcome {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::MonitoringDisabled => "monitoring_disabled",
            RunOutcome::NoProfiles => "no_profiles",
            RunOutcome::NoEnabledProfiles => "no_enabled_profiles",
            RunOutcome::AlreadyRunning => "already_running",
            RunOutcome::Completed(_) => "completed",
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub counts: GroupingCounts,
    pub skips: SkipSummary,
    pub downloads: BatchReport,
    /// The run was cancelled before every queued download started.
    pub cancelled: bool,
}

/// Result of a single-item download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SingleDownloadOutcome {
    /// The remote library already serves a trailer.
    AlreadyProvided,
    /// The item has no folder, or its folder is gone.
    FolderMissing,
    Downloaded,
    Failed(String),
}
