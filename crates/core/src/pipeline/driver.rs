//! Pipeline entry point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::MonitorConfig;
use crate::dedup::TrailerDedupCache;
use crate::fetcher::TrailerFetcher;
use crate::gate::{FilesystemProbe, ValidityGate};
use crate::media::{MediaId, MediaStore};
use crate::metrics;
use crate::profile::{ProfileId, ProfileMatcher, ProfileStore};

use super::batch::{fetch_timed, BatchOrchestrator};
use super::grouping::GroupingPass;
use super::types::{PipelineError, RunOutcome, RunReport, SingleDownloadOutcome};

/// Exclusive right to run the pipeline. Clears the running flag on drop,
/// however the run ends.
///
/// Obtained from [`TrailerPipeline::try_begin`]; owning it lets a caller
/// claim the run synchronously and hand it to a spawned task.
#[derive(Debug)]
pub struct RunPermit(Arc<AtomicBool>);

impl RunPermit {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Reconciles the media library against the download profiles.
///
/// At most one run is active at a time; a concurrent call returns
/// [`RunOutcome::AlreadyRunning`] without doing any work.
pub struct TrailerPipeline {
    config: MonitorConfig,
    media_store: Arc<dyn MediaStore>,
    profile_store: Arc<dyn ProfileStore>,
    dedup: Arc<TrailerDedupCache>,
    gate: ValidityGate,
    fetcher: Arc<dyn TrailerFetcher>,

    running: Arc<AtomicBool>,
    last_report: RwLock<Option<RunReport>>,
}

impl TrailerPipeline {
    pub fn new(
        config: MonitorConfig,
        media_store: Arc<dyn MediaStore>,
        profile_store: Arc<dyn ProfileStore>,
        dedup: Arc<TrailerDedupCache>,
        probe: Arc<dyn FilesystemProbe>,
        fetcher: Arc<dyn TrailerFetcher>,
    ) -> Self {
        let gate = ValidityGate::new(probe, config.wait_for_media);
        Self {
            config,
            media_store,
            profile_store,
            dedup,
            gate,
            fetcher,
            running: Arc::new(AtomicBool::new(false)),
            last_report: RwLock::new(None),
        }
    }

    /// Download trailers for every monitored item that is missing one.
    ///
    /// Store failures abort the run. Everything else (remote lookups,
    /// ineligible items, failed downloads) is absorbed and reported.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunOutcome, PipelineError> {
        if !self.config.enabled {
            warn!("Monitoring is disabled, skipping trailers download");
            return Ok(record_outcome(RunOutcome::MonitoringDisabled));
        }

        let Some(permit) = self.try_begin() else {
            warn!("Trailer download run already in progress, skipping");
            return Ok(record_outcome(RunOutcome::AlreadyRunning));
        };

        self.run_with(permit, cancel).await
    }

    /// Claim the single run slot without starting a run.
    ///
    /// Returns `None` while another run holds it.
    pub fn try_begin(&self) -> Option<RunPermit> {
        RunPermit::acquire(&self.running)
    }

    /// Run with a slot already claimed through [`Self::try_begin`].
    ///
    /// The slot is released when this returns.
    pub async fn run_with(
        &self,
        _permit: RunPermit,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, PipelineError> {
        if !self.config.enabled {
            warn!("Monitoring is disabled, skipping trailers download");
            return Ok(record_outcome(RunOutcome::MonitoringDisabled));
        }

        match self.run_inner(cancel).await {
            Ok(outcome) => {
                if let RunOutcome::Completed(report) = &outcome {
                    *self.last_report.write() = Some(report.clone());
                }
                Ok(record_outcome(outcome))
            }
            Err(e) => {
                error!("Trailer download run failed: {}", e);
                metrics::RUNS_TOTAL.with_label_values(&["failed"]).inc();
                Err(e)
            }
        }
    }

    async fn run_inner(&self, cancel: &CancellationToken) -> Result<RunOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let timer = Instant::now();

        let media = self.media_store.read_all()?;
        let profiles = self.profile_store.list_profiles()?;

        if profiles.is_empty() {
            warn!("No trailer profiles found, skipping trailers download");
            return Ok(RunOutcome::NoProfiles);
        }

        let (enabled, disabled): (Vec<_>, Vec<_>) = profiles.into_iter().partition(|p| p.enabled);
        for profile in &disabled {
            debug!("Skipping disabled trailer profile: {}", profile.name);
        }
        if enabled.is_empty() {
            warn!("No enabled trailer profiles found, skipping trailers download");
            return Ok(RunOutcome::NoEnabledProfiles);
        }

        info!(
            "Run {}: checking {} media items against {} profiles",
            run_id,
            media.len(),
            enabled.len()
        );

        let matcher = ProfileMatcher::new(enabled);
        let grouping = GroupingPass::new(&self.dedup, &matcher, &self.gate)
            .run(media, cancel)
            .await;

        let counts = grouping.counts();
        let interrupted = grouping.interrupted;
        let skips = grouping
            .ledger
            .summarize(counts.scanned, grouping.download_count);
        skips.log();
        if grouping.already_provided > 0 {
            debug!(
                "Skipped {} titles - trailer already provided by Plex",
                grouping.already_provided
            );
        }

        let orchestrator = BatchOrchestrator::new(
            Arc::clone(&self.fetcher),
            self.config.max_concurrent_downloads,
        );
        let downloads = orchestrator
            .run(grouping.groups, grouping.download_count, cancel)
            .await;

        // A cancel after the last dispatch leaves nothing unstarted but still counts.
        let cancelled = interrupted || cancel.is_cancelled() || downloads.not_started > 0;
        if cancelled {
            warn!(
                "Run {} cancelled, {} downloads not started",
                run_id, downloads.not_started
            );
        }
        info!("Finished downloading missing trailers.");
        metrics::RUN_DURATION.observe(timer.elapsed().as_secs_f64());

        Ok(RunOutcome::Completed(RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            counts,
            skips,
            downloads,
            cancelled,
        }))
    }

    /// Download a trailer for one item with one profile, outside a run.
    ///
    /// Profile filters and the enabled flag are not consulted.
    pub async fn download_one(
        &self,
        media_id: MediaId,
        profile_id: ProfileId,
    ) -> Result<SingleDownloadOutcome, PipelineError> {
        let media = self.media_store.read(media_id)?;
        let profile = self
            .profile_store
            .get_profile(profile_id)?
            .ok_or(PipelineError::ProfileNotFound(profile_id))?;

        if self
            .dedup
            .has_external_trailer(&media.txdb_id, Some(media.is_movie))
            .await
        {
            info!(
                "Plex Pass already provides trailer for '{}', skipping",
                media.title
            );
            return Ok(SingleDownloadOutcome::AlreadyProvided);
        }

        if self.gate.check_folder(&media).is_err() {
            warn!("Folder missing for '{}', skipping download", media.title);
            return Ok(SingleDownloadOutcome::FolderMissing);
        }

        info!(
            "Downloading trailer for '{}' using profile: {}",
            media.title, profile.name
        );
        match fetch_timed(self.fetcher.as_ref(), &media, &profile).await {
            Ok(()) => Ok(SingleDownloadOutcome::Downloaded),
            Err(e) => {
                warn!("Trailer download failed for '{}': {}", media.title, e);
                Ok(SingleDownloadOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The most recent completed run.
    pub fn last_report(&self) -> Option<RunReport> {
        self.last_report.read().clone()
    }

    pub fn dedup(&self) -> &Arc<TrailerDedupCache> {
        &self.dedup
    }
}

fn record_outcome(outcome: RunOutcome) -> RunOutcome {
    metrics::RUNS_TOTAL
        .with_label_values(&[outcome.as_str()])
        .inc();
    outcome
}
