//! Bounded-concurrency download dispatch per profile group.

use std::sync::Arc;
use std::time::Instant;

use futures::{stream, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::fetcher::{FetchError, TrailerFetcher};
use crate::media::{MediaAsset, MediaId};
use crate::metrics;
use crate::profile::{DownloadProfile, ProfileId};

use super::grouping::ProfileGroups;

/// One failed download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadFailure {
    pub media_id: MediaId,
    pub title: String,
    pub profile_id: ProfileId,
    pub reason: String,
}

/// Outcome of dispatching all groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Queued items never started because the run was cancelled.
    pub not_started: usize,
    pub failures: Vec<DownloadFailure>,
}

/// Dispatches downloads group by group, highest priority first.
///
/// Within a group up to `max_concurrent` downloads run at once. A group is
/// fully dispatched and drained before the next one starts. Failed
/// downloads are not retried within the run.
pub struct BatchOrchestrator {
    fetcher: Arc<dyn TrailerFetcher>,
    max_concurrent: usize,
}

impl BatchOrchestrator {
    pub fn new(fetcher: Arc<dyn TrailerFetcher>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Dispatch every group. `total` is the grouping pass's download count.
    ///
    /// After `cancel` fires no new download is started; in-flight ones finish.
    pub async fn run(
        &self,
        groups: ProfileGroups,
        total: usize,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        // 1-based index of the first item of the current group.
        let mut processing = 1;

        for group in groups.into_groups() {
            if group.media.is_empty() {
                continue;
            }
            let group_len = group.media.len();

            if cancel.is_cancelled() {
                report.not_started += group_len;
                continue;
            }

            info!(
                "Downloading trailers for {} media items using profile: {}",
                group_len, group.profile.name
            );

            let profile = group.profile;
            let results: Vec<(MediaAsset, Result<(), FetchError>)> =
                stream::iter(group.media.into_iter().enumerate())
                    .take_until(cancel.clone().cancelled_owned())
                    .map(|(offset, media)| {
                        let fetcher = Arc::clone(&self.fetcher);
                        let profile = profile.clone();
                        let index = processing + offset;
                        async move {
                            info!(
                                "[{}/{}] Downloading trailer for '{}'",
                                index, total, media.title
                            );
                            let result = fetch_timed(fetcher.as_ref(), &media, &profile).await;
                            (media, result)
                        }
                    })
                    .buffer_unordered(self.max_concurrent)
                    .boxed()
                    .collect()
                    .await;

            report.attempted += results.len();
            report.not_started += group_len - results.len();
            for (media, result) in results {
                match result {
                    Ok(()) => report.succeeded += 1,
                    Err(e) => {
                        warn!(
                            "Trailer download failed for '{}' (profile '{}'): {}",
                            media.title, profile.name, e
                        );
                        report.failed += 1;
                        report.failures.push(DownloadFailure {
                            media_id: media.id,
                            title: media.title.clone(),
                            profile_id: profile.id,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            processing += group_len;
        }

        report.failures.sort_by_key(|f| f.media_id);
        report
    }
}

/// Run one fetch, recording download metrics.
pub(crate) async fn fetch_timed(
    fetcher: &dyn TrailerFetcher,
    media: &MediaAsset,
    profile: &DownloadProfile,
) -> Result<(), FetchError> {
    let start = Instant::now();
    let result = fetcher.fetch(media, profile).await;
    let label = if result.is_ok() { "success" } else { "failed" };
    metrics::DOWNLOADS_TOTAL.with_label_values(&[label]).inc();
    metrics::DOWNLOAD_DURATION
        .with_label_values(&[label])
        .observe(start.elapsed().as_secs_f64());
    result
}
