//! Single-pass grouping of media items by matched profile.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dedup::TrailerDedupCache;
use crate::gate::ValidityGate;
use crate::media::MediaAsset;
use crate::metrics;
use crate::profile::{DownloadProfile, ProfileId, ProfileMatcher};

use super::skip::{SkipLedger, SkipReason};

/// Media queued for one profile.
#[derive(Debug, Clone)]
pub struct ProfileGroup {
    pub profile: DownloadProfile,
    pub media: Vec<MediaAsset>,
}

/// Per-profile download queues, in descending profile priority.
#[derive(Debug, Clone, Default)]
pub struct ProfileGroups {
    groups: Vec<ProfileGroup>,
}

impl ProfileGroups {
    /// One empty group per enabled profile, keeping the matcher's order.
    pub fn new(matcher: &ProfileMatcher) -> Self {
        Self {
            groups: matcher
                .profiles()
                .iter()
                .filter(|p| p.enabled)
                .map(|profile| ProfileGroup {
                    profile: profile.clone(),
                    media: Vec::new(),
                })
                .collect(),
        }
    }

    fn push(&mut self, profile_id: ProfileId, media: MediaAsset) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.profile.id == profile_id) {
            group.media.push(media);
        }
    }

    /// Media queued for `profile_id`.
    pub fn get(&self, profile_id: ProfileId) -> Option<&[MediaAsset]> {
        self.groups
            .iter()
            .find(|g| g.profile.id == profile_id)
            .map(|g| g.media.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfileGroup> {
        self.groups.iter()
    }

    /// Total queued media across all groups.
    pub fn media_count(&self) -> usize {
        self.groups.iter().map(|g| g.media.len()).sum()
    }

    /// Number of groups (including empty ones).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<ProfileGroup> {
        self.groups
    }
}

/// Result of a grouping pass.
#[derive(Debug)]
pub struct Grouping {
    pub groups: ProfileGroups,
    pub ledger: SkipLedger,
    /// Items queued for download. Passed through unchanged as the progress total.
    pub download_count: usize,
    /// Monitored items the remote library already has a trailer for.
    pub already_provided: usize,
    /// The scan was cancelled before every item was examined.
    pub interrupted: bool,
}

/// Counts of a grouping pass, for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupingCounts {
    pub scanned: usize,
    pub queued: usize,
    pub already_provided: usize,
    pub skipped: usize,
}

/// Sorts media into profile groups, recording why others were left out.
///
/// Per item: monitored, then dedup, then profile match, then validity.
pub struct GroupingPass<'a> {
    dedup: &'a TrailerDedupCache,
    matcher: &'a ProfileMatcher,
    gate: &'a ValidityGate,
}

impl<'a> GroupingPass<'a> {
    pub fn new(
        dedup: &'a TrailerDedupCache,
        matcher: &'a ProfileMatcher,
        gate: &'a ValidityGate,
    ) -> Self {
        Self {
            dedup,
            matcher,
            gate,
        }
    }

    /// Scan `media` once. Stops early when `cancel` fires, even mid-lookup.
    pub async fn run(&self, media: Vec<MediaAsset>, cancel: &CancellationToken) -> Grouping {
        let mut groups = ProfileGroups::new(self.matcher);
        let mut ledger = SkipLedger::new();
        let mut download_count = 0;
        let mut already_provided = 0;
        let mut interrupted = false;
        let total = media.len();

        for (index, item) in media.into_iter().enumerate() {
            if cancel.is_cancelled() {
                interrupted = true;
                warn!("Grouping cancelled, {} media items not scanned", total - index);
                break;
            }

            if !item.monitor {
                ledger.record(SkipReason::NotMonitored, &item.title);
                continue;
            }

            let provided = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    interrupted = true;
                    warn!("Grouping cancelled, {} media items not scanned", total - index);
                    break;
                }
                provided = self
                    .dedup
                    .has_external_trailer(&item.txdb_id, Some(item.is_movie)) => provided,
            };

            if provided {
                debug!(
                    "Plex already provides a trailer for '{}', skipping",
                    item.title
                );
                metrics::MEDIA_SKIPPED
                    .with_label_values(&["already_provided"])
                    .inc();
                already_provided += 1;
                continue;
            }

            let Some(profile_id) = self.matcher.match_profile(&item) else {
                ledger.record(SkipReason::NoMatchingProfile, &item.title);
                continue;
            };

            if !self.gate.is_eligible(&item, &mut ledger) {
                continue;
            }

            download_count += 1;
            groups.push(profile_id, item);
        }

        Grouping {
            groups,
            ledger,
            download_count,
            already_provided,
            interrupted,
        }
    }
}

impl Grouping {
    pub fn counts(&self) -> GroupingCounts {
        GroupingCounts {
            scanned: self.download_count + self.already_provided + self.ledger.total(),
            queued: self.download_count,
            already_provided: self.already_provided,
            skipped: self.ledger.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::MediaFilter;
    use crate::library::PlexConfig;
    use crate::testing::{fixtures, MockFilesystem, MockRemoteLibrary};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    fn gate_for(media: &[MediaAsset]) -> ValidityGate {
        let fs = MockFilesystem::new();
        for m in media {
            if let Some(folder) = &m.folder_path {
                fs.add_folder(folder.clone());
            }
        }
        ValidityGate::new(Arc::new(fs), false)
    }

    fn movies_only(id: ProfileId, priority: i32) -> DownloadProfile {
        let filter: Arc<dyn MediaFilter> = Arc::new(|m: &MediaAsset| m.is_movie);
        DownloadProfile::new(id, "movies", priority, filter)
    }

    #[tokio::test]
    async fn test_single_eligible_movie() {
        let media = vec![fixtures::movie(1, "Arrival", "123")];
        let dedup = TrailerDedupCache::disabled();
        let matcher = ProfileMatcher::new(vec![fixtures::match_all_profile(1, "all", 1)]);
        let gate = gate_for(&media);

        let grouping = GroupingPass::new(&dedup, &matcher, &gate)
            .run(media, &CancellationToken::new())
            .await;

        assert_eq!(grouping.download_count, 1);
        let queued = grouping.groups.get(1).unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].title, "Arrival");
        assert_eq!(grouping.ledger.total(), 0);
    }

    #[tokio::test]
    async fn test_skip_buckets() {
        let mut unmonitored = fixtures::movie(1, "Unmonitored", "1");
        unmonitored.monitor = false;
        let show = fixtures::series(2, "Show", "2");
        let mut no_folder = fixtures::movie(3, "No Folder", "3");
        no_folder.folder_path = None;
        let missing_on_disk = fixtures::movie(4, "Not On Disk", "4");
        let ok = fixtures::movie(5, "Ok", "5");

        let gate = gate_for(&[ok.clone()]);
        let media = vec![unmonitored, show, no_folder, missing_on_disk, ok];
        let dedup = TrailerDedupCache::disabled();
        let matcher = ProfileMatcher::new(vec![movies_only(1, 0)]);

        let grouping = GroupingPass::new(&dedup, &matcher, &gate)
            .run(media, &CancellationToken::new())
            .await;

        assert_eq!(grouping.ledger.titles(SkipReason::NotMonitored), ["Unmonitored"]);
        assert_eq!(grouping.ledger.titles(SkipReason::NoMatchingProfile), ["Show"]);
        assert_eq!(
            grouping.ledger.titles(SkipReason::MissingFolderPath),
            ["No Folder", "Not On Disk"]
        );
        assert_eq!(grouping.download_count, 1);
        assert_eq!(
            grouping.counts(),
            GroupingCounts {
                scanned: 5,
                queued: 1,
                already_provided: 0,
                skipped: 4,
            }
        );
    }

    #[tokio::test]
    async fn test_higher_priority_profile_wins() {
        let media = vec![fixtures::movie(1, "Heat", "949")];
        let dedup = TrailerDedupCache::disabled();
        let matcher = ProfileMatcher::new(vec![
            fixtures::match_all_profile(5, "low", 5),
            fixtures::match_all_profile(10, "high", 10),
        ]);
        let gate = gate_for(&media);

        let grouping = GroupingPass::new(&dedup, &matcher, &gate)
            .run(media, &CancellationToken::new())
            .await;

        assert_eq!(grouping.groups.get(10).unwrap().len(), 1);
        assert!(grouping.groups.get(5).unwrap().is_empty());
        // Group order follows priority.
        let order: Vec<ProfileId> = grouping.groups.iter().map(|g| g.profile.id).collect();
        assert_eq!(order, vec![10, 5]);
    }

    #[tokio::test]
    async fn test_dedup_positive_is_silent() {
        let library = Arc::new(MockRemoteLibrary::new());
        library.add_item_with_trailer("Movies", "tmdb://123", "9").await;
        let dedup = TrailerDedupCache::new(
            library,
            &PlexConfig {
                respect_trailers: true,
                ..Default::default()
            },
        );

        let media = vec![fixtures::movie(1, "Arrival", "123")];
        let matcher = ProfileMatcher::new(vec![fixtures::match_all_profile(1, "all", 1)]);
        let gate = gate_for(&media);

        let grouping = GroupingPass::new(&dedup, &matcher, &gate)
            .run(media, &CancellationToken::new())
            .await;

        assert_eq!(grouping.download_count, 0);
        assert_eq!(grouping.already_provided, 1);
        assert_eq!(grouping.ledger.total(), 0);
        assert_eq!(grouping.groups.media_count(), 0);
    }

    #[tokio::test]
    async fn test_unmonitored_skips_dedup_lookup() {
        let library = Arc::new(MockRemoteLibrary::new());
        let dedup = TrailerDedupCache::new(
            library.clone(),
            &PlexConfig {
                respect_trailers: true,
                ..Default::default()
            },
        );
        let mut media = fixtures::movie(1, "Arrival", "123");
        media.monitor = false;
        let matcher = ProfileMatcher::new(vec![fixtures::match_all_profile(1, "all", 1)]);
        let gate = gate_for(&[]);

        GroupingPass::new(&dedup, &matcher, &gate)
            .run(vec![media], &CancellationToken::new())
            .await;

        assert_eq!(library.call_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_slow_lookup() {
        let library = Arc::new(MockRemoteLibrary::new());
        library.set_latency(Duration::from_secs(30)).await;
        let dedup = TrailerDedupCache::new(
            library.clone(),
            &PlexConfig {
                respect_trailers: true,
                ..Default::default()
            },
        );
        let media = vec![
            fixtures::movie(1, "Arrival", "123"),
            fixtures::movie(2, "Dune", "438631"),
            fixtures::movie(3, "Solaris", "593"),
        ];
        let matcher = ProfileMatcher::new(vec![fixtures::match_all_profile(1, "all", 1)]);
        let gate = gate_for(&media);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(45)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let grouping = GroupingPass::new(&dedup, &matcher, &gate)
            .run(media, &cancel)
            .await;

        // The first item needs four 30s calls; the scan stops during the second.
        assert!(grouping.interrupted);
        assert!(started.elapsed() < Duration::from_secs(60));
        assert_eq!(library.call_count().await, 2);
        assert_eq!(grouping.counts().scanned, 0);
        assert_eq!(grouping.download_count, 0);
        assert!(dedup.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_scan_examines_nothing() {
        let media = vec![fixtures::movie(1, "Arrival", "123")];
        let dedup = TrailerDedupCache::disabled();
        let matcher = ProfileMatcher::new(vec![fixtures::match_all_profile(1, "all", 1)]);
        let gate = gate_for(&media);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let grouping = GroupingPass::new(&dedup, &matcher, &gate)
            .run(media, &cancel)
            .await;

        assert!(grouping.interrupted);
        assert_eq!(grouping.counts().scanned, 0);
        assert!(grouping.groups.get(1).unwrap().is_empty());
    }
}
