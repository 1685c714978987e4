//! Mock trailer fetcher for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::fetcher::{FetchError, TrailerFetcher};
use crate::media::{MediaAsset, MediaId};
use crate::profile::{DownloadProfile, ProfileId};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    pub media_id: MediaId,
    pub title: String,
    pub profile_id: ProfileId,
}

/// Mock implementation of the TrailerFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Track fetches in start order
/// - Fail for selected media ids
/// - Simulate download duration
/// - Observe peak concurrency
#[derive(Debug)]
pub struct MockTrailerFetcher {
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    failing: Arc<RwLock<HashSet<MediaId>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    /// Cancelled when a fetch starts.
    cancel_on_fetch: Arc<RwLock<Option<CancellationToken>>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Default for MockTrailerFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTrailerFetcher {
    pub fn new() -> Self {
        Self {
            fetches: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            delay: Arc::new(RwLock::new(None)),
            cancel_on_fetch: Arc::new(RwLock::new(None)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make fetches for this media id fail.
    pub async fn fail_for(&self, media_id: MediaId) {
        self.failing.write().await.insert(media_id);
    }

    /// Simulated duration of each fetch.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Cancel `token` as soon as any fetch starts.
    pub async fn cancel_on_fetch(&self, token: CancellationToken) {
        *self.cancel_on_fetch.write().await = Some(token);
    }

    /// Get all recorded fetches, in start order.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Fetches currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrailerFetcher for MockTrailerFetcher {
    async fn fetch(&self, media: &MediaAsset, profile: &DownloadProfile) -> Result<(), FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        self.fetches.write().await.push(RecordedFetch {
            media_id: media.id,
            title: media.title.clone(),
            profile_id: profile.id,
        });

        if let Some(token) = self.cancel_on_fetch.read().await.as_ref() {
            token.cancel();
        }

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.read().await.contains(&media.id) {
            return Err(FetchError::Failed(format!(
                "mock failure for '{}'",
                media.title
            )));
        }
        Ok(())
    }
}
