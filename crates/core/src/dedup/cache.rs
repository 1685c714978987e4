use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::library::{GuidNamespace, LibraryError, LibraryItem, PlexConfig, RemoteLibrary};
use crate::metrics;

type CacheKey = (String, Option<bool>);

/// Hit/miss counters for the dedup cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

/// Bounded LRU memo of remote-library trailer lookups.
///
/// Keyed by `(external id, is_movie)`. Entries live until evicted or the
/// cache is cleared; nothing is persisted. Every lookup failure is treated
/// as "no trailer" and cached as such, so a remote outage leads to
/// downloads being attempted rather than skipped.
pub struct TrailerDedupCache {
    library: Option<Arc<dyn RemoteLibrary>>,
    movie_section: String,
    show_section: String,
    entries: Mutex<LruCache<CacheKey, bool>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TrailerDedupCache {
    /// Create a cache backed by `library`.
    ///
    /// The cache is enabled only when `config.respect_trailers` is set.
    pub fn new(library: Arc<dyn RemoteLibrary>, config: &PlexConfig) -> Self {
        let library = config.respect_trailers.then_some(library);
        Self::build(library, config)
    }

    /// A cache that never contacts a remote library and always answers `false`.
    pub fn disabled() -> Self {
        Self::build(None, &PlexConfig::default())
    }

    fn build(library: Option<Arc<dyn RemoteLibrary>>, config: &PlexConfig) -> Self {
        let capacity = config.cache_capacity.max(1);
        Self {
            library,
            movie_section: config.movie_section.clone(),
            show_section: config.show_section.clone(),
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.library.is_some()
    }

    /// Whether the remote library already serves a trailer for this item.
    ///
    /// Never fails: remote errors are logged and answered with `false`.
    pub async fn has_external_trailer(&self, external_id: &str, is_movie: Option<bool>) -> bool {
        let Some(library) = &self.library else {
            return false;
        };

        let external_id = external_id.trim();
        if external_id.is_empty() {
            return false;
        }

        let key = (external_id.to_string(), is_movie);
        let cached = self.entries.lock().get(&key).copied();
        if let Some(cached) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            metrics::DEDUP_LOOKUPS.with_label_values(&["hit"]).inc();
            return cached;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let result = match self.lookup(library.as_ref(), external_id, is_movie).await {
            Ok(true) => {
                metrics::DEDUP_LOOKUPS.with_label_values(&["has_trailer"]).inc();
                true
            }
            Ok(false) => {
                metrics::DEDUP_LOOKUPS.with_label_values(&["no_trailer"]).inc();
                false
            }
            Err(e) => {
                warn!(
                    "Remote library lookup failed for '{}', assuming no trailer: {}",
                    external_id, e
                );
                metrics::DEDUP_LOOKUPS.with_label_values(&["error"]).inc();
                false
            }
        };

        self.entries.lock().put(key, result);
        result
    }

    async fn lookup(
        &self,
        library: &dyn RemoteLibrary,
        external_id: &str,
        is_movie: Option<bool>,
    ) -> Result<bool, LibraryError> {
        let primary = GuidNamespace::for_media(external_id, is_movie);
        let section = match primary {
            GuidNamespace::Tmdb => self.movie_section.as_str(),
            GuidNamespace::Tvdb => self.show_section.as_str(),
        };

        let item = match find_item(library, section, primary, external_id).await? {
            Some(item) => Some(item),
            None => find_item(library, section, primary.alternate(), external_id).await?,
        };

        let Some(item) = item else {
            debug!("No library item for '{}' in '{}'", external_id, section);
            return Ok(false);
        };

        let extras = library.extras(&item).await.inspect_err(|_| {
            metrics::REMOTE_LIBRARY_ERRORS
                .with_label_values(&["extras"])
                .inc();
        })?;

        let has_trailer = extras.iter().any(|extra| extra.is_trailer());
        debug!(
            "Library item '{}' ({}): {} extras, trailer={}",
            item.title,
            item.key,
            extras.len(),
            has_trailer
        );
        Ok(has_trailer)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all memoized answers. Counters are kept.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Direct guid lookup, then a generic search with the escaped guid.
async fn find_item(
    library: &dyn RemoteLibrary,
    section: &str,
    namespace: GuidNamespace,
    external_id: &str,
) -> Result<Option<LibraryItem>, LibraryError> {
    let guid = namespace.guid(external_id);

    let found = library
        .find_by_guid(section, &guid)
        .await
        .inspect_err(|_| {
            metrics::REMOTE_LIBRARY_ERRORS
                .with_label_values(&["lookup"])
                .inc();
        })?;
    if found.is_some() {
        return Ok(found);
    }

    let escaped = urlencoding::encode(&guid);
    let results = library
        .search_by_guid(section, &escaped)
        .await
        .inspect_err(|_| {
            metrics::REMOTE_LIBRARY_ERRORS
                .with_label_values(&["lookup"])
                .inc();
        })?;
    Ok(results.into_iter().next())
}
