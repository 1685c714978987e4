//! In-memory stores for testing.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::media::{MediaAsset, MediaId, MediaStore, MediaStoreError};
use crate::profile::{DownloadProfile, ProfileStore, ProfileStoreError};

/// Media store backed by a map, with read failure injection.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    media: RwLock<BTreeMap<MediaId, MediaAsset>>,
    fail_reads: AtomicBool,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media(media: impl IntoIterator<Item = MediaAsset>) -> Self {
        let store = Self::new();
        for m in media {
            store.insert(m);
        }
        store
    }

    pub fn insert(&self, media: MediaAsset) {
        self.media.write().insert(media.id, media);
    }

    /// Make `read_all` and `read` fail with a database error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), MediaStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MediaStoreError::Database(
                "simulated read failure".to_string(),
            ));
        }
        Ok(())
    }
}

impl MediaStore for InMemoryMediaStore {
    fn read_all(&self) -> Result<Vec<MediaAsset>, MediaStoreError> {
        self.check_reads()?;
        Ok(self.media.read().values().cloned().collect())
    }

    fn read(&self, id: MediaId) -> Result<MediaAsset, MediaStoreError> {
        self.check_reads()?;
        self.media
            .read()
            .get(&id)
            .cloned()
            .ok_or(MediaStoreError::NotFound(id))
    }

    fn upsert(&self, media: &MediaAsset) -> Result<(), MediaStoreError> {
        self.insert(media.clone());
        Ok(())
    }

    fn set_trailer_exists(&self, id: MediaId, exists: bool) -> Result<(), MediaStoreError> {
        match self.media.write().get_mut(&id) {
            Some(media) => {
                media.trailer_exists = exists;
                Ok(())
            }
            None => Err(MediaStoreError::NotFound(id)),
        }
    }
}

/// Profile store returning a fixed list, closures as filters allowed.
#[derive(Debug, Clone, Default)]
pub struct StaticProfileStore {
    profiles: Vec<DownloadProfile>,
}

impl StaticProfileStore {
    pub fn new(profiles: Vec<DownloadProfile>) -> Self {
        Self { profiles }
    }
}

impl ProfileStore for StaticProfileStore {
    fn list_profiles(&self) -> Result<Vec<DownloadProfile>, ProfileStoreError> {
        Ok(self.profiles.clone())
    }
}

/// Profile store that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingProfileStore;

impl ProfileStore for FailingProfileStore {
    fn list_profiles(&self) -> Result<Vec<DownloadProfile>, ProfileStoreError> {
        Err(ProfileStoreError::Unavailable(
            "simulated profile store failure".to_string(),
        ))
    }
}
