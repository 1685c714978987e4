//! Media storage trait and errors.

use thiserror::Error;

use super::{MediaAsset, MediaId};

/// Error type for media store operations.
#[derive(Debug, Error)]
pub enum MediaStoreError {
    /// Media item not found.
    #[error("Media not found: {0}")]
    NotFound(MediaId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for MediaStoreError {
    fn from(e: rusqlite::Error) -> Self {
        MediaStoreError::Database(e.to_string())
    }
}

/// Trait for media storage backends.
pub trait MediaStore: Send + Sync {
    /// Read every media item, ordered by id.
    fn read_all(&self) -> Result<Vec<MediaAsset>, MediaStoreError>;

    /// Read a single media item.
    fn read(&self, id: MediaId) -> Result<MediaAsset, MediaStoreError>;

    /// Insert or replace a media item.
    fn upsert(&self, media: &MediaAsset) -> Result<(), MediaStoreError>;

    /// Record whether a trailer now exists for the item.
    fn set_trailer_exists(&self, id: MediaId, exists: bool) -> Result<(), MediaStoreError>;
}
