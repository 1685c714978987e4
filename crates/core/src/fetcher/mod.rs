//! Trailer download executor.
//!
//! The pipeline treats a download as one opaque unit per media item. The
//! default implementation shells out to an external downloader.

mod command;
mod config;

pub use command::CommandFetcher;
pub use config::FetcherConfig;

use async_trait::async_trait;
use thiserror::Error;

use crate::media::{MediaAsset, MediaStoreError};
use crate::profile::DownloadProfile;

/// Errors that can occur while fetching a trailer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Downloader binary not found.
    #[error("Downloader not found: {program}")]
    ProgramNotFound { program: String },

    /// The download ran but did not succeed.
    #[error("Download failed: {0}")]
    Failed(String),

    /// The download took too long and was killed.
    #[error("Download timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Recording the result failed.
    #[error("Failed to record trailer: {0}")]
    Store(#[from] MediaStoreError),

    /// I/O error while running the downloader.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads one trailer for one media item.
#[async_trait]
pub trait TrailerFetcher: Send + Sync {
    /// Fetch a trailer for `media` using the options of `profile`.
    async fn fetch(&self, media: &MediaAsset, profile: &DownloadProfile) -> Result<(), FetchError>;
}
