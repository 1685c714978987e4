//! Remote media library integration.
//!
//! The pipeline asks the remote library (Plex) whether it already serves a
//! trailer for a title, so that we don't download one it already has.

mod plex;
mod types;

pub use plex::{PlexClient, PlexConfig};
pub use types::{GuidNamespace, LibraryExtra, LibraryItem};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// No library section with this title.
    #[error("Library section not found: {0}")]
    UnknownSection(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing URL, bad token, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Read-only access to a remote media library.
#[async_trait]
pub trait RemoteLibrary: Send + Sync {
    /// Look up an item in `section` whose guid equals `guid` exactly.
    ///
    /// Returns `Ok(None)` when the library has no such item.
    async fn find_by_guid(
        &self,
        section: &str,
        guid: &str,
    ) -> Result<Option<LibraryItem>, LibraryError>;

    /// Generic search in `section` by an already URL-escaped guid.
    async fn search_by_guid(
        &self,
        section: &str,
        escaped_guid: &str,
    ) -> Result<Vec<LibraryItem>, LibraryError>;

    /// Enumerate the extras attached to an item.
    async fn extras(&self, item: &LibraryItem) -> Result<Vec<LibraryExtra>, LibraryError>;
}
