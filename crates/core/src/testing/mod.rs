//! Testing utilities and mock implementations.
//!
//! Mock implementations of every collaborator the pipeline talks to, so the
//! whole run can be exercised without Plex, a database or a downloader.
//!
//! # Example
//!
//! ```rust,ignore
//! use trailarr_core::testing::{fixtures, InMemoryMediaStore, MockFilesystem, MockTrailerFetcher};
//!
//! let store = InMemoryMediaStore::with_media(vec![fixtures::movie(1, "Heat", "949")]);
//! let fs = MockFilesystem::new();
//! fs.add_folder("/movies/Heat");
//! let fetcher = MockTrailerFetcher::new();
//!
//! // Wire into a TrailerPipeline...
//! ```

mod mock_fetcher;
mod mock_filesystem;
mod mock_remote_library;
mod mock_stores;

pub use mock_fetcher::{MockTrailerFetcher, RecordedFetch};
pub use mock_filesystem::MockFilesystem;
pub use mock_remote_library::{MockRemoteLibrary, RecordedLibraryCall};
pub use mock_stores::{FailingProfileStore, InMemoryMediaStore, StaticProfileStore};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::filter::{FilterSet, MediaFilter};
    use crate::media::{MediaAsset, MediaId};
    use crate::profile::{DownloadProfile, ProfileId};

    /// A monitored movie in `/movies/{title}` without a trailer.
    pub fn movie(id: MediaId, title: &str, txdb_id: &str) -> MediaAsset {
        MediaAsset {
            id,
            title: title.to_string(),
            year: Some(2000),
            is_movie: true,
            txdb_id: txdb_id.to_string(),
            monitor: true,
            folder_path: Some(PathBuf::from(format!("/movies/{}", title))),
            trailer_exists: false,
        }
    }

    /// A monitored series in `/tv/{title}` without a trailer.
    pub fn series(id: MediaId, title: &str, txdb_id: &str) -> MediaAsset {
        MediaAsset {
            is_movie: false,
            folder_path: Some(PathBuf::from(format!("/tv/{}", title))),
            ..movie(id, title, txdb_id)
        }
    }

    /// An enabled profile whose filter matches everything.
    pub fn match_all_profile(id: ProfileId, name: &str, priority: i32) -> DownloadProfile {
        DownloadProfile::new(id, name, priority, Arc::new(FilterSet::default()))
    }

    /// An enabled profile matching exactly one title.
    pub fn title_profile(id: ProfileId, name: &str, priority: i32, title: &str) -> DownloadProfile {
        let title = title.to_string();
        let filter: Arc<dyn MediaFilter> = Arc::new(move |m: &MediaAsset| m.title == title);
        DownloadProfile::new(id, name, priority, filter)
    }
}
