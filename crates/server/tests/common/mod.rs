//! Common test utilities for API testing with mocks.
//!
//! Builds an in-process router backed by a real `TrailerPipeline` whose
//! collaborators are all mocks, so requests can be driven with `oneshot`
//! without Plex, a database or a downloader.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use trailarr_core::testing::{
    InMemoryMediaStore, MockFilesystem, MockRemoteLibrary, MockTrailerFetcher,
    StaticProfileStore,
};
use trailarr_core::{
    Config, DownloadProfile, MediaAsset, MonitorConfig, PlexConfig, TrailerDedupCache,
    TrailerPipeline,
};
use trailarr_server::state::AppState;

/// Re-export fixtures for test convenience
pub use trailarr_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_status() {
///     let fixture = TestFixture::new();
///     let response = fixture.get("/api/v1/status").await;
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub state: Arc<AppState>,
    pub pipeline: Arc<TrailerPipeline>,
    /// Mock media store - seed media items
    pub media_store: Arc<InMemoryMediaStore>,
    /// Mock filesystem - control which folders exist
    pub filesystem: Arc<MockFilesystem>,
    /// Mock remote library - configure existing trailers
    pub library: Arc<MockRemoteLibrary>,
    /// Mock fetcher - inspect and control downloads
    pub fetcher: Arc<MockTrailerFetcher>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Fixture with no media and one match-all profile.
    pub fn new() -> Self {
        Self::with_setup(
            Vec::new(),
            vec![fixtures::match_all_profile(1, "Default", 0)],
        )
    }

    /// Fixture seeded with media and profiles. Every media folder exists.
    pub fn with_setup(media: Vec<MediaAsset>, profiles: Vec<DownloadProfile>) -> Self {
        let media_store = Arc::new(InMemoryMediaStore::with_media(media.clone()));
        let filesystem = Arc::new(MockFilesystem::new());
        for item in &media {
            if let Some(folder) = &item.folder_path {
                filesystem.add_folder(folder.clone());
            }
        }
        let library = Arc::new(MockRemoteLibrary::new());
        let fetcher = Arc::new(MockTrailerFetcher::new());

        let plex = PlexConfig {
            respect_trailers: true,
            ..Default::default()
        };
        let dedup = Arc::new(TrailerDedupCache::new(
            Arc::clone(&library) as Arc<dyn trailarr_core::RemoteLibrary>,
            &plex,
        ));

        let config = Config {
            monitor: MonitorConfig {
                max_concurrent_downloads: 2,
                ..Default::default()
            },
            plex,
            profiles: Vec::new(),
            ..Default::default()
        };

        let pipeline = Arc::new(TrailerPipeline::new(
            config.monitor.clone(),
            Arc::clone(&media_store) as Arc<dyn trailarr_core::MediaStore>,
            Arc::new(StaticProfileStore::new(profiles)),
            dedup,
            Arc::clone(&filesystem) as Arc<dyn trailarr_core::FilesystemProbe>,
            Arc::clone(&fetcher) as Arc<dyn trailarr_core::TrailerFetcher>,
        ));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&pipeline),
            CancellationToken::new(),
        ));
        let router = trailarr_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            pipeline,
            media_store,
            filesystem,
            library,
            fetcher,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path).await
    }

    /// Wait until no run is in progress.
    pub async fn wait_until_idle(&self) {
        for _ in 0..200 {
            if !self.pipeline.is_running() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("pipeline run did not finish");
    }

    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
