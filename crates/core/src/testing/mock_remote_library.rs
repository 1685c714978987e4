//! Mock remote library for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::library::{LibraryError, LibraryExtra, LibraryItem, RemoteLibrary};

/// A recorded library call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedLibraryCall {
    FindByGuid { section: String, guid: String },
    SearchByGuid { section: String, escaped_guid: String },
    Extras { key: String },
}

/// Mock implementation of the RemoteLibrary trait.
///
/// Provides controllable behavior for testing:
/// - Items addressable by direct guid lookup or by search
/// - Configurable extras per item key
/// - Track calls for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use trailarr_core::testing::MockRemoteLibrary;
///
/// let library = MockRemoteLibrary::new();
/// library.add_item_with_trailer("Movies", "tmdb://603", "501").await;
///
/// let item = library.find_by_guid("Movies", "tmdb://603").await?;
/// assert!(item.is_some());
/// ```
#[derive(Debug)]
pub struct MockRemoteLibrary {
    /// Items by (section, guid).
    items: Arc<RwLock<HashMap<(String, String), LibraryItem>>>,
    /// Search results by (section, escaped guid).
    search_results: Arc<RwLock<HashMap<(String, String), Vec<LibraryItem>>>>,
    /// Extras by item key.
    extras: Arc<RwLock<HashMap<String, Vec<LibraryExtra>>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedLibraryCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<LibraryError>>>,
    /// Simulated round-trip time of every call.
    latency: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockRemoteLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteLibrary {
    /// Create a new empty mock library.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            search_results: Arc::new(RwLock::new(HashMap::new())),
            extras: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            latency: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Library Contents
    // =========================================================================

    /// Make an item findable by direct guid lookup.
    pub async fn add_item(&self, section: &str, guid: &str, item: LibraryItem) {
        self.items
            .write()
            .await
            .insert((section.to_string(), guid.to_string()), item);
    }

    /// Make an item findable only through the search endpoint.
    pub async fn add_search_result(&self, section: &str, escaped_guid: &str, item: LibraryItem) {
        self.search_results
            .write()
            .await
            .entry((section.to_string(), escaped_guid.to_string()))
            .or_default()
            .push(item);
    }

    /// Set the extras of an item.
    pub async fn set_extras(&self, key: &str, extras: Vec<LibraryExtra>) {
        self.extras.write().await.insert(key.to_string(), extras);
    }

    /// Add an item carrying a single `clip`/`trailer` extra.
    pub async fn add_item_with_trailer(&self, section: &str, guid: &str, key: &str) {
        self.add_item(
            section,
            guid,
            LibraryItem {
                key: key.to_string(),
                title: format!("Item {}", key),
            },
        )
        .await;
        self.set_extras(
            key,
            vec![LibraryExtra {
                title: Some("Theatrical Trailer".to_string()),
                kind: Some("clip".to_string()),
                subtype: Some("trailer".to_string()),
            }],
        )
        .await;
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedLibraryCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: LibraryError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every call take `latency` before answering.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = Some(latency);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<LibraryError> {
        self.next_error.write().await.take()
    }

    /// Record a call, then wait out the configured latency.
    async fn record(&self, call: RecordedLibraryCall) {
        self.calls.write().await.push(call);
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RemoteLibrary for MockRemoteLibrary {
    async fn find_by_guid(
        &self,
        section: &str,
        guid: &str,
    ) -> Result<Option<LibraryItem>, LibraryError> {
        self.record(RecordedLibraryCall::FindByGuid {
            section: section.to_string(),
            guid: guid.to_string(),
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .items
            .read()
            .await
            .get(&(section.to_string(), guid.to_string()))
            .cloned())
    }

    async fn search_by_guid(
        &self,
        section: &str,
        escaped_guid: &str,
    ) -> Result<Vec<LibraryItem>, LibraryError> {
        self.record(RecordedLibraryCall::SearchByGuid {
            section: section.to_string(),
            escaped_guid: escaped_guid.to_string(),
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .search_results
            .read()
            .await
            .get(&(section.to_string(), escaped_guid.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn extras(&self, item: &LibraryItem) -> Result<Vec<LibraryExtra>, LibraryError> {
        self.record(RecordedLibraryCall::Extras {
            key: item.key.clone(),
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .extras
            .read()
            .await
            .get(&item.key)
            .cloned()
            .unwrap_or_default())
    }
}
