//! Plex Media Server client.
//!
//! Only the read-only endpoints needed to answer "does Plex already have a
//! trailer for this title" are implemented.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::types::{LibraryExtra, LibraryItem};
use super::{LibraryError, RemoteLibrary};

const TOKEN_HEADER: &str = "X-Plex-Token";

/// Plex connection and dedup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    /// Skip downloads for titles that already have a trailer extra in Plex.
    #[serde(default)]
    pub respect_trailers: bool,
    /// Plex server URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Plex authentication token.
    #[serde(default)]
    pub token: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of memoized lookups.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Title of the movie library section.
    #[serde(default = "default_movie_section")]
    pub movie_section: String,
    /// Title of the TV library section.
    #[serde(default = "default_show_section")]
    pub show_section: String,
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            respect_trailers: false,
            url: default_url(),
            token: String::new(),
            timeout_secs: default_timeout(),
            cache_capacity: default_cache_capacity(),
            movie_section: default_movie_section(),
            show_section: default_show_section(),
        }
    }
}

fn default_url() -> String {
    "http://plex:32400".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    4096
}

fn default_movie_section() -> String {
    "Movies".to_string()
}

fn default_show_section() -> String {
    "TV Shows".to_string()
}

/// Plex HTTP API client.
pub struct PlexClient {
    client: Client,
    base_url: String,
    token: String,
    /// Section title -> section key.
    sections: RwLock<HashMap<String, String>>,
}

impl PlexClient {
    /// Create a new Plex client.
    pub fn new(config: &PlexConfig) -> Result<Self, LibraryError> {
        if config.url.trim().is_empty() {
            return Err(LibraryError::NotConfigured(
                "Plex URL is required".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            sections: RwLock::new(HashMap::new()),
        })
    }

    /// Resolve a section title to its key, caching the section list.
    async fn section_key(&self, title: &str) -> Result<String, LibraryError> {
        if let Some(key) = self.sections.read().await.get(title) {
            return Ok(key.clone());
        }

        let url = format!("{}/library/sections", self.base_url);
        debug!("Plex list sections");

        let response: PlexResponse<SectionsContainer> = self.get_json(&url, &[]).await?;

        let mut sections = self.sections.write().await;
        for dir in response.media_container.directories {
            sections.insert(dir.title, dir.key);
        }

        sections
            .get(title)
            .cloned()
            .ok_or_else(|| LibraryError::UnknownSection(title.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LibraryError> {
        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(LibraryError::NotConfigured(
                "Invalid Plex token".to_string(),
            ));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(LibraryError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LibraryError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            LibraryError::ParseError(format!("Failed to parse Plex response: {}", e))
        })
    }
}

#[async_trait]
impl RemoteLibrary for PlexClient {
    async fn find_by_guid(
        &self,
        section: &str,
        guid: &str,
    ) -> Result<Option<LibraryItem>, LibraryError> {
        let key = self.section_key(section).await?;
        let url = format!("{}/library/sections/{}/all", self.base_url, key);

        debug!("Plex guid lookup: section='{}', guid={}", section, guid);

        match self
            .get_json::<PlexResponse<MetadataContainer>>(&url, &[("guid", guid)])
            .await
        {
            Ok(response) => Ok(response
                .media_container
                .metadata
                .into_iter()
                .next()
                .map(LibraryItem::from)),
            Err(LibraryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn search_by_guid(
        &self,
        section: &str,
        escaped_guid: &str,
    ) -> Result<Vec<LibraryItem>, LibraryError> {
        let key = self.section_key(section).await?;
        // The guid is already escaped, so it goes into the URL verbatim.
        let url = format!(
            "{}/library/sections/{}/search?guid={}",
            self.base_url, key, escaped_guid
        );

        debug!("Plex guid search: section='{}', guid={}", section, escaped_guid);

        match self
            .get_json::<PlexResponse<MetadataContainer>>(&url, &[])
            .await
        {
            Ok(response) => Ok(response
                .media_container
                .metadata
                .into_iter()
                .map(LibraryItem::from)
                .collect()),
            Err(LibraryError::NotFound(_)) => Ok(vec![]),
            Err(e) => Err(e),
        }
    }

    async fn extras(&self, item: &LibraryItem) -> Result<Vec<LibraryExtra>, LibraryError> {
        let url = format!("{}/library/metadata/{}/extras", self.base_url, item.key);

        debug!("Plex extras: key={}", item.key);

        let response: PlexResponse<MetadataContainer> = self.get_json(&url, &[]).await?;

        Ok(response
            .media_container
            .metadata
            .into_iter()
            .map(LibraryExtra::from)
            .collect())
    }
}

// ============================================================================
// Plex API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    directories: Vec<PlexDirectory>,
}

#[derive(Debug, Deserialize)]
struct PlexDirectory {
    key: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Deserialize)]
struct PlexMetadata {
    #[serde(rename = "ratingKey")]
    rating_key: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<PlexMetadata> for LibraryItem {
    fn from(m: PlexMetadata) -> Self {
        Self {
            key: m.rating_key,
            title: m.title.unwrap_or_default(),
        }
    }
}

impl From<PlexMetadata> for LibraryExtra {
    fn from(m: PlexMetadata) -> Self {
        Self {
            title: m.title,
            kind: m.kind,
            subtype: m.subtype,
        }
    }
}
