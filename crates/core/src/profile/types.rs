//! Profile types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter::{FilterSet, MediaFilter};

/// Identifier of a download profile.
pub type ProfileId = i64;

/// File format and post-processing options handed to the trailer fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// Container format of the downloaded trailer (e.g. "mkv", "mp4").
    #[serde(default = "default_file_format")]
    pub file_format: String,
    /// Trim trailing silence after download.
    #[serde(default)]
    pub remove_silence: bool,
    /// Search for a trailer even when the media already carries a known video id.
    #[serde(default)]
    pub always_search: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            file_format: default_file_format(),
            remove_silence: false,
            always_search: false,
        }
    }
}

fn default_file_format() -> String {
    "mkv".to_string()
}

/// A resolved download profile.
#[derive(Clone)]
pub struct DownloadProfile {
    pub id: ProfileId,
    pub name: String,
    pub enabled: bool,
    /// Higher is preferred.
    pub priority: i32,
    pub filter: Arc<dyn MediaFilter>,
    pub options: DownloadOptions,
}

impl DownloadProfile {
    /// Create an enabled profile with default options.
    pub fn new(
        id: ProfileId,
        name: impl Into<String>,
        priority: i32,
        filter: Arc<dyn MediaFilter>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            priority,
            filter,
            options: DownloadOptions::default(),
        }
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set download options.
    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }
}

impl fmt::Debug for DownloadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadProfile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("priority", &self.priority)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Declarative profile as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub id: ProfileId,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(flatten)]
    pub options: DownloadOptions,
    #[serde(default)]
    pub filters: FilterSet,
}

fn default_enabled() -> bool {
    true
}

impl From<&ProfileConfig> for DownloadProfile {
    fn from(config: &ProfileConfig) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            enabled: config.enabled,
            priority: config.priority,
            filter: Arc::new(config.filters.clone()),
            options: config.options.clone(),
        }
    }
}
