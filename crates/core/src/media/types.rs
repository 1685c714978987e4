//! Media item types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identifier of a media item in the local library.
pub type MediaId = i64;

/// A movie or series tracked by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Library identifier.
    pub id: MediaId,
    /// Display title.
    pub title: String,
    /// Release year, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// `true` for movies, `false` for series.
    pub is_movie: bool,
    /// Identifier in the external metadata namespace (TMDB for movies, TVDB for series).
    pub txdb_id: String,
    /// Whether the item is monitored for trailer downloads.
    #[serde(default)]
    pub monitor: bool,
    /// Folder holding the item's media files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<PathBuf>,
    /// Whether a trailer has already been downloaded locally.
    #[serde(default)]
    pub trailer_exists: bool,
}

impl MediaAsset {
    /// Short media type label used in logs and command templates.
    pub fn media_type(&self) -> &'static str {
        if self.is_movie {
            "movie"
        } else {
            "series"
        }
    }
}
