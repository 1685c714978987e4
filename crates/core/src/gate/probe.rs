//! Filesystem checks used by the validity gate.

use std::fs;
use std::path::Path;

use tracing::debug;

/// File extensions recognized as media files.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "m4v", "wmv", "webm", "ts", "m2ts", "mpg", "mpeg", "flv",
];

/// Filesystem queries needed to decide whether an item can receive a trailer.
pub trait FilesystemProbe: Send + Sync {
    /// Whether `path` is an existing directory.
    fn folder_exists(&self, path: &Path) -> bool;

    /// Whether `path` holds at least one media file.
    fn has_media_file(&self, path: &Path) -> bool;
}

/// Probe backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl FilesystemProbe for LocalFilesystem {
    fn folder_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// Looks in the folder itself and one level of sub-folders.
    /// Downloaded trailers (`*-trailer.*`) do not count.
    fn has_media_file(&self, path: &Path) -> bool {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read folder {}: {}", path.display(), e);
                return false;
            }
        };

        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                subdirs.push(entry_path);
            } else if is_media_file(&entry_path) {
                return true;
            }
        }

        subdirs.iter().any(|dir| {
            fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .any(|e| e.path().is_file() && is_media_file(&e.path()))
                })
                .unwrap_or(false)
        })
    }
}

fn is_media_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
        return false;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| !stem.to_ascii_lowercase().contains("-trailer"))
}
