//! Mock filesystem probe for testing.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::gate::FilesystemProbe;

/// In-memory [`FilesystemProbe`].
///
/// Folders exist only once added; media files only in folders added with
/// [`add_media_folder`](Self::add_media_folder).
#[derive(Debug, Default)]
pub struct MockFilesystem {
    folders: RwLock<HashSet<PathBuf>>,
    media_folders: RwLock<HashSet<PathBuf>>,
}

impl MockFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, path: impl Into<PathBuf>) {
        self.folders.write().insert(path.into());
    }

    /// Add a folder that also contains a media file.
    pub fn add_media_folder(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.folders.write().insert(path.clone());
        self.media_folders.write().insert(path);
    }

    pub fn remove_folder(&self, path: &Path) {
        self.folders.write().remove(path);
        self.media_folders.write().remove(path);
    }
}

impl FilesystemProbe for MockFilesystem {
    fn folder_exists(&self, path: &Path) -> bool {
        self.folders.read().contains(path)
    }

    fn has_media_file(&self, path: &Path) -> bool {
        self.media_folders.read().contains(path)
    }
}
