//! Media validity gate.

use std::sync::Arc;

use crate::media::MediaAsset;
use crate::pipeline::{SkipLedger, SkipReason};

use super::FilesystemProbe;

/// Decides whether a media item can be queued for a trailer download.
///
/// Rules are checked in order and the first failure wins:
/// 1. the item has a folder path,
/// 2. the folder exists,
/// 3. with `wait_for_media`, the folder contains a media file.
#[derive(Clone)]
pub struct ValidityGate {
    probe: Arc<dyn FilesystemProbe>,
    wait_for_media: bool,
}

impl ValidityGate {
    pub fn new(probe: Arc<dyn FilesystemProbe>, wait_for_media: bool) -> Self {
        Self {
            probe,
            wait_for_media,
        }
    }

    /// Returns the first failing rule, if any.
    pub fn check(&self, media: &MediaAsset) -> Result<(), SkipReason> {
        self.check_folder(media)?;

        if let Some(folder) = &media.folder_path {
            if self.wait_for_media && !self.probe.has_media_file(folder) {
                return Err(SkipReason::MediaNotFound);
            }
        }

        Ok(())
    }

    /// Only the folder rules, ignoring `wait_for_media`.
    pub fn check_folder(&self, media: &MediaAsset) -> Result<(), SkipReason> {
        match &media.folder_path {
            Some(folder) if self.probe.folder_exists(folder) => Ok(()),
            _ => Err(SkipReason::MissingFolderPath),
        }
    }

    /// Like [`check`](Self::check), recording a failure in `ledger`.
    pub fn is_eligible(&self, media: &MediaAsset, ledger: &mut SkipLedger) -> bool {
        match self.check(media) {
            Ok(()) => true,
            Err(reason) => {
                ledger.record(reason, &media.title);
                false
            }
        }
    }
}
