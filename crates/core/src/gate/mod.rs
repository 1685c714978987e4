//! Per-item eligibility checks run before a media item is queued.

mod probe;
mod validity;

pub use probe::{FilesystemProbe, LocalFilesystem, VIDEO_EXTENSIONS};
pub use validity::ValidityGate;
