//! Download profiles.
//!
//! A profile says how to fetch a trailer (format, post-processing) and which
//! media it applies to (its filter). When several enabled profiles match a
//! media item, the one with the highest priority wins; ties go to the profile
//! declared first.

mod matcher;
mod store;
mod types;

pub use matcher::ProfileMatcher;
pub use store::{ConfigProfileStore, ProfileStore, ProfileStoreError};
pub use types::{DownloadOptions, DownloadProfile, ProfileConfig, ProfileId};
